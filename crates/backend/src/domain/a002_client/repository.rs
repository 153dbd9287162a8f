use anyhow::Result;
use contracts::domain::a002_client::{Client, ClientId};
use contracts::domain::common::AggregateId;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_client")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub price: f64,
    pub has_credit: bool,
    pub routes_json: String,
    pub total_debt: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Client {
    type Error = String;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let routes: Vec<String> = serde_json::from_str(&m.routes_json)
            .map_err(|e| format!("Client {}: invalid routes: {}", m.id, e))?;
        Ok(Client {
            id: ClientId::from_string(&m.id)?,
            name: m.name,
            address: m.address,
            phone: m.phone,
            price: m.price,
            has_credit: m.has_credit,
            routes,
            total_debt: m.total_debt,
        })
    }
}

pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Client>> {
    Entity::find()
        .order_by_asc(Column::Name)
        .all(db)
        .await?
        .into_iter()
        .map(|m| Client::try_from(m).map_err(|e| anyhow::anyhow!(e)))
        .collect()
}

pub async fn insert(db: &DatabaseConnection, client: &Client) -> Result<()> {
    let active = ActiveModel {
        id: Set(client.id.as_string()),
        name: Set(client.name.clone()),
        address: Set(client.address.clone()),
        phone: Set(client.phone.clone()),
        price: Set(client.price),
        has_credit: Set(client.has_credit),
        routes_json: Set(serde_json::to_string(&client.routes)?),
        total_debt: Set(client.total_debt),
    };
    Entity::insert(active).exec(db).await?;
    Ok(())
}
