use anyhow::Result;
use contracts::domain::a001_order::{Order, OrderId, OrderItem, OrderStatus};
use contracts::domain::a002_client::ClientId;
use contracts::domain::common::AggregateId;
use contracts::shared::period::ReportRequest;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

use crate::shared::data::db::{format_datetime, parse_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: String,
    pub client_name: Option<String>,
    pub date: String,
    pub total: f64,
    pub status: String,
    pub is_credit: bool,
    pub remaining_debt: Option<f64>,
    pub items_json: String,
    pub discount: Option<f64>,
    pub tax: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Order {
    type Error = String;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let items: Vec<OrderItem> = serde_json::from_str(&m.items_json)
            .map_err(|e| format!("Order {}: invalid items: {}", m.id, e))?;
        Ok(Order {
            id: OrderId::from_string(&m.id)?,
            client_id: ClientId::from_string(&m.client_id)?,
            client_name: m.client_name,
            date: parse_datetime(&m.date)?,
            total: m.total,
            status: OrderStatus::from_str(&m.status)?,
            is_credit: m.is_credit,
            remaining_debt: m.remaining_debt,
            items,
            discount: m.discount,
            tax: m.tax,
            notes: m.notes,
        })
    }
}

/// Orders whose date falls inside the range, oldest first
pub async fn list_by_date_range(db: &DatabaseConnection, range: &ReportRequest) -> Result<Vec<Order>> {
    let from = format!("{} 00:00:00", range.start_date.format("%Y-%m-%d"));
    let to = format!("{} 23:59:59", range.end_date.format("%Y-%m-%d"));

    let models = Entity::find()
        .filter(Column::Date.gte(from))
        .filter(Column::Date.lte(to))
        .order_by_asc(Column::Date)
        .all(db)
        .await?;

    models
        .into_iter()
        .map(|m| Order::try_from(m).map_err(|e| anyhow::anyhow!(e)))
        .collect()
}

pub async fn insert(db: &DatabaseConnection, order: &Order) -> Result<()> {
    order.validate().map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    let active = ActiveModel {
        id: Set(order.id.as_string()),
        client_id: Set(order.client_id.as_string()),
        client_name: Set(order.client_name.clone()),
        date: Set(format_datetime(&order.date)),
        total: Set(order.total),
        status: Set(order.status.as_str().to_string()),
        is_credit: Set(order.is_credit),
        remaining_debt: Set(order.remaining_debt),
        items_json: Set(serde_json::to_string(&order.items)?),
        discount: Set(order.discount),
        tax: Set(order.tax),
        notes: Set(order.notes.clone()),
    };
    Entity::insert(active).exec(db).await?;
    Ok(())
}
