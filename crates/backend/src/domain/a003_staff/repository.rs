use anyhow::Result;
use contracts::domain::a003_staff::{Loan, Staff, StaffId};
use contracts::domain::common::AggregateId;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_staff")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub salary: f64,
    pub is_active: bool,
    pub loans_json: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Staff {
    type Error = String;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let loans: Vec<Loan> = serde_json::from_str(&m.loans_json)
            .map_err(|e| format!("Staff {}: invalid loans: {}", m.id, e))?;
        Ok(Staff {
            id: StaffId::from_string(&m.id)?,
            first_name: m.first_name,
            last_name: m.last_name,
            position: m.position,
            salary: m.salary,
            is_active: m.is_active,
            loans,
        })
    }
}

pub async fn list(db: &DatabaseConnection, active_only: bool) -> Result<Vec<Staff>> {
    let mut query = Entity::find();
    if active_only {
        query = query.filter(Column::IsActive.eq(true));
    }
    query
        .order_by_asc(Column::LastName)
        .order_by_asc(Column::FirstName)
        .all(db)
        .await?
        .into_iter()
        .map(|m| Staff::try_from(m).map_err(|e| anyhow::anyhow!(e)))
        .collect()
}

pub async fn insert(db: &DatabaseConnection, staff: &Staff) -> Result<()> {
    let active = ActiveModel {
        id: Set(staff.id.as_string()),
        first_name: Set(staff.first_name.clone()),
        last_name: Set(staff.last_name.clone()),
        position: Set(staff.position.clone()),
        salary: Set(staff.salary),
        is_active: Set(staff.is_active),
        loans_json: Set(serde_json::to_string(&staff.loans)?),
    };
    Entity::insert(active).exec(db).await?;
    Ok(())
}
