use anyhow::Result;
use contracts::domain::a003_staff::StaffId;
use contracts::domain::a004_attendance::{Attendance, AttendanceId};
use contracts::domain::common::AggregateId;
use contracts::shared::period::ReportRequest;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, Set};

use crate::shared::data::db::{format_datetime, parse_date, parse_datetime};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a004_attendance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub staff_id: String,
    pub staff_name: Option<String>,
    pub date: String,
    pub check_in: String,
    pub check_out: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Attendance {
    type Error = String;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        Ok(Attendance {
            id: AttendanceId::from_string(&m.id)?,
            staff_id: StaffId::from_string(&m.staff_id)?,
            staff_name: m.staff_name,
            date: parse_date(&m.date)?,
            check_in: parse_datetime(&m.check_in)?,
            check_out: m.check_out.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

/// Records whose calendar date lies in the range, by date then check-in
pub async fn list_by_date_range(db: &DatabaseConnection, range: &ReportRequest) -> Result<Vec<Attendance>> {
    let from = range.start_date.format("%Y-%m-%d").to_string();
    let to = range.end_date.format("%Y-%m-%d").to_string();

    Entity::find()
        .filter(Column::Date.gte(from))
        .filter(Column::Date.lte(to))
        .order_by_asc(Column::Date)
        .order_by_asc(Column::CheckIn)
        .all(db)
        .await?
        .into_iter()
        .map(|m| Attendance::try_from(m).map_err(|e| anyhow::anyhow!(e)))
        .collect()
}

pub async fn insert(db: &DatabaseConnection, record: &Attendance) -> Result<()> {
    let active = ActiveModel {
        id: Set(record.id.as_string()),
        staff_id: Set(record.staff_id.as_string()),
        staff_name: Set(record.staff_name.clone()),
        date: Set(record.date.format("%Y-%m-%d").to_string()),
        check_in: Set(format_datetime(&record.check_in)),
        check_out: Set(record.check_out.as_ref().map(format_datetime)),
    };
    Entity::insert(active).exec(db).await?;
    Ok(())
}
