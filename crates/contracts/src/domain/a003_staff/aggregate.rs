use crate::aggregate_id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

aggregate_id!(
    /// Staff member identifier
    StaffId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub amount: f64,
    pub date: NaiveDate,
    pub paid: f64,
    pub remaining: f64,
    pub status: LoanStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub id: StaffId,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub salary: f64,
    pub is_active: bool,
    #[serde(default)]
    pub loans: Vec<Loan>,
}

impl Staff {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}
