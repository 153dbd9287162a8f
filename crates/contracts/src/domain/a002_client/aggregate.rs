use crate::aggregate_id;
use serde::{Deserialize, Serialize};

aggregate_id!(
    /// Client identifier
    ClientId
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub address: String,
    pub phone: String,
    /// Special unit price agreed with the client
    pub price: f64,
    pub has_credit: bool,
    /// Delivery routes the client is assigned to
    #[serde(default)]
    pub routes: Vec<String>,
    /// Sum of `remaining_debt` over the client's orders, maintained by the
    /// payment workflow
    #[serde(default)]
    pub total_debt: f64,
}
