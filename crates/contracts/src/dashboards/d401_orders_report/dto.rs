use crate::domain::a001_order::OrderStatus;
use crate::domain::a002_client::ClientId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersReport {
    pub orders_over_time: Vec<OrdersBucket>,
    /// Always three entries, in `OrderStatus::ALL` order
    pub status_distribution: Vec<StatusShare>,
    /// At most five clients ranked by order count
    pub top_clients_by_orders: Vec<ClientOrders>,
    pub average_order_value: Vec<AverageOrderValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrdersBucket {
    pub period: String,
    pub count: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusShare {
    pub status: OrderStatus,
    pub name: String,
    pub count: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOrders {
    pub client_id: ClientId,
    pub name: String,
    pub orders: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageOrderValue {
    pub period: String,
    pub average: f64,
}
