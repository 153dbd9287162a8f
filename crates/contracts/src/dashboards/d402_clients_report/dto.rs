use crate::domain::a002_client::ClientId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientsReport {
    /// Distinct clients with orders in the range
    pub active_clients: u32,
    pub client_activity: Vec<ClientActivityBucket>,
    /// At most ten clients ranked by settled revenue
    pub top_clients_by_revenue: Vec<ClientRevenue>,
    pub clients_by_route: Vec<RouteCount>,
    pub credit: CreditAnalysis,
    /// At most five clients ranked by outstanding credit debt
    pub top_debtors: Vec<Debtor>,
    /// Always four bands: 1, 2-5, 6-10, more than 10 orders
    pub retention: Vec<RetentionSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientActivityBucket {
    pub period: String,
    pub active_clients: u32,
    /// Needs client creation history, which is not tracked
    pub new_clients: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRevenue {
    pub client_id: ClientId,
    pub name: String,
    pub revenue: f64,
    pub orders: u32,
    /// Percent of all settled revenue in the range, one decimal
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCount {
    pub route: String,
    pub clients: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAnalysis {
    pub clients_with_credit: u32,
    /// Outstanding debt over credit orders in the range
    pub total_credit_amount: f64,
    /// Needs payment history per order, which is not tracked
    pub average_payment_days: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debtor {
    pub client_id: ClientId,
    pub name: String,
    pub total_debt: f64,
    /// Orders contributing to `total_debt`
    pub debt_orders: u32,
    /// Days from the oldest unpaid order to the end of the range
    pub days_outstanding: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionSegment {
    pub segment: String,
    pub min_orders: u32,
    /// `None` for the open-ended top band
    pub max_orders: Option<u32>,
    pub count: u32,
}
