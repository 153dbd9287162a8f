use crate::domain::a002_client::ClientId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Headline figures for a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Sum of `total` over settled orders
    pub total_revenue: f64,
    pub total_orders: u32,
    /// Distinct clients with at least one order in range
    pub active_clients: u32,
    /// Sum of outstanding debt over every order that still owes something
    pub pending_payments: f64,
    /// Percent, rounded
    pub average_attendance: u32,
    pub top_client: Option<TopClient>,
    /// Percent, rounded; `0` when there is no revenue
    pub collection_rate: i32,
    /// Comparison figures that need a historical baseline. Always `None`
    /// until the baseline period is agreed on.
    pub not_computed: PendingBaselineFigures,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopClient {
    pub client_id: ClientId,
    pub name: String,
    pub revenue: f64,
    /// Share of `total_revenue`, percent, rounded
    pub percentage: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingBaselineFigures {
    pub revenue_change: Option<f64>,
    pub orders_change: Option<f64>,
    pub clients_change: Option<f64>,
    pub attendance_change: Option<f64>,
    pub sales_target: Option<f64>,
    pub staff_utilization: Option<f64>,
}
