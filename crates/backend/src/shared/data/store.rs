use async_trait::async_trait;
use contracts::domain::a001_order::Order;
use contracts::domain::a002_client::Client;
use contracts::domain::a003_staff::Staff;
use contracts::domain::a004_attendance::Attendance;
use contracts::shared::period::ReportRequest;
use thiserror::Error;

/// Failure of the data store collaborator (network, permission, corrupt row)
#[derive(Debug, Error)]
#[error("failed to fetch {entity}: {message}")]
pub struct DataFetchError {
    pub entity: &'static str,
    pub message: String,
}

impl DataFetchError {
    pub fn new(entity: &'static str, message: impl Into<String>) -> Self {
        Self {
            entity,
            message: message.into(),
        }
    }
}

/// Read-only access to the records the reports are built from.
///
/// Range queries are inclusive on both calendar dates of `range`.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn query_orders(&self, range: &ReportRequest) -> Result<Vec<Order>, DataFetchError>;

    async fn query_clients(&self) -> Result<Vec<Client>, DataFetchError>;

    async fn query_staff(&self, active_only: bool) -> Result<Vec<Staff>, DataFetchError>;

    async fn query_attendance(&self, range: &ReportRequest) -> Result<Vec<Attendance>, DataFetchError>;
}
