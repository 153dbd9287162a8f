use async_trait::async_trait;
use contracts::domain::a001_order::Order;
use contracts::domain::a002_client::Client;
use contracts::domain::a003_staff::Staff;
use contracts::domain::a004_attendance::Attendance;
use contracts::shared::period::ReportRequest;
use sea_orm::DatabaseConnection;

use super::store::{DataFetchError, DataStore};
use crate::domain::{a001_order, a002_client, a003_staff, a004_attendance};

/// [`DataStore`] backed by the SQLite tables of the dashboard
#[derive(Clone)]
pub struct SqliteDataStore {
    db: DatabaseConnection,
}

impl SqliteDataStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

fn fetch_error(entity: &'static str) -> impl FnOnce(anyhow::Error) -> DataFetchError {
    move |e| DataFetchError::new(entity, format!("{e:#}"))
}

#[async_trait]
impl DataStore for SqliteDataStore {
    async fn query_orders(&self, range: &ReportRequest) -> Result<Vec<Order>, DataFetchError> {
        a001_order::repository::list_by_date_range(&self.db, range)
            .await
            .map_err(fetch_error("orders"))
    }

    async fn query_clients(&self) -> Result<Vec<Client>, DataFetchError> {
        a002_client::repository::list_all(&self.db)
            .await
            .map_err(fetch_error("clients"))
    }

    async fn query_staff(&self, active_only: bool) -> Result<Vec<Staff>, DataFetchError> {
        a003_staff::repository::list(&self.db, active_only)
            .await
            .map_err(fetch_error("staff"))
    }

    async fn query_attendance(&self, range: &ReportRequest) -> Result<Vec<Attendance>, DataFetchError> {
        a004_attendance::repository::list_by_date_range(&self.db, range)
            .await
            .map_err(fetch_error("attendance"))
    }
}
