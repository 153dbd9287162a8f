use std::sync::Arc;

use crate::shared::artifacts::ArtifactStore;
use crate::shared::cancel::CancelToken;
use crate::shared::config::ReportSettings;
use crate::shared::data::DataStore;

/// Collaborators shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub artifacts: Arc<dyn ArtifactStore>,
    pub settings: Arc<ReportSettings>,
    /// Fires when the server is shutting down
    pub shutdown: CancelToken,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DataStore>,
        artifacts: Arc<dyn ArtifactStore>,
        settings: ReportSettings,
        shutdown: CancelToken,
    ) -> Self {
        Self {
            store,
            artifacts,
            settings: Arc::new(settings),
            shutdown,
        }
    }
}
