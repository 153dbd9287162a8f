use async_trait::async_trait;
use contracts::domain::a006_report_artifact::ReportArtifact;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to store report {name}: {message}")]
    StorageWrite { name: String, message: String },

    #[error("failed to read report at {locator}: {message}")]
    StorageRead { locator: String, message: String },

    #[error("report {0} not found")]
    NotFound(String),

    #[error("invalid report name: {0:?}")]
    InvalidName(String),
}

/// Persistence for generated report documents.
///
/// Artifacts are addressed by their file name, which doubles as the id.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Write `bytes` under a new `file_name`; returns the retrieval locator.
    /// An existing artifact is never overwritten.
    async fn save(&self, bytes: &[u8], file_name: &str) -> Result<String, ArtifactError>;

    /// Every stored artifact, newest first
    async fn list(&self) -> Result<Vec<ReportArtifact>, ArtifactError>;

    async fn delete(&self, id: &str) -> Result<(), ArtifactError>;

    async fn read(&self, id: &str) -> Result<Vec<u8>, ArtifactError>;

    /// Public locator for `id`; does not check that it exists
    fn locator(&self, id: &str) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    /// Bytes to hand to the client as an attachment
    Bytes { file_name: String, bytes: Vec<u8> },
    /// Fetching failed; the client should open the locator itself
    OpenDirect { locator: String },
}

/// Fetch an artifact for download. A failed read falls back to the locator;
/// a missing artifact or a bad id is still an error.
pub async fn download(store: &dyn ArtifactStore, id: &str) -> Result<DownloadOutcome, ArtifactError> {
    match store.read(id).await {
        Ok(bytes) => Ok(DownloadOutcome::Bytes {
            file_name: id.to_string(),
            bytes,
        }),
        Err(ArtifactError::StorageRead { locator, message }) => {
            tracing::warn!("Download of {} failed ({}), opening directly", id, message);
            Ok(DownloadOutcome::OpenDirect { locator })
        }
        Err(e) => Err(e),
    }
}
