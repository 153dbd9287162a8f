use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contracts::domain::a006_report_artifact::ReportArtifact;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use super::file_name::parse_file_name;
use super::store::{ArtifactError, ArtifactStore};
use crate::shared::format::format_file_size;

/// Artifacts as plain files in one directory, served under `public_prefix`
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
    public_prefix: String,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let bad = name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\'])
            || name.contains("..");
        if bad {
            return Err(ArtifactError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }

    async fn describe(&self, entry: &tokio::fs::DirEntry) -> Option<ReportArtifact> {
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                tracing::warn!("Skipping report with non UTF-8 name: {:?}", raw);
                return None;
            }
        };
        if name.starts_with('.') {
            return None;
        }
        let metadata = match entry.metadata().await {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Skipping report {}: {}", name, e);
                return None;
            }
        };
        if !metadata.is_file() {
            return None;
        }

        let parsed = parse_file_name(&name);
        let created_at = parsed.created_at.or_else(|| {
            metadata
                .created()
                .or_else(|_| metadata.modified())
                .ok()
                .map(DateTime::<Utc>::from)
        });
        let Some(created_at) = created_at else {
            tracing::warn!("Skipping report {}: no creation time", name);
            return None;
        };

        Some(ReportArtifact {
            id: name.clone(),
            locator: self.locator(&name),
            file_name: name,
            period: parsed.period,
            created_at,
            size_bytes: metadata.len(),
            size_label: format_file_size(metadata.len()),
        })
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

async fn discard(temp: &Path) {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Cannot remove temporary file {}: {}", temp.display(), e),
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    /// Written to a hidden temp file first and linked into place, so a
    /// failed or abandoned save never shows up in `list`.
    async fn save(&self, bytes: &[u8], file_name: &str) -> Result<String, ArtifactError> {
        let path = self.path_for(file_name)?;
        let temp = self.root.join(format!(".{}.tmp", file_name));
        let write_err = |e: std::io::Error| ArtifactError::StorageWrite {
            name: file_name.to_string(),
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.root).await.map_err(write_err)?;
        if let Err(e) = write_file(&temp, bytes).await {
            discard(&temp).await;
            return Err(write_err(e));
        }
        // hard_link fails if the name is taken, so nothing is overwritten
        let linked = tokio::fs::hard_link(&temp, &path).await;
        discard(&temp).await;
        linked.map_err(write_err)?;

        tracing::info!("Stored report {} ({} bytes)", file_name, bytes.len());
        Ok(self.locator(file_name))
    }

    async fn list(&self) -> Result<Vec<ReportArtifact>, ArtifactError> {
        let read_err = |e: std::io::Error| ArtifactError::StorageRead {
            locator: self.public_prefix.clone(),
            message: e.to_string(),
        };

        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(read_err(e)),
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(read_err)? {
            if let Some(artifact) = self.describe(&entry).await {
                artifacts.push(artifact);
            }
        }

        artifacts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.file_name.cmp(&b.file_name))
        });
        Ok(artifacts)
    }

    async fn delete(&self, id: &str) -> Result<(), ArtifactError> {
        let path = self.path_for(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Deleted report {}", id);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ArtifactError::NotFound(id.to_string())),
            Err(e) => Err(ArtifactError::StorageWrite {
                name: id.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn read(&self, id: &str) -> Result<Vec<u8>, ArtifactError> {
        let path = self.path_for(id)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ArtifactError::NotFound(id.to_string())),
            Err(e) => Err(ArtifactError::StorageRead {
                locator: self.locator(id),
                message: e.to_string(),
            }),
        }
    }

    fn locator(&self, id: &str) -> String {
        format!("{}/{}", self.public_prefix, urlencoding::encode(id))
    }
}
