use crate::keys::remote_key;
use crate::traits::{RemoteStore, RemoteStoreError, RemoteStoreResult};
use crate::RemoteStoreBackend;
use arogya_core::sniff::sniff;
use arogya_core::{RemoteAsset, StagedFile};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem remote store, for development and tests
#[derive(Clone)]
pub struct LocalStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Create a new LocalStore
    ///
    /// # Arguments
    /// * `base_path` - Root directory for uploaded files (e.g., "./media")
    /// * `base_url` - Base URL the files are served under (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> RemoteStoreResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            RemoteStoreError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStore {
            base_path,
            base_url,
        })
    }

    /// Convert a remote key to a filesystem path, refusing anything that
    /// would escape the base directory.
    fn key_to_path(&self, key: &str) -> RemoteStoreResult<PathBuf> {
        if key.contains("..") || key.starts_with('/') {
            return Err(RemoteStoreError::InvalidKey(
                "Remote key contains invalid characters".to_string(),
            ));
        }
        let path = self.base_path.join(key);
        if path.strip_prefix(&self.base_path).is_err() {
            return Err(RemoteStoreError::InvalidKey(
                "Remote key resolves outside storage directory".to_string(),
            ));
        }
        Ok(path)
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> RemoteStoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                RemoteStoreError::UploadFailed(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for LocalStore {
    async fn upload(&self, file: &StagedFile, folder: &str) -> RemoteStoreResult<RemoteAsset> {
        let data = file.read().await?;
        let key = remote_key(folder, &file.staged_name)?;
        let path = self.key_to_path(&key)?;
        let sniffed = sniff(&data, &file.content_type);

        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut out = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                RemoteStoreError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;

        out.write_all(&data).await.map_err(|e| {
            RemoteStoreError::UploadFailed(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            ))
        })?;

        out.sync_all().await.map_err(|e| {
            RemoteStoreError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local store upload successful"
        );

        Ok(RemoteAsset::new(
            self.generate_url(&key),
            key,
            sniffed.kind,
            data.len(),
            sniffed.content_type,
        ))
    }

    fn backend_type(&self) -> RemoteStoreBackend {
        RemoteStoreBackend::Local
    }
}
