//! Staging store
//!
//! Accepted files are buffered in memory or under a purpose-scoped
//! directory, `{root}/{purpose_dir}/{uuid}.{ext}`. Disk entries are opened
//! with create-new semantics and are never overwritten.

use crate::acceptor::AcceptedFile;
use arogya_core::sniff::extension_for_content_type;
use arogya_core::{StagedFile, StagedLocation, StoragePolicy, UploadPurpose};
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const MAX_FILENAME_LENGTH: usize = 255;

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("Failed to write staged file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to prepare staging directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reduce a client filename to a safe basename
pub fn sanitize_filename(filename: &str) -> String {
    let filename_only = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.contains("..") || sanitized.trim_matches('.').is_empty() {
        return "file".to_string();
    }

    sanitized
}

fn extension_for(file: &AcceptedFile) -> Option<String> {
    if let Some(ext) = extension_for_content_type(&file.content_type) {
        return Some(ext.to_string());
    }
    file.original_filename
        .as_deref()
        .map(sanitize_filename)
        .and_then(|name| {
            Path::new(&name)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
        })
        .filter(|ext| !ext.is_empty() && ext.len() <= 10)
}

#[derive(Debug, Clone)]
pub struct StagingStore {
    root: PathBuf,
}

impl StagingStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory that holds disk-staged files for `purpose`
    pub fn purpose_dir(&self, purpose: UploadPurpose) -> PathBuf {
        self.root.join(purpose.staging_dir_name())
    }

    /// Create the directory for every purpose up front
    pub async fn ensure_dirs(&self, purposes: &[UploadPurpose]) -> Result<(), StagingError> {
        for purpose in purposes {
            let path = self.purpose_dir(*purpose);
            fs::create_dir_all(&path)
                .await
                .map_err(|source| StagingError::Directory { path, source })?;
        }
        Ok(())
    }

    /// Stage one accepted file under the given policy.
    pub async fn stage(
        &self,
        file: AcceptedFile,
        purpose: UploadPurpose,
        policy: StoragePolicy,
    ) -> Result<StagedFile, StagingError> {
        let id = Uuid::new_v4();
        let staged_name = match extension_for(&file) {
            Some(ext) => format!("{}.{}", id, ext),
            None => id.to_string(),
        };
        let size = file.size();

        let location = match policy {
            StoragePolicy::Memory => StagedLocation::Memory(file.data),
            StoragePolicy::Disk => {
                let dir = self.purpose_dir(purpose);
                fs::create_dir_all(&dir)
                    .await
                    .map_err(|source| StagingError::Directory {
                        path: dir.clone(),
                        source,
                    })?;

                let path = dir.join(&staged_name);
                write_new(&path, &file.data)
                    .await
                    .map_err(|source| StagingError::Write {
                        path: path.clone(),
                        source,
                    })?;

                tracing::debug!(
                    path = %path.display(),
                    field = %file.field_name,
                    size_bytes = size,
                    "Staged file on disk"
                );
                StagedLocation::Disk(path)
            }
        };

        Ok(StagedFile {
            id,
            purpose,
            field_name: file.field_name,
            original_filename: file.original_filename,
            staged_name,
            content_type: file.content_type,
            size,
            location,
            created_at: Utc::now(),
        })
    }

    /// Stage every file of a request. When one fails, entries already written
    /// for this request are removed before the error is returned.
    pub async fn stage_all(
        &self,
        files: Vec<AcceptedFile>,
        purpose: UploadPurpose,
        policy: StoragePolicy,
    ) -> Result<Vec<StagedFile>, StagingError> {
        let mut staged = Vec::with_capacity(files.len());
        for file in files {
            match self.stage(file, purpose, policy).await {
                Ok(entry) => staged.push(entry),
                Err(e) => {
                    self.discard(&staged).await;
                    return Err(e);
                }
            }
        }
        Ok(staged)
    }

    /// Remove disk entries. Failures are logged and skipped.
    pub async fn discard(&self, files: &[StagedFile]) {
        for file in files {
            if let Some(path) = file.disk_path() {
                if let Err(e) = fs::remove_file(path).await {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(
                            error = %e,
                            path = %path.display(),
                            "Failed to discard staged file"
                        );
                    }
                }
            }
        }
    }
}

async fn write_new(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut out = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    out.write_all(data).await?;
    out.sync_all().await
}
