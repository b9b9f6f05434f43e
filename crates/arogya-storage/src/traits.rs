//! Remote store abstraction
//!
//! This module defines the `RemoteStore` trait that every backend implements.

use crate::RemoteStoreBackend;
use arogya_core::{RemoteAsset, StagedFile};
use async_trait::async_trait;
use thiserror::Error;

/// Remote store operation errors
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid remote key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Staged file unreadable: {0}")]
    StagedRead(#[from] std::io::Error),
}

/// Result type for remote store operations
pub type RemoteStoreResult<T> = Result<T, RemoteStoreError>;

/// Remote object store adapter
///
/// `upload` performs at most one network round trip per file and never
/// retries. A failed upload produces no `RemoteAsset`.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Transmit a staged file into `folder` and return its durable reference.
    async fn upload(&self, file: &StagedFile, folder: &str) -> RemoteStoreResult<RemoteAsset>;

    /// Get the backend type
    fn backend_type(&self) -> RemoteStoreBackend;
}
