use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::constraint::UploadPurpose;

/// Backing location of a staged file
#[derive(Debug, Clone)]
pub enum StagedLocation {
    Memory(Bytes),
    Disk(PathBuf),
}

/// A file that passed its constraint set and was buffered for the rest of the pipeline.
///
/// Memory-backed files are dropped with the request. Disk-backed files stay
/// until the retention sweeper reclaims them or they are discarded explicitly.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub id: Uuid,
    pub purpose: UploadPurpose,
    pub field_name: String,
    pub original_filename: Option<String>,
    /// Collision-resistant name, `{uuid}.{ext}`
    pub staged_name: String,
    pub content_type: String,
    pub size: usize,
    pub location: StagedLocation,
    pub created_at: DateTime<Utc>,
}

impl StagedFile {
    /// Load the staged bytes regardless of backing location.
    pub async fn read(&self) -> std::io::Result<Bytes> {
        match &self.location {
            StagedLocation::Memory(data) => Ok(data.clone()),
            StagedLocation::Disk(path) => tokio::fs::read(path).await.map(Bytes::from),
        }
    }

    pub fn disk_path(&self) -> Option<&Path> {
        match &self.location {
            StagedLocation::Disk(path) => Some(path.as_path()),
            StagedLocation::Memory(_) => None,
        }
    }

    pub fn is_on_disk(&self) -> bool {
        matches!(self.location, StagedLocation::Disk(_))
    }
}
