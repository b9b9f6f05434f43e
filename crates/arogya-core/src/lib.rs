//! Arogya Core Library
//!
//! This crate provides the configuration, error types and domain models shared
//! by every stage of the media ingestion pipeline.

pub mod config;
pub mod error;
pub mod models;
pub mod sniff;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, PipelineConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    ExtractedText, FieldRule, RemoteAsset, ResourceKind, StagedFile, StagedLocation,
    StoragePolicy, UploadConstraintSet, UploadPurpose, ValidationVerdict,
};
pub use storage_types::RemoteStoreBackend;
