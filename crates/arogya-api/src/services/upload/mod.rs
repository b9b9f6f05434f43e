//! Media ingestion service
//!
//! Runs a multipart request through the pipeline stages for its upload
//! purpose: accept, stage, then validate or extract, then upload.

mod service;
mod types;

pub use service::MediaIngestionService;
pub use types::{
    InvalidMark, PostDraft, PostResponse, VerificationDocument, VerificationRecord,
    VerificationResponse, VerificationStatus,
};
