//! Arogya API Library
//!
//! This crate provides the HTTP boundary of the media ingestion pipeline:
//! upload handlers, the single error-to-status mapping, state wiring and
//! application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::{MediaIngestionService, PostDraft, VerificationRecord};
pub use state::AppState;
