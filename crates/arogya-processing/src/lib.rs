//! Arogya Processing Library
//!
//! The request-side stages of the media ingestion pipeline: accepting
//! multipart parts against an upload constraint set, staging accepted files
//! in memory or on disk, and extracting text from PDF documents.

pub mod acceptor;
pub mod document;
pub mod staging;

pub use acceptor::{format_limit, AcceptError, AcceptSession, AcceptedFile, UploadAcceptor};
pub use document::{DocumentTextExtractor, ExtractError};
pub use staging::{sanitize_filename, StagingError, StagingStore};
