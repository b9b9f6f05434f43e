//! Document processing module

pub mod extractor;

pub use extractor::{assemble_pages, DocumentTextExtractor, ExtractError};
