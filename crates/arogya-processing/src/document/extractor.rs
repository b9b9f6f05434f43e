//! PDF text extraction
//!
//! The parser is synchronous and CPU bound, so it runs on the blocking pool.
//! Callers see one future that resolves to the whole document text or a
//! parse failure; partial text is never returned.

use arogya_core::ExtractedText;
use bytes::Bytes;
use percent_encoding::percent_decode_str;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Invalid PDF: {0}")]
    Parse(String),
}

/// Join page text into one string.
///
/// Within a page, non-empty text runs are percent-decoded and joined with a
/// single space. Pages are joined with a newline, in page order.
pub fn assemble_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|page| {
            page.as_ref()
                .lines()
                .map(str::trim)
                .filter(|run| !run.is_empty())
                .map(|run| percent_decode_str(run).decode_utf8_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Default)]
pub struct DocumentTextExtractor;

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Whether `data` looks like a PDF
    pub fn supports(data: &[u8]) -> bool {
        data.starts_with(PDF_MAGIC)
    }

    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn extract(&self, data: Bytes) -> Result<ExtractedText, ExtractError> {
        if !Self::supports(&data) {
            return Err(ExtractError::Parse("missing %PDF- header".to_string()));
        }

        let start = std::time::Instant::now();

        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&data)
        })
        .await
        .map_err(|e| ExtractError::Parse(format!("parser aborted: {}", e)))?
        .map_err(|e| {
            tracing::warn!(error = %e, "PDF text extraction failed");
            ExtractError::Parse(e.to_string())
        })?;

        let text = assemble_pages(&pages);

        tracing::debug!(
            page_count = pages.len(),
            text_len = text.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "PDF text extracted"
        );

        Ok(ExtractedText {
            text,
            page_count: pages.len(),
        })
    }
}
