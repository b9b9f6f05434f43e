//! Error types module
//!
//! Every pipeline stage returns its own error enum; the HTTP boundary converts
//! them into `AppError`, which self-describes its response characteristics
//! through `ErrorMetadata`.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like constraint violations
    Debug,
    /// Warning level - for recoverable dependency issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "FILE_TOO_LARGE")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("Field not allowed: {0}")]
    FieldNotAllowed(String),

    #[error("File too large: {0}")]
    FileTooLarge(String),

    #[error("Too many files: {0}")]
    TooManyFiles(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Staging IO error: {0}")]
    StagingIo(String),

    #[error("Remote upload failed: {0}")]
    RemoteUploadFailed(String),

    #[error("Document parse error: {0}")]
    DocumentParse(String),

    #[error("Content validation unavailable: {0}")]
    ValidationUnavailable(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::StagingIo(format!("IO error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::UnsupportedType(_) => (
            400,
            "UNSUPPORTED_TYPE",
            false,
            Some("Upload a file of an allowed type"),
            false,
            LogLevel::Debug,
        ),
        AppError::FieldNotAllowed(_) => (
            400,
            "FIELD_NOT_ALLOWED",
            false,
            Some("Check the multipart field names"),
            false,
            LogLevel::Debug,
        ),
        AppError::FileTooLarge(_) => (
            413,
            "FILE_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::TooManyFiles(_) => (
            400,
            "TOO_MANY_FILES",
            false,
            Some("Remove some files and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::MissingRequiredField(_) => (
            400,
            "MISSING_REQUIRED_FIELD",
            false,
            Some("Attach every required document"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidInput(_) => (
            400,
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::StagingIo(_) => (
            500,
            "STAGING_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::RemoteUploadFailed(_) => (
            500,
            "REMOTE_UPLOAD_FAILED",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::DocumentParse(_) => (
            422,
            "DOCUMENT_PARSE_ERROR",
            false,
            Some("Upload a valid, unencrypted PDF"),
            false,
            LogLevel::Warn,
        ),
        AppError::ValidationUnavailable(_) => (
            503,
            "VALIDATION_UNAVAILABLE",
            true,
            Some("Wait 30-60 seconds and retry"),
            true,
            LogLevel::Warn,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::UnsupportedType(_) => "UnsupportedType",
            AppError::FieldNotAllowed(_) => "FieldNotAllowed",
            AppError::FileTooLarge(_) => "FileTooLarge",
            AppError::TooManyFiles(_) => "TooManyFiles",
            AppError::MissingRequiredField(_) => "MissingRequiredField",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::StagingIo(_) => "StagingIOError",
            AppError::RemoteUploadFailed(_) => "RemoteUploadFailed",
            AppError::DocumentParse(_) => "ParseError",
            AppError::ValidationUnavailable(_) => "ValidationUnavailable",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::UnsupportedType(ref msg)
            | AppError::FieldNotAllowed(ref msg)
            | AppError::FileTooLarge(ref msg)
            | AppError::TooManyFiles(ref msg)
            | AppError::MissingRequiredField(ref msg)
            | AppError::InvalidInput(ref msg)
            | AppError::DocumentParse(ref msg) => msg.clone(),
            AppError::StagingIo(_) => "Failed to stage upload".to_string(),
            AppError::RemoteUploadFailed(_) => "media upload failed".to_string(),
            AppError::ValidationUnavailable(_) => {
                "Content validation is temporarily unavailable".to_string()
            }
            AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_too_many_files() {
        let err = AppError::TooManyFiles("Too many files. Maximum 5 images allowed".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "TOO_MANY_FILES");
        assert!(!err.is_recoverable());
        assert_eq!(
            err.client_message(),
            "Too many files. Maximum 5 images allowed"
        );
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_file_too_large() {
        let err = AppError::FileTooLarge("File too large. Maximum size is 5 MB".to_string());
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "FILE_TOO_LARGE");
    }

    #[test]
    fn test_remote_upload_failure_hides_detail() {
        let err = AppError::RemoteUploadFailed("connection reset by peer".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "media upload failed");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_validation_unavailable_is_recoverable() {
        let err = AppError::ValidationUnavailable("timeout".to_string());
        assert_eq!(err.http_status_code(), 503);
        assert!(err.is_recoverable());
        assert_eq!(
            err.suggested_action(),
            Some("Wait 30-60 seconds and retry")
        );
    }

    #[test]
    fn test_parse_error_maps_to_unprocessable() {
        let err = AppError::DocumentParse("Invalid PDF: missing header".to_string());
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(err.error_type(), "ParseError");
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err = AppError::from(anyhow::anyhow!("root cause").context("wiring failed"));
        let details = err.detailed_message();
        assert!(details.contains("Internal error with source"));
        assert!(details.contains("wiring failed"));
    }
}
