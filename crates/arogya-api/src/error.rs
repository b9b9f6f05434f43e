//! HTTP error response conversion
//!
//! Every pipeline stage returns its own error enum. This module is the one
//! place where those are mapped onto `AppError` and rendered as a status code
//! plus `ErrorResponse` body.
//!
//! **Handler pattern:** return `Result<impl IntoResponse, HttpAppError>` and
//! let `?` convert stage errors.
//!
//! The rendered body never carries `details`. A detailed copy rides along in
//! the response extensions for `error_details_middleware`, which decides from
//! the startup configuration whether clients get to see it.

use arogya_core::{AppError, ErrorMetadata, LogLevel};
use arogya_processing::{format_limit, AcceptError, ExtractError, StagingError};
use arogya_services::ModerationError;
use arogya_storage::RemoteStoreError;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Wait 30-60 seconds and retry")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from arogya-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<AcceptError> for HttpAppError {
    fn from(err: AcceptError) -> Self {
        let message = err.to_string();
        HttpAppError(match err {
            AcceptError::UnsupportedType { .. } => AppError::UnsupportedType(message),
            AcceptError::FieldNotAllowed(_) => AppError::FieldNotAllowed(message),
            AcceptError::FileTooLarge { .. } => AppError::FileTooLarge(message),
            AcceptError::TooManyFiles(_) => AppError::TooManyFiles(message),
            AcceptError::MissingRequiredField { .. } => AppError::MissingRequiredField(message),
            AcceptError::EmptyFile(_) | AcceptError::MalformedRequest(_) => {
                AppError::InvalidInput(message)
            }
        })
    }
}

impl HttpAppError {
    /// Body stream failures. A body cut off by the request size limit is
    /// reported as an oversized upload naming `body_limit`.
    pub fn from_multipart(err: MultipartError, body_limit: usize) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            HttpAppError(AppError::FileTooLarge(format!(
                "Request body too large. Maximum size is {}",
                format_limit(&body_limit)
            )))
        } else {
            HttpAppError(AppError::InvalidInput(format!(
                "Failed to read multipart: {}",
                err.body_text()
            )))
        }
    }
}

impl From<StagingError> for HttpAppError {
    fn from(err: StagingError) -> Self {
        HttpAppError(AppError::StagingIo(err.to_string()))
    }
}

impl From<RemoteStoreError> for HttpAppError {
    fn from(err: RemoteStoreError) -> Self {
        match err {
            RemoteStoreError::StagedRead(e) => {
                HttpAppError(AppError::StagingIo(format!("Staged file unreadable: {}", e)))
            }
            other => HttpAppError(AppError::RemoteUploadFailed(other.to_string())),
        }
    }
}

impl From<ExtractError> for HttpAppError {
    fn from(err: ExtractError) -> Self {
        HttpAppError(AppError::DocumentParse(err.to_string()))
    }
}

impl From<ModerationError> for HttpAppError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::Unavailable(detail) => {
                HttpAppError(AppError::ValidationUnavailable(detail))
            }
            ModerationError::StagedRead(e) => {
                HttpAppError(AppError::StagingIo(format!("Staged file unreadable: {}", e)))
            }
        }
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse {
            error: app_error.client_message(),
            details: None,
            error_type: None,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        // Sensitive errors never get a detailed copy.
        let detailed = (!app_error.is_sensitive()).then(|| ErrorResponse {
            details: Some(app_error.detailed_message()),
            error_type: Some(app_error.error_type().to_string()),
            ..body.clone()
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(detailed) = detailed {
            response.extensions_mut().insert(detailed);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_from_accept_error_too_many_files() {
        let err = HttpAppError::from(AcceptError::TooManyFiles(
            "Too many files. Maximum 5 images allowed".to_string(),
        ));
        assert!(matches!(err.0, AppError::TooManyFiles(_)));
        assert_eq!(err.0.http_status_code(), 400);
        assert_eq!(err.0.client_message(), "Too many files. Maximum 5 images allowed");
    }

    #[test]
    fn test_from_accept_error_missing_documents() {
        let err = HttpAppError::from(AcceptError::MissingRequiredField {
            noun: "documents".to_string(),
            fields: vec!["degreeCertificate".to_string()],
        });
        assert!(matches!(err.0, AppError::MissingRequiredField(_)));
        assert_eq!(
            err.0.client_message(),
            "Missing required documents: degreeCertificate"
        );
    }

    #[test]
    fn test_from_accept_error_file_too_large() {
        let err = HttpAppError::from(AcceptError::FileTooLarge {
            field: "identityProof".to_string(),
            max: 5 * 1024 * 1024,
        });
        assert_eq!(err.0.http_status_code(), 413);
        assert_eq!(err.0.client_message(), "File too large. Maximum size is 5 MB");
    }

    #[test]
    fn test_from_accept_error_empty_file_is_invalid_input() {
        let err = HttpAppError::from(AcceptError::EmptyFile("images".to_string()));
        assert!(matches!(err.0, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_from_remote_store_error_hides_detail() {
        let err = HttpAppError::from(RemoteStoreError::UploadFailed(
            "cloudinary returned 401".to_string(),
        ));
        assert!(matches!(err.0, AppError::RemoteUploadFailed(_)));
        assert_eq!(err.0.http_status_code(), 500);
        assert_eq!(err.0.client_message(), "media upload failed");
    }

    #[test]
    fn test_from_remote_store_staged_read_is_staging_error() {
        let err = HttpAppError::from(RemoteStoreError::StagedRead(io::Error::new(
            io::ErrorKind::NotFound,
            "gone",
        )));
        assert!(matches!(err.0, AppError::StagingIo(_)));
    }

    #[test]
    fn test_from_moderation_error_unavailable() {
        let err = HttpAppError::from(ModerationError::Unavailable("timeout".to_string()));
        assert!(matches!(err.0, AppError::ValidationUnavailable(_)));
        assert_eq!(err.0.http_status_code(), 503);
        assert!(err.0.is_recoverable());
    }

    #[test]
    fn test_from_extract_error_is_parse_error() {
        let err = HttpAppError::from(ExtractError::Parse("missing header".to_string()));
        assert_eq!(err.0.http_status_code(), 422);
        assert_eq!(err.0.error_type(), "ParseError");
    }

    #[test]
    fn test_response_body_never_carries_details() {
        let response = HttpAppError::from(AcceptError::UnsupportedType {
            field: "images".to_string(),
            content_type: "text/plain".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let detailed = response
            .extensions()
            .get::<ErrorResponse>()
            .expect("detailed copy for a non-sensitive error");
        assert_eq!(detailed.error_type.as_deref(), Some("UnsupportedType"));
        assert!(detailed.details.is_some());
    }

    #[test]
    fn test_sensitive_error_has_no_detailed_copy() {
        let response = HttpAppError::from(RemoteStoreError::UploadFailed(
            "cloudinary returned 401".to_string(),
        ))
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<ErrorResponse>().is_none());
    }

    #[test]
    fn test_error_response_shape() {
        let body = ErrorResponse {
            error: "media upload failed".to_string(),
            details: None,
            error_type: None,
            code: "REMOTE_UPLOAD_FAILED".to_string(),
            recoverable: true,
            suggested_action: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "media upload failed");
        assert!(json.get("details").is_none());
        assert!(json.get("suggested_action").is_none());
    }
}
