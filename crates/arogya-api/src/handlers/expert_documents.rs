use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::{MediaIngestionService, VerificationResponse};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// Submit expert verification documents.
///
/// `identityProof`, `degreeCertificate` and `registrationProof` are required;
/// `practiceProof` is optional. Each field carries exactly one file.
#[utoipa::path(
    post,
    path = "/api/v0/experts/documents",
    tag = "experts",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Documents uploaded, verification pending", body = VerificationResponse),
        (status = 400, description = "Upload constraint violated", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Malformed PDF document", body = ErrorResponse),
        (status = 500, description = "Media upload failed", body = ErrorResponse)
    )
)]
pub async fn upload_expert_documents(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let verification = MediaIngestionService::new(&state)
        .ingest_expert_documents(multipart)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(VerificationResponse { verification }),
    ))
}
