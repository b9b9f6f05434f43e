use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::{MediaIngestionService, PostResponse};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/v0/posts/media",
    tag = "posts",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Up to 5 files under `images`, one optional `video`, plus text fields such as `title`"),
    responses(
        (status = 201, description = "Media uploaded and attached to a draft post", body = PostResponse),
        (status = 400, description = "Upload constraint violated", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Media upload failed", body = ErrorResponse),
        (status = 503, description = "Content validation unavailable", body = ErrorResponse)
    )
)]
pub async fn upload_post_media(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let post = MediaIngestionService::new(&state)
        .ingest_post(multipart)
        .await?;

    Ok((StatusCode::CREATED, Json(PostResponse { post })))
}
