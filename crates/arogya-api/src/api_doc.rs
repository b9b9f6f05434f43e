//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::services::upload;
use arogya_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Arogya Media API",
        version = "0.1.0",
        description = "Media ingestion for Arogyapath: post media with content validation and expert verification documents with PDF text extraction. Upload endpoints are versioned under /api/v0/."
    ),
    paths(
        handlers::post_media::upload_post_media,
        handlers::expert_documents::upload_expert_documents,
        handlers::health::health_check,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::health::HealthCheckResponse,
        upload::PostResponse,
        upload::PostDraft,
        upload::InvalidMark,
        upload::VerificationResponse,
        upload::VerificationRecord,
        upload::VerificationDocument,
        upload::VerificationStatus,
        models::RemoteAsset,
        models::ResourceKind,
        models::ExtractedText,
    )),
    tags(
        (name = "posts", description = "Post media upload"),
        (name = "experts", description = "Expert verification documents"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
