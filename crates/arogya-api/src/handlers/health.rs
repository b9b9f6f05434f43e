use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub remote_store: String,
    pub staging: String,
    pub content_validation: bool,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheckResponse),
        (status = 503, description = "Staging directory unavailable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let staging = match tokio::fs::metadata(state.staging.root()).await {
        Ok(meta) if meta.is_dir() => "healthy".to_string(),
        Ok(_) => "unhealthy: not a directory".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Staging directory health check failed");
            format!("unhealthy: {}", e)
        }
    };
    let healthy = staging == "healthy";

    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        remote_store: state.remote_store.backend_type().to_string(),
        staging,
        content_validation: state.moderation.validator.is_some(),
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(response))
}
