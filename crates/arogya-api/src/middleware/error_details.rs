use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::error::ErrorResponse;
use crate::state::AppState;

/// Error bodies leave handlers without `details`/`error_type`. Outside
/// production the full body carried in the response extensions replaces
/// the public one.
pub async fn error_details_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(detailed) = response.extensions_mut().remove::<ErrorResponse>() else {
        return response;
    };

    if !state.expose_error_details {
        return response;
    }

    (response.status(), Json(detailed)).into_response()
}
