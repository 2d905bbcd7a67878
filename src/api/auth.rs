//! API key gate
//!
//! Rejects requests that lack the configured `X-API-Key` header before they
//! reach a handler.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::handlers::AppState;
use crate::error::ApiError;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Middleware for every route except health.
///
/// Missing header is 401, wrong key is 403.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .ok_or(ApiError::Unauthorized)?;

    if provided.as_bytes() != state.api_key.as_bytes() {
        debug!(path = %request.uri().path(), "rejected request with invalid API key");
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}
