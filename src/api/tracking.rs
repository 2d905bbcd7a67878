//! Request metrics
//!
//! Counts every routed request, including those the API key gate rejects.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use super::handlers::AppState;

/// Records method, matched route, status class and latency for each request.
pub async fn track_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().as_str().to_owned();
    let handler = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let started = Instant::now();
    let response = next.run(request).await;

    state
        .metrics
        .observe_request(&method, &handler, response.status().as_u16(), started.elapsed());
    response
}
