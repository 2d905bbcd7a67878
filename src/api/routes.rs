//! API Routes
//!
//! Configures the Axum router with all math service endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::require_api_key;
use super::handlers::{
    factorial_handler, fibonacci_handler, health_handler, logs_handler, metrics_handler,
    power_handler, stats_handler, AppState,
};
use super::tracking::track_requests;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /`, `GET /health` - Health check (no API key)
/// - `POST /factorial` - n!
/// - `POST /fibonacci` - n-th Fibonacci number
/// - `POST /power` - base ** exponent
/// - `GET /logs` - Audit trail, newest first
/// - `GET /stats` - Memo cache counters
/// - `GET /metrics` - Prometheus request and cache metrics
///
/// # Middleware
/// - Request metrics on every route
/// - API key gate on everything but health
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route("/factorial", post(factorial_handler))
        .route("/fibonacci", post(fibonacci_handler))
        .route("/power", post(power_handler))
        .route("/logs", get(logs_handler))
        .route("/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
