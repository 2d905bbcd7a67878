//! API Handlers
//!
//! HTTP request handlers for each math service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::audit::{self, Operation};
use crate::config::Config;
use crate::error::{ApiError, InitError, Result};
use crate::metrics::Metrics;
use crate::models::{
    CalculationResponse, HealthResponse, IndexRequest, LogsParams, PowerRequest, StatsResponse,
};
use crate::service::OperationService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OperationService>,
    pub metrics: Arc<Metrics>,
    /// Value the X-API-Key header must carry
    pub api_key: Arc<str>,
}

impl AppState {
    pub fn new(
        service: OperationService,
        api_key: impl Into<String>,
    ) -> std::result::Result<Self, prometheus::Error> {
        Ok(Self {
            service: Arc::new(service),
            metrics: Arc::new(Metrics::new()?),
            api_key: Arc::from(api_key.into()),
        })
    }

    /// Opens the configured audit store and builds the service around it.
    pub async fn from_config(config: &Config) -> std::result::Result<Self, InitError> {
        let sink = audit::open_sink(&config.audit_log_path).await?;
        let service = OperationService::new(sink, config.cache_capacity);
        Ok(Self::new(service, config.api_key.clone())?)
    }
}

type Created = (StatusCode, Json<CalculationResponse>);

/// Handler for POST /factorial
pub async fn factorial_handler(
    State(state): State<AppState>,
    Json(req): Json<IndexRequest>,
) -> Result<Created> {
    let calc = state.service.factorial(req.n).await?;
    Ok((StatusCode::CREATED, Json(calc.entry.into())))
}

/// Handler for POST /fibonacci
pub async fn fibonacci_handler(
    State(state): State<AppState>,
    Json(req): Json<IndexRequest>,
) -> Result<Created> {
    let calc = state.service.fibonacci(req.n).await?;
    Ok((StatusCode::CREATED, Json(calc.entry.into())))
}

/// Handler for POST /power
pub async fn power_handler(
    State(state): State<AppState>,
    Json(req): Json<PowerRequest>,
) -> Result<Created> {
    let calc = state.service.power(req.base, req.exponent).await?;
    Ok((StatusCode::CREATED, Json(calc.entry.into())))
}

/// Handler for GET /logs
///
/// Returns the most recent audit entries, optionally filtered by operation
/// and status.
pub async fn logs_handler(
    State(state): State<AppState>,
    Query(params): Query<LogsParams>,
) -> Result<Json<Vec<CalculationResponse>>> {
    let query = params.into_query().map_err(ApiError::InvalidRequest)?;
    let entries = state.service.logs(&query).await?;
    Ok(Json(entries.into_iter().map(CalculationResponse::from).collect()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let service = &state.service;
    Json(StatsResponse {
        factorial: service.cache_stats(Operation::Factorial).into(),
        fibonacci: service.cache_stats(Operation::Fibonacci).into(),
        power: service.cache_stats(Operation::Power).into(),
    })
}

/// Handler for GET /metrics
///
/// Refreshes the cache gauges from the kernels, then renders the registry.
pub async fn metrics_handler(State(state): State<AppState>) -> Result<Response> {
    for operation in [Operation::Factorial, Operation::Fibonacci, Operation::Power] {
        let stats = state.service.cache_stats(operation);
        state.metrics.record_cache(operation, &stats);
    }

    let body = state
        .metrics
        .render()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response())
}

/// Handler for GET / and GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
