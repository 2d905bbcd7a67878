//! Error types for the math operations service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::audit::AuditEntry;
use crate::models::CalculationResponse;

// == Math Error Enum ==
/// Failure raised by a kernel before or after computing a value.
///
/// The Display text is the message recorded in the audit trail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Input outside the operation's accepted range
    #[error("{0}")]
    Domain(String),

    /// Result not representable as a finite 64-bit float
    #[error("Result overflows 64\u{2011}bit float; try smaller exponent or base")]
    Overflow,
}

impl MathError {
    pub fn is_domain(&self) -> bool {
        matches!(self, MathError::Domain(_))
    }

    pub fn is_overflow(&self) -> bool {
        matches!(self, MathError::Overflow)
    }
}

// == Storage Error Enum ==
/// Failure while persisting or reading audit entries.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying file could not be opened, written or read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded or a stored line could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Service Error Enum ==
/// Outcome of a failed OperationService call.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Input was rejected; the failure has already been audited as `entry`
    #[error("{source}")]
    Rejected {
        source: MathError,
        entry: AuditEntry,
    },

    /// The audit record could not be persisted
    #[error("Audit storage failed: {0}")]
    Storage(#[from] StorageError),
}

// == Init Error Enum ==
/// Failure while building the application state at startup.
#[derive(Error, Debug)]
pub enum InitError {
    /// The audit store could not be opened
    #[error("Audit store unavailable: {0}")]
    Storage(#[from] StorageError),

    /// The metrics registry rejected a metric
    #[error("Metrics registration failed: {0}")]
    Metrics(#[from] prometheus::Error),
}

// == API Error Enum ==
/// Error type returned by HTTP handlers and middleware.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Calculation rejected by the kernel
    #[error("{}", .0.message)]
    Rejected(Box<CalculationResponse>),

    /// No X-API-Key header on the request
    #[error("Missing X-API-Key header")]
    Unauthorized,

    /// X-API-Key header present but wrong
    #[error("Invalid API key")]
    Forbidden,

    /// Query or body parameters out of range
    #[error("{0}")]
    InvalidRequest(String),

    /// Audit store failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Rejected { entry, .. } => {
                ApiError::Rejected(Box::new(CalculationResponse::from(entry)))
            }
            ServiceError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Rejected(detail) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail }))).into_response()
            }
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "API Key")],
                Json(json!({ "detail": ApiError::Unauthorized.to_string() })),
            )
                .into_response(),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "detail": ApiError::Forbidden.to_string() })),
            )
                .into_response(),
            ApiError::InvalidRequest(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": msg }))).into_response()
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": msg }))).into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
