//! API Module
//!
//! HTTP handlers, routing and the API key gate for the math service.
//!
//! # Endpoints
//! - `GET /` and `GET /health` - Health check
//! - `POST /factorial` - Compute n!
//! - `POST /fibonacci` - Compute the n-th Fibonacci number
//! - `POST /power` - Compute base ** exponent
//! - `GET /logs` - Read back the audit trail
//! - `GET /stats` - Memo cache statistics
//! - `GET /metrics` - Prometheus text exposition

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod tracking;

pub use handlers::*;
pub use routes::create_router;
