//! mathops - A small math operations service
//!
//! Factorial, Fibonacci and power behind memoized kernels, with an audit
//! entry recorded for every call.

pub mod api;
pub mod audit;
pub mod config;
pub mod error;
pub mod kernel;
pub mod metrics;
pub mod models;
pub mod service;

pub use api::AppState;
pub use config::Config;
pub use service::{Calculation, OperationService};
