//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::kernel::DEFAULT_CACHE_CAPACITY;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Key expected in the X-API-Key header
    pub api_key: String,
    /// Audit log file, or `:memory:` for the in-memory store
    pub audit_log_path: String,
    /// Maximum memoized results per operation
    pub cache_capacity: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `API_KEY` - Required X-API-Key value (default: "default_key")
    /// - `AUDIT_LOG_PATH` - Audit log location (default: "data/audit.jsonl")
    /// - `CACHE_CAPACITY` - Memoized results per operation (default: 128)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            api_key: env::var("API_KEY")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_key),
            audit_log_path: env::var("AUDIT_LOG_PATH")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.audit_log_path),
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|&c| c > 0)
                .unwrap_or(defaults.cache_capacity),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            api_key: "default_key".to_string(),
            audit_log_path: "data/audit.jsonl".to_string(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
