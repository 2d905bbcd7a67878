//! Request DTOs for the math operations API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::{Deserialize, Deserializer};
use serde_json::Number;

use crate::audit::{LogQuery, Operation, Status, MAX_LOG_LIMIT};

/// Body for POST /factorial and POST /fibonacci
///
/// `n` accepts any whole number, including negative values and values beyond
/// the i64 range, so that out-of-range input reaches the validator and gets
/// audited. Fractional numbers are rejected here.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexRequest {
    #[serde(deserialize_with = "whole_number")]
    pub n: Number,
}

fn whole_number<'de, D>(deserializer: D) -> Result<Number, D::Error>
where
    D: Deserializer<'de>,
{
    let n = Number::deserialize(deserializer)?;
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() != 0.0 => {
            Err(serde::de::Error::custom("n must be an integer"))
        }
        _ => Ok(n),
    }
}

/// Body for POST /power
#[derive(Debug, Clone, Deserialize)]
pub struct PowerRequest {
    pub base: f64,
    pub exponent: f64,
}

/// Query string for GET /logs
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsParams {
    /// Filter by operation name
    pub operation: Option<String>,
    /// Filter by "success" or "error"
    pub status: Option<String>,
    /// Maximum rows, at most 300
    pub limit: Option<usize>,
}

impl LogsParams {
    /// Converts the raw parameters into a [`LogQuery`].
    ///
    /// Returns an error message if a parameter is out of range or unknown.
    pub fn into_query(self) -> Result<LogQuery, String> {
        let limit = self.limit.unwrap_or(MAX_LOG_LIMIT);
        if limit > MAX_LOG_LIMIT {
            return Err(format!("limit must not exceed {}", MAX_LOG_LIMIT));
        }

        Ok(LogQuery {
            operation: self.operation.map(|s| s.parse::<Operation>()).transpose()?,
            status: self.status.map(|s| s.parse::<Status>()).transpose()?,
            limit,
        })
    }
}
