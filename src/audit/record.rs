//! Audit record types
//!
//! One record is created per service call and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::error::MathError;

/// Maximum entries returned by a log query
pub const MAX_LOG_LIMIT: usize = 300;

// == Operation ==
/// The closed set of math operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Factorial,
    Fibonacci,
    Power,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Factorial => "factorial",
            Operation::Fibonacci => "fibonacci",
            Operation::Power => "power",
        }
    }

    /// Fixed message recorded on success.
    pub fn success_message(&self) -> &'static str {
        match self {
            Operation::Factorial => "Factorial calculated successfully",
            Operation::Fibonacci => "Fibonacci calculated successfully",
            Operation::Power => "Power calculated successfully",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "factorial" => Ok(Operation::Factorial),
            "fibonacci" => Ok(Operation::Fibonacci),
            "power" => Ok(Operation::Power),
            other => Err(format!("Unknown operation: {}", other)),
        }
    }
}

// == Status ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Status::Success),
            "error" => Ok(Status::Error),
            other => Err(format!("Unknown status: {}", other)),
        }
    }
}

// == Audit Record ==
/// Outcome of one service call, before it is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub operation: Operation,
    /// Parameter name to value, exactly as received
    pub input: Map<String, Value>,
    /// Absent on failure
    pub result: Option<f64>,
    pub status: Status,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn success(operation: Operation, input: Map<String, Value>, result: f64) -> Self {
        Self {
            operation,
            input,
            result: Some(result),
            status: Status::Success,
            message: operation.success_message().to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn failure(operation: Operation, input: Map<String, Value>, error: &MathError) -> Self {
        Self {
            operation,
            input,
            result: None,
            status: Status::Error,
            message: error.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Builds the `{n: ...}` input map used by factorial and fibonacci.
pub fn n_input(n: impl Into<Number>) -> Map<String, Value> {
    let mut input = Map::new();
    input.insert("n".to_string(), Value::Number(n.into()));
    input
}

/// Builds the `{base: ..., exponent: ...}` input map used by power.
pub fn power_input(base: f64, exponent: f64) -> Map<String, Value> {
    let mut input = Map::new();
    input.insert("base".to_string(), Value::from(base));
    input.insert("exponent".to_string(), Value::from(exponent));
    input
}

// == Audit Entry ==
/// A persisted audit record with its store-generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: u64,
    #[serde(flatten)]
    pub record: AuditRecord,
}

impl AuditEntry {
    pub fn new(id: u64, record: AuditRecord) -> Self {
        Self { id, record }
    }
}

// == Log Query ==
/// Filter for reading back the audit trail, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct LogQuery {
    pub operation: Option<Operation>,
    pub status: Option<Status>,
    pub limit: usize,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            operation: None,
            status: None,
            limit: MAX_LOG_LIMIT,
        }
    }
}

impl LogQuery {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.operation.map_or(true, |op| entry.record.operation == op)
            && self.status.map_or(true, |st| entry.record.status == st)
    }

    /// Filters, sorts newest first and truncates to the limit.
    pub fn apply<'a, I>(&self, entries: I) -> Vec<AuditEntry>
    where
        I: IntoIterator<Item = &'a AuditEntry>,
    {
        let mut selected: Vec<AuditEntry> = entries
            .into_iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            b.record
                .timestamp
                .cmp(&a.record.timestamp)
                .then(b.id.cmp(&a.id))
        });
        selected.truncate(self.limit);
        selected
    }
}
