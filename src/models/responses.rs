//! Response DTOs for the math operations API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::audit::{AuditEntry, Operation, Status};
use crate::kernel::CacheStats;

/// Body for a calculation or a logged call.
///
/// Same fields as the audit record, without the store id. Also used as the
/// `detail` payload of a rejected calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub operation: Operation,
    pub input: Map<String, Value>,
    pub result: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub status: Status,
    pub message: String,
}

impl From<AuditEntry> for CalculationResponse {
    fn from(entry: AuditEntry) -> Self {
        let record = entry.record;
        Self {
            operation: record.operation,
            input: record.input,
            result: record.result,
            timestamp: record.timestamp,
            status: record.status,
            message: record.message,
        }
    }
}

/// Response body for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Counters for one memoized kernel
#[derive(Debug, Clone, Serialize)]
pub struct KernelStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
    pub capacity: usize,
    pub hit_rate: f64,
}

impl From<CacheStats> for KernelStatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            entries: stats.entries,
            capacity: stats.capacity,
        }
    }
}

/// Response body for GET /stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub factorial: KernelStatsResponse,
    pub fibonacci: KernelStatsResponse,
    pub power: KernelStatsResponse,
}
