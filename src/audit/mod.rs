//! Audit Module
//!
//! Records one entry per service call, success or failure.

mod record;
mod sink;

use std::sync::Arc;

pub use record::{
    n_input, power_input, AuditEntry, AuditRecord, LogQuery, Operation, Status, MAX_LOG_LIMIT,
};
pub use sink::{AuditSink, FileAuditSink, MemoryAuditSink};

use crate::error::StorageError;

/// Value of `AUDIT_LOG_PATH` selecting the in-memory sink
pub const MEMORY_SINK: &str = ":memory:";

/// Builds the sink named by a configured audit path.
pub async fn open_sink(path: &str) -> Result<Arc<dyn AuditSink>, StorageError> {
    if path == MEMORY_SINK {
        Ok(Arc::new(MemoryAuditSink::new()))
    } else {
        Ok(Arc::new(FileAuditSink::new(path).await?))
    }
}
