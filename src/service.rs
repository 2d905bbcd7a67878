//! Operation Service
//!
//! Runs each math operation through its memoized kernel and writes exactly one
//! audit entry per call before returning to the caller.

use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde_json::{Map, Number, Value};
use tracing::{error, info, warn};

use crate::audit::{
    n_input, power_input, AuditEntry, AuditRecord, AuditSink, LogQuery, Operation,
};
use crate::error::{MathError, ServiceError, StorageError};
use crate::kernel::{self, CacheStats, MemoKernel, PowerKey};

/// A successful calculation together with its persisted audit entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation<T> {
    pub value: T,
    pub entry: AuditEntry,
}

// == Operation Service ==
pub struct OperationService {
    factorial: MemoKernel<i64, BigUint>,
    fibonacci: MemoKernel<i64, BigUint>,
    power: MemoKernel<PowerKey, f64>,
    audit: Arc<dyn AuditSink>,
}

impl OperationService {
    /// Creates a service whose kernels each hold up to `cache_capacity` results.
    pub fn new(audit: Arc<dyn AuditSink>, cache_capacity: usize) -> Self {
        Self {
            factorial: MemoKernel::new("factorial", cache_capacity, kernel::factorial),
            fibonacci: MemoKernel::new("fibonacci", cache_capacity, kernel::fibonacci),
            power: MemoKernel::new("power", cache_capacity, kernel::power),
            audit,
        }
    }

    // == Factorial ==
    /// `n` is recorded exactly as received; magnitudes beyond i64 are
    /// rejected by the range check like any other out-of-range value.
    pub async fn factorial(
        &self,
        n: impl Into<Number>,
    ) -> Result<Calculation<BigUint>, ServiceError> {
        let n = n.into();
        let outcome = self.factorial.get_or_compute(&kernel::clamp_index(&n));
        self.finish(Operation::Factorial, n_input(n), outcome, big_to_f64)
            .await
    }

    // == Fibonacci ==
    pub async fn fibonacci(
        &self,
        n: impl Into<Number>,
    ) -> Result<Calculation<BigUint>, ServiceError> {
        let n = n.into();
        let outcome = self.fibonacci.get_or_compute(&kernel::clamp_index(&n));
        self.finish(Operation::Fibonacci, n_input(n), outcome, big_to_f64)
            .await
    }

    // == Power ==
    pub async fn power(&self, base: f64, exponent: f64) -> Result<Calculation<f64>, ServiceError> {
        let outcome = self.power.get_or_compute(&PowerKey::new(base, exponent));
        self.finish(Operation::Power, power_input(base, exponent), outcome, |v: &f64| *v)
            .await
    }

    /// Audits the kernel outcome, then hands it back to the caller.
    ///
    /// A rejected input is returned only after its error entry is stored. If
    /// the store fails, the storage error replaces the outcome, including a
    /// successful one.
    async fn finish<T>(
        &self,
        operation: Operation,
        input: Map<String, Value>,
        outcome: Result<T, MathError>,
        as_f64: fn(&T) -> f64,
    ) -> Result<Calculation<T>, ServiceError> {
        match outcome {
            Ok(value) => {
                let record = AuditRecord::success(operation, input, as_f64(&value));
                let entry = self.persist(record).await?;
                info!(%operation, id = entry.id, "calculation succeeded");
                Ok(Calculation { value, entry })
            }
            Err(source) => {
                let record = AuditRecord::failure(operation, input, &source);
                let entry = self.persist(record).await?;
                warn!(%operation, id = entry.id, reason = %source, "calculation rejected");
                Err(ServiceError::Rejected { source, entry })
            }
        }
    }

    async fn persist(&self, record: AuditRecord) -> Result<AuditEntry, StorageError> {
        let operation = record.operation;
        self.audit.append(record).await.map_err(|e| {
            error!(%operation, error = %e, "failed to persist audit record");
            e
        })
    }

    // == Logs ==
    pub async fn logs(&self, query: &LogQuery) -> Result<Vec<AuditEntry>, StorageError> {
        self.audit.query(query).await
    }

    // == Cache Stats ==
    pub fn cache_stats(&self, operation: Operation) -> CacheStats {
        match operation {
            Operation::Factorial => self.factorial.stats(),
            Operation::Fibonacci => self.fibonacci.stats(),
            Operation::Power => self.power.stats(),
        }
    }
}

fn big_to_f64(value: &BigUint) -> f64 {
    value.to_f64().unwrap_or(f64::INFINITY)
}
