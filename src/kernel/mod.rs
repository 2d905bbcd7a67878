//! Kernel Module
//!
//! Memoized math kernels with input validation and overflow detection.

mod guard;
mod lru;
mod memo;
mod ops;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use guard::{
    check_power_magnitude, check_power_result, clamp_index, validate_factorial,
    validate_fibonacci,
};
pub use lru::LruTracker;
pub use memo::{MemoCache, MemoKernel};
pub use ops::{factorial, fibonacci, power, PowerKey};
pub use stats::CacheStats;

// == Public Constants ==
/// Largest n whose factorial fits a finite f64
pub const MAX_FACTORIAL_N: u64 = 170;

/// Largest n whose Fibonacci number fits a finite f64
pub const MAX_FIBONACCI_N: u64 = 1_476;

/// Decimal exponent ceiling of an f64
pub const MAX_DECIMAL_EXPONENT: f64 = 308.0;

/// Default live entries per kernel
pub const DEFAULT_CACHE_CAPACITY: usize = 128;
