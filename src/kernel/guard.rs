//! Input Validation and Overflow Guard
//!
//! Domain checks run before a kernel computes; the power overflow guard runs
//! both before (magnitude estimate) and after (finiteness) computation.

use serde_json::Number;

use crate::error::MathError;
use crate::kernel::{MAX_DECIMAL_EXPONENT, MAX_FACTORIAL_N, MAX_FIBONACCI_N};

/// Checks `0 <= n <= max` and returns n as an unsigned value.
fn check_range(n: i64, max: u64) -> Result<u64, MathError> {
    let n = u64::try_from(n)
        .map_err(|_| MathError::Domain("n must be non-negative (n >= 0)".to_string()))?;
    if n > max {
        return Err(MathError::Domain(format!("n must not exceed {}", max)));
    }
    Ok(n)
}

// == Input Validator ==
/// Narrows a received integer of any magnitude to the kernel key type.
///
/// Values beyond the i64 range saturate, so they still fail [`check_range`]
/// with the matching message instead of being dropped before validation.
pub fn clamp_index(n: &Number) -> i64 {
    if let Some(v) = n.as_i64() {
        v
    } else if n.is_u64() {
        i64::MAX
    } else {
        // float casts saturate at the i64 bounds
        n.as_f64().map_or(i64::MAX, |f| f as i64)
    }
}

pub fn validate_factorial(n: i64) -> Result<u64, MathError> {
    check_range(n, MAX_FACTORIAL_N)
}

pub fn validate_fibonacci(n: i64) -> Result<u64, MathError> {
    check_range(n, MAX_FIBONACCI_N)
}

// == Overflow Guard ==
/// Rejects `base ** exponent` whose estimated decimal exponent exceeds the
/// f64 ceiling.
///
/// Only applies to a non-zero base with a positive exponent. Small-magnitude
/// bases and negative exponents fall through to [`check_power_result`].
pub fn check_power_magnitude(base: f64, exponent: f64) -> Result<(), MathError> {
    if base != 0.0 && exponent > 0.0 && exponent * base.abs().log10() > MAX_DECIMAL_EXPONENT {
        return Err(MathError::Overflow);
    }
    Ok(())
}

/// Rejects NaN and infinite results.
pub fn check_power_result(result: f64) -> Result<f64, MathError> {
    if result.is_finite() {
        Ok(result)
    } else {
        Err(MathError::Overflow)
    }
}
