//! Pure math kernels
//!
//! Each function validates its own input so that a memo kernel can wrap it
//! directly. None of them keep state between calls.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::error::MathError;
use crate::kernel::guard::{
    check_power_magnitude, check_power_result, validate_factorial, validate_fibonacci,
};

// == Power Key ==
/// Cache key for power: the exact (base, exponent) pair.
///
/// Stored as bit patterns so it can be hashed. Negative zero is folded into
/// positive zero so keys compare by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PowerKey {
    base: u64,
    exponent: u64,
}

impl PowerKey {
    pub fn new(base: f64, exponent: f64) -> Self {
        Self {
            base: normalized_bits(base),
            exponent: normalized_bits(exponent),
        }
    }

    pub fn base(&self) -> f64 {
        f64::from_bits(self.base)
    }

    pub fn exponent(&self) -> f64 {
        f64::from_bits(self.exponent)
    }
}

fn normalized_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0f64.to_bits()
    } else {
        x.to_bits()
    }
}

// == Factorial ==
/// n! computed as an iterative product 2..=n.
pub fn factorial(n: &i64) -> Result<BigUint, MathError> {
    let n = validate_factorial(*n)?;
    let mut result = BigUint::one();
    for k in 2..=n {
        result *= k;
    }
    Ok(result)
}

// == Fibonacci ==
/// F(n) with F(0) = 0, F(1) = 1, by n pair updates.
pub fn fibonacci(n: &i64) -> Result<BigUint, MathError> {
    let n = validate_fibonacci(*n)?;
    let mut a = BigUint::zero();
    let mut b = BigUint::one();
    for _ in 0..n {
        let next = &a + &b;
        a = std::mem::replace(&mut b, next);
    }
    Ok(a)
}

// == Power ==
/// base ** exponent with overflow detection on both sides of the computation.
pub fn power(key: &PowerKey) -> Result<f64, MathError> {
    let (base, exponent) = (key.base(), key.exponent());
    check_power_magnitude(base, exponent)?;
    check_power_result(base.powf(exponent))
}
