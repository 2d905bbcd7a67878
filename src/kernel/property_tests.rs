//! Property-Based Tests for the Kernel Module
//!
//! Uses proptest to check the memo cache bound, eviction order and kernel
//! determinism.

use num_bigint::BigUint;
use proptest::prelude::*;

use crate::error::MathError;
use crate::kernel::{
    factorial, fibonacci, power, MemoCache, MemoKernel, PowerKey, DEFAULT_CACHE_CAPACITY,
    MAX_FACTORIAL_N, MAX_FIBONACCI_N,
};

// == Strategies ==
#[derive(Debug, Clone)]
enum CacheOp {
    Get(u16),
    Insert(u16),
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (0u16..300).prop_map(CacheOp::Get),
        (0u16..300).prop_map(CacheOp::Insert),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Live entries never exceed capacity, and the counters agree with the
    // operations that were issued.
    #[test]
    fn prop_capacity_and_counters(
        capacity in 1usize..64,
        ops in prop::collection::vec(cache_op_strategy(), 1..400)
    ) {
        let mut cache = MemoCache::new(capacity);
        let mut lookups = 0u64;

        for op in ops {
            match op {
                CacheOp::Get(k) => {
                    lookups += 1;
                    if let Some(v) = cache.get(&k) {
                        prop_assert_eq!(v, u32::from(k) * 3);
                    }
                }
                CacheOp::Insert(k) => {
                    cache.insert(k, u32::from(k) * 3);
                }
            }
            prop_assert!(cache.len() <= capacity, "len {} > capacity {}", cache.len(), capacity);
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits + stats.misses, lookups);
        prop_assert_eq!(stats.entries, cache.len());
    }

    // With the cache full, inserting a new key evicts the key that was
    // touched longest ago.
    #[test]
    fn prop_lru_eviction_order(
        capacity in 2usize..32,
        touched in prop::collection::vec(any::<prop::sample::Index>(), 0..16)
    ) {
        let mut cache = MemoCache::new(capacity);
        let keys: Vec<usize> = (0..capacity).collect();
        let mut order = keys.clone();

        for k in &keys {
            cache.insert(*k, *k);
        }
        for idx in touched {
            let k = *idx.get(&keys);
            cache.get(&k);
            order.retain(|x| *x != k);
            order.push(k);
        }

        let evicted = cache.insert(capacity, capacity);
        prop_assert_eq!(evicted, Some(order[0]));
        prop_assert!(!cache.contains(&order[0]));
        for k in &order[1..] {
            prop_assert!(cache.contains(k));
        }
    }

    // Re-querying a key after it has been evicted yields the original value.
    #[test]
    fn prop_recompute_after_eviction_matches(n in 0i64..=(MAX_FIBONACCI_N as i64)) {
        let kernel = MemoKernel::<i64, BigUint>::new("fibonacci", 4, fibonacci);
        let first = kernel.get_or_compute(&n).unwrap();

        for filler in 0..8i64 {
            let key = if filler >= n { filler + 1 } else { filler };
            kernel.get_or_compute(&key).unwrap();
        }
        prop_assert!(!kernel.is_cached(&n));

        let second = kernel.get_or_compute(&n).unwrap();
        prop_assert_eq!(first, second);
    }

    // n! = n * (n-1)!
    #[test]
    fn prop_factorial_recurrence(n in 1i64..=(MAX_FACTORIAL_N as i64)) {
        let prev = factorial(&(n - 1)).unwrap();
        let cur = factorial(&n).unwrap();
        prop_assert_eq!(cur, prev * BigUint::from(n as u64));
    }

    // F(n) = F(n-1) + F(n-2)
    #[test]
    fn prop_fibonacci_recurrence(n in 2i64..=(MAX_FIBONACCI_N as i64)) {
        let a = fibonacci(&(n - 2)).unwrap();
        let b = fibonacci(&(n - 1)).unwrap();
        prop_assert_eq!(fibonacci(&n).unwrap(), a + b);
    }

    // Out-of-range n is always a domain error.
    #[test]
    fn prop_out_of_range_is_domain_error(
        n in prop_oneof![i64::MIN..0i64, (MAX_FIBONACCI_N as i64 + 1)..i64::MAX]
    ) {
        prop_assert!(factorial(&n).unwrap_err().is_domain());
        prop_assert!(fibonacci(&n).unwrap_err().is_domain());
    }

    // power either returns a finite value or reports overflow.
    #[test]
    fn prop_power_is_finite_or_overflow(base in -1e6f64..1e6, exponent in -400f64..400.0) {
        match power(&PowerKey::new(base, exponent)) {
            Ok(v) => prop_assert!(v.is_finite()),
            Err(e) => prop_assert_eq!(e, MathError::Overflow),
        }
    }
}

#[test]
fn test_default_capacity_bound_on_kernel() {
    let kernel = MemoKernel::<i64, BigUint>::new("factorial", DEFAULT_CACHE_CAPACITY, factorial);

    for n in 0..=(MAX_FACTORIAL_N as i64) {
        kernel.get_or_compute(&n).unwrap();
    }

    let stats = kernel.stats();
    assert_eq!(stats.entries, DEFAULT_CACHE_CAPACITY);
    assert_eq!(stats.evictions, (MAX_FACTORIAL_N as u64 + 1) - DEFAULT_CACHE_CAPACITY as u64);
    // the oldest keys went first
    assert!(!kernel.is_cached(&0));
    assert!(kernel.is_cached(&(MAX_FACTORIAL_N as i64)));
}
