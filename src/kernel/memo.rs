//! Memoized Kernel Module
//!
//! Bounded LRU memo cache and the thread-safe kernel wrapping one operation.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::MathError;
use crate::kernel::{CacheStats, LruTracker};

// == Memo Cache ==
/// Argument-keyed result storage with LRU eviction.
///
/// Not synchronized; [`MemoKernel`] owns one behind a mutex.
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: HashMap<K, V>,
    lru: LruTracker<K>,
    stats: CacheStats,
    capacity: usize,
}

impl<K, V> MemoCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty cache. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::with_capacity(capacity),
            stats: CacheStats::new(capacity),
            capacity,
        }
    }

    // == Get ==
    /// Returns a copy of the cached value and marks the key most recently used.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.entries.get(key) {
            Some(value) => {
                let value = value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Stores a computed value, evicting the least recently used entry when full.
    ///
    /// Returns the evicted key, if any. Re-inserting a live key keeps the
    /// existing value (results are immutable once cached) and refreshes it.
    pub fn insert(&mut self, key: K, value: V) -> Option<K> {
        if self.entries.contains_key(&key) {
            self.lru.touch(&key);
            return None;
        }

        let mut evicted = None;
        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.entries.remove(&oldest);
                self.stats.record_eviction();
                evicted = Some(oldest);
            }
        }

        self.lru.touch(&key);
        self.entries.insert(key, value);
        self.stats.set_entries(self.entries.len());
        evicted
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_entries(self.entries.len());
        stats
    }

    /// Checks for a key without touching access order or counters.
    #[cfg(test)]
    pub(crate) fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}

// == Memo Kernel ==
/// One operation's pure computation plus its shared memo cache.
///
/// The lock is held only for lookup and insertion, never while computing, so
/// callers working on different keys do not wait on each other. Two callers
/// racing on the same missing key both compute; the first insert wins and the
/// second is a no-op since the kernel is pure.
pub struct MemoKernel<K, V> {
    name: &'static str,
    cache: Mutex<MemoCache<K, V>>,
    compute: fn(&K) -> Result<V, MathError>,
}

impl<K, V> MemoKernel<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: Clone,
{
    pub fn new(
        name: &'static str,
        capacity: usize,
        compute: fn(&K) -> Result<V, MathError>,
    ) -> Self {
        Self {
            name,
            cache: Mutex::new(MemoCache::new(capacity)),
            compute,
        }
    }

    // == Get Or Compute ==
    /// Returns the cached value for `key`, computing and caching it on a miss.
    ///
    /// Failures are returned as-is and never cached.
    pub fn get_or_compute(&self, key: &K) -> Result<V, MathError> {
        if let Some(value) = self.cache.lock().get(key) {
            debug!(kernel = self.name, ?key, "cache hit");
            return Ok(value);
        }

        debug!(kernel = self.name, ?key, "cache miss");
        let value = (self.compute)(key)?;

        if let Some(evicted) = self.cache.lock().insert(key.clone(), value.clone()) {
            debug!(kernel = self.name, ?evicted, "evicted least recently used entry");
        }

        Ok(value)
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    #[cfg(test)]
    pub(crate) fn is_cached(&self, key: &K) -> bool {
        self.cache.lock().contains(key)
    }
}

impl<K, V> fmt::Debug for MemoKernel<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoKernel")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
