//! Cache Statistics Module
//!
//! Tracks instrumented cache outcomes: hits, misses and failed fetches.

use serde::Serialize;

// == Cache Stats ==
/// Outcome counters for one instrumented cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Calls answered from a live cached result
    pub hits: u64,
    /// Calls that had to invoke the wrapped operation
    pub misses: u64,
    /// Misses where the wrapped operation failed
    pub failures: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Failure ==
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }
}
