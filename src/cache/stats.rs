//! Cache Statistics Module
//!
//! Counters kept by a response cache: fresh reads, misses and the stale
//! entries that were dropped.

use serde::Serialize;

/// Counters for one response cache.
///
/// A stale entry found by `get` counts once as a miss and once as an
/// expiration; purged entries only count as expirations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads answered with a fresh entry
    pub hits: u64,
    /// Reads that found nothing fresh (absent or stale)
    pub misses: u64,
    /// Stale entries physically removed, by reads or purges
    pub expirations: u64,
    /// Entries held right now, fresh or stale
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads served so far, fresh or not.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups answered from the cache; 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
