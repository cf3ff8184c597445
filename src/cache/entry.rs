//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

// == Cache Entry ==
/// A cached payload stamped with its insertion time and lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    /// The cached payload
    pub data: T,
    /// Insertion timestamp (Unix milliseconds)
    pub timestamp: u64,
    /// Lifetime in milliseconds, measured from `timestamp`
    pub ttl: u64,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates a new entry stamped at `now_ms`.
    pub fn new(data: T, now_ms: u64, ttl: u64) -> Self {
        Self {
            data,
            timestamp: now_ms,
            ttl,
        }
    }

    // == Is Fresh ==
    /// Checks whether the entry is still valid at `now_ms`.
    ///
    /// Boundary condition: the entry is fresh while `now - timestamp < ttl`,
    /// so a zero TTL is never fresh and an entry is stale the instant its
    /// full TTL has elapsed. A clock reading earlier than `timestamp` counts
    /// as zero elapsed time.
    pub fn is_fresh(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) < self.ttl
    }

    /// Inverse of [`CacheEntry::is_fresh`].
    pub fn is_expired(&self, now_ms: u64) -> bool {
        !self.is_fresh(now_ms)
    }

    // == Time To Live ==
    /// Returns remaining lifetime in milliseconds at `now_ms`, `0` once stale.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.timestamp);
        self.ttl.saturating_sub(elapsed)
    }
}
