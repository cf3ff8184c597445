//! Cache Store Module
//!
//! Main cache engine: a HashMap of TTL-tagged entries with lazy expiry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{CacheEntry, CacheStats, SharedClock, SystemClock};

// == Cache Store ==
/// Key to entry mapping with expiry evaluated at read time.
///
/// Stale entries stay in the map until a read finds them, an explicit
/// delete/clear/purge removes them, or a new `set` overwrites them.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Default TTL in milliseconds for entries without explicit TTL
    default_ttl: u64,
    /// Time source for stamping and aging entries
    clock: SharedClock,
    /// Bumped by every delete and clear
    generation: u64,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore on the system clock.
    ///
    /// # Arguments
    /// * `default_ttl` - Default TTL in milliseconds for entries without explicit TTL
    pub fn new(default_ttl: u64) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates a new CacheStore reading time from `clock`.
    pub fn with_clock(default_ttl: u64, clock: SharedClock) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
            clock,
            generation: 0,
        }
    }

    // == Set ==
    /// Stores a value, replacing any entry under the same key.
    ///
    /// The entry is stamped with the current time, so an overwrite also
    /// restarts its lifetime.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Optional TTL in milliseconds (uses default_ttl if None)
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<u64>) {
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.into(), entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns the value if found and fresh. A stale entry is removed and
    /// counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_fresh(now) => {
                let value = entry.data.clone();
                self.stats.record_hit();
                Some(value)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expirations(1);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Get Fresh ==
    /// Returns the value if fresh without touching statistics or evicting.
    pub fn get_fresh(&self, key: &str) -> Option<&V> {
        let now = self.clock.now_ms();
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| &entry.data)
    }

    // == Has ==
    /// Returns true if a fresh entry exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.get_fresh(key).is_some()
    }

    // == Peek ==
    /// Returns the raw entry for `key`, fresh or stale.
    pub fn peek(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    // == Delete ==
    /// Removes an entry by key, fresh or stale.
    ///
    /// Returns whether an entry existed.
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.entries.remove(key).is_some();
        self.generation += 1;
        self.stats.set_total_entries(self.entries.len());
        existed
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
        self.stats.set_total_entries(0);
    }

    /// Invalidation counter, bumped by every `delete` and `clear`.
    ///
    /// A value read from upstream before the counter moved may describe
    /// state that the invalidation was meant to discard.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // == Purge Expired ==
    /// Removes all stale entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut CacheStats {
        &mut self.stats
    }

    /// Default TTL in milliseconds.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Length ==
    /// Returns the number of entries held, including stale ones not yet removed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
