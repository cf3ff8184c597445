//! Response Cache Module
//!
//! Shared, lock-protected store plus the fetch-or-populate path every
//! upstream call goes through.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, CacheStore, SharedClock, SystemClock};

// == Response Cache ==
/// Cache owned by a client for the responses of its upstream calls.
///
/// Cloning yields another handle to the same store.
#[derive(Debug)]
pub struct ResponseCache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
    enabled: bool,
}

impl<V> Clone for ResponseCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            enabled: self.enabled,
        }
    }
}

impl<V: Clone> ResponseCache<V> {
    /// Creates an enabled cache on the system clock.
    pub fn new(default_ttl: u64) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an enabled cache reading time from `clock`.
    pub fn with_clock(default_ttl: u64, clock: SharedClock) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::with_clock(default_ttl, clock))),
            enabled: true,
        }
    }

    /// Turns the fetch path into a pass-through when `enabled` is false.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // == Get Or Fetch ==
    /// Returns the fresh cached value for `key`, or runs `producer` and
    /// caches its successful result for `ttl` milliseconds (store default
    /// when `None`).
    ///
    /// A producer error is returned as-is and nothing is written, so any
    /// stale entry under `key` is left exactly as it was. The store lock is
    /// released while the producer runs; concurrent misses on the same key
    /// may each call their producer, and the last write wins.
    ///
    /// A `delete` or `clear` that lands while the producer runs wins: the
    /// result is returned but not stored.
    ///
    /// With caching disabled the store is neither read nor written.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<u64>,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !self.enabled {
            debug!(key, "cache disabled, calling producer");
            return producer().await;
        }

        let generation = {
            let mut store = self.store.write().await;
            if let Some(value) = store.get_fresh(key).cloned() {
                store.stats_mut().record_hit();
                debug!(key, "cache hit");
                return Ok(value);
            }
            store.stats_mut().record_miss();
            store.generation()
        };

        debug!(key, "cache miss, calling producer");
        let value = producer().await?;

        let mut store = self.store.write().await;
        if store.generation() != generation {
            debug!(key, "cache invalidated during fetch, result not stored");
            return Ok(value);
        }
        store.set(key, value.clone(), ttl);
        debug!(key, ?ttl, "cached producer result");
        Ok(value)
    }

    // == Store Passthroughs ==
    /// Fresh value for `key`, evicting it if stale.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    pub async fn set(&self, key: &str, value: V, ttl: Option<u64>) {
        self.store.write().await.set(key, value, ttl);
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.read().await.has(key)
    }

    /// Raw entry for `key` regardless of freshness.
    pub async fn peek(&self, key: &str) -> Option<CacheEntry<V>> {
        self.store.read().await.peek(key).cloned()
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.store.write().await.delete(key)
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
        debug!("cache cleared");
    }

    pub async fn purge_expired(&self) -> usize {
        self.store.write().await.purge_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}
