//! Cache Store Module
//!
//! Plain key-value storage for lookup results. Concurrency is provided by the
//! `RwLock` the owning cache wraps around it, so every method here is
//! synchronous and takes the current instant explicitly where time matters.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::CacheEntry;
use crate::key::CacheKey;

// == Cache Store ==
/// Mapping from cache key to the last successful lookup for it.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    // == Lookup ==
    /// Returns the entry for `key` regardless of freshness.
    pub fn lookup(&self, key: &CacheKey) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Returns the entry for `key` only if it is fresh at `now`.
    pub fn lookup_fresh(
        &self,
        key: &CacheKey,
        now: Instant,
        ttl: Duration,
    ) -> Option<&CacheEntry<V>> {
        self.lookup(key).filter(|entry| entry.is_fresh(now, ttl))
    }

    // == Store ==
    /// Stores `entry` under `key`, replacing any previous entry.
    pub fn store(&mut self, key: CacheKey, entry: CacheEntry<V>) {
        self.entries.insert(key, entry);
    }

    // == Sweep ==
    /// Removes every entry that is stale at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, now: Instant, ttl: Duration) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, entry| {
            let keep = entry.is_fresh(now, ttl);
            if !keep {
                tracing::debug!(key = %key, "removing stale search from cache");
            }
            keep
        });
        before - self.entries.len()
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}
