//! Shared Cache State
//!
//! Everything the accessor and the garbage collector both touch.

use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::cache::{CacheStore, FlightMap, StatsRecorder};

/// State shared between callers and the background garbage collector.
#[derive(Debug)]
pub struct CacheState<V> {
    /// Entries, behind the single store-wide reader/writer lock
    pub store: RwLock<CacheStore<V>>,
    /// Per-key fetch coordination
    pub flights: FlightMap,
    /// Counters
    pub stats: StatsRecorder,
    /// Freshness window
    pub ttl: Duration,
}

impl<V> CacheState<V> {
    // == Constructor ==
    /// Creates state around an empty store with the given freshness window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: RwLock::new(CacheStore::new()),
            flights: FlightMap::new(),
            stats: StatsRecorder::new(),
            ttl,
        }
    }

    // == Sweep ==
    /// Removes every stale entry under the exclusive lock.
    ///
    /// `now` is read after the lock is acquired, so time spent waiting behind
    /// a writer counts towards entry age. Returns the number of entries removed.
    pub async fn sweep(&self) -> usize {
        let removed = {
            let mut store = self.store.write().await;
            let now = Instant::now();
            store.sweep(now, self.ttl)
        };

        self.stats.record_evictions(removed);
        self.flights.prune_idle();
        removed
    }

    /// Returns the number of stored entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}
