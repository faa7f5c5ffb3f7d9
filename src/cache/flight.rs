//! In-Flight Fetch Tracker
//!
//! Per-key coordination for remote fetches. Callers missing the cache for the
//! same key queue on that key's async mutex, so only one of them fetches at a
//! time while callers for other keys are not held up.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::key::CacheKey;

type FlightLock = Arc<AsyncMutex<()>>;

// == Flight Map ==
/// Tracks one async mutex per key with a fetch in progress or queued.
///
/// The outer map is guarded by a std mutex that is never held across an
/// await point.
#[derive(Debug, Default)]
pub struct FlightMap {
    flights: Mutex<HashMap<CacheKey, FlightLock>>,
}

impl FlightMap {
    // == Constructor ==
    /// Creates a map with no keys in flight.
    pub fn new() -> Self {
        Self::default()
    }

    // == Acquire ==
    /// Waits until the caller is the only one working on `key`.
    ///
    /// The returned permit releases the key when dropped. Dropping the
    /// returned future while it waits gives up the place in the queue.
    pub async fn acquire(&self, key: &CacheKey) -> FlightPermit<'_> {
        let lock = {
            let mut flights = self.lock_map();
            Arc::clone(flights.entry(key.clone()).or_default())
        };

        let guard = lock.lock_owned().await;

        FlightPermit {
            map: self,
            key: key.clone(),
            guard: Some(guard),
        }
    }

    // == Prune Idle ==
    /// Drops tracking for keys nobody holds or waits on.
    ///
    /// Only needed when a waiter was cancelled after the last holder left.
    /// Returns the number of entries removed.
    pub fn prune_idle(&self) -> usize {
        let mut flights = self.lock_map();
        let before = flights.len();
        flights.retain(|_, lock| Arc::strong_count(lock) > 1);
        before - flights.len()
    }

    // == Length ==
    /// Returns the number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.lock_map().len()
    }

    // == Is Empty ==
    /// Returns true if no key is tracked.
    pub fn is_empty(&self) -> bool {
        self.lock_map().is_empty()
    }

    fn lock_map(&self) -> MutexGuard<'_, HashMap<CacheKey, FlightLock>> {
        // The map stays consistent even if a holder panicked
        self.flights.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// == Flight Permit ==
/// Exclusive right to fetch one key. Released on drop.
#[derive(Debug)]
pub struct FlightPermit<'a> {
    map: &'a FlightMap,
    key: CacheKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for FlightPermit<'_> {
    fn drop(&mut self) {
        let guard = self.guard.take();
        let mut flights = self.map.lock_map();

        // Clones are only handed out under the map lock, so a count of two
        // (map + our guard) means no one is queued behind us.
        let idle = flights
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) <= 2);
        if idle {
            flights.remove(&self.key);
        }

        drop(guard);
    }
}
