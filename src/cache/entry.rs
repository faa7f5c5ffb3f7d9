//! Cache Entry Module
//!
//! Defines a single cached lookup result and its freshness rule.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A cached value and the instant it was written.
///
/// Entries are never mutated; a newer lookup replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Monotonic write time
    pub timestamp: Instant,
    /// The stored value
    pub value: V,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry written at `timestamp`.
    pub fn new(value: V, timestamp: Instant) -> Self {
        Self { timestamp, value }
    }

    /// Creates an entry written now.
    pub fn now(value: V) -> Self {
        Self::new(value, Instant::now())
    }

    // == Age ==
    /// Time elapsed between the write and `now`. Zero if `now` is earlier.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.timestamp)
    }

    // == Freshness ==
    /// Checks whether the entry is still fresh at `now`.
    ///
    /// Boundary condition: an entry is fresh iff `now < timestamp + ttl`, so it
    /// turns stale the moment the TTL has fully elapsed.
    pub fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) < ttl
    }

    /// Inverse of [`CacheEntry::is_fresh`].
    pub fn is_stale(&self, now: Instant, ttl: Duration) -> bool {
        !self.is_fresh(now, ttl)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(10);

    #[test]
    fn test_entry_fresh_within_ttl() {
        let written = Instant::now();
        let entry = CacheEntry::new("v1", written);

        assert!(entry.is_fresh(written, TTL));
        assert!(entry.is_fresh(written + Duration::from_secs(9), TTL));
        assert!(!entry.is_stale(written + Duration::from_secs(9), TTL));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let written = Instant::now();
        let entry = CacheEntry::new("v1", written);

        // Stale exactly when the TTL has fully elapsed
        assert!(entry.is_stale(written + TTL, TTL));
        assert!(entry.is_stale(written + TTL + Duration::from_millis(1), TTL));
        assert!(entry.is_fresh(written + TTL - Duration::from_millis(1), TTL));
    }

    #[test]
    fn test_age_saturates_for_earlier_now() {
        let written = Instant::now() + Duration::from_secs(5);
        let entry = CacheEntry::new("v1", written);

        assert_eq!(entry.age(written - Duration::from_secs(5)), Duration::ZERO);
        assert_eq!(entry.age(written + Duration::from_secs(3)), Duration::from_secs(3));
    }
}
