//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default freshness window, in seconds.
pub const DEFAULT_TTL_SECS: u64 = 30 * 60;

/// Default garbage collector period, in seconds.
pub const DEFAULT_GC_INTERVAL_SECS: u64 = 60;

// == Fetch Mode ==
/// How the accessor coordinates remote fetches after a miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Hold the store's write lock for the whole fetch. Every miss in the
    /// cache is serialized behind it and there is no re-check once the lock
    /// is taken, so concurrent misses on one key each fetch.
    Serialized,
    /// Coordinate per key. Misses on different keys fetch in parallel,
    /// misses on the same key wait for a single fetch.
    #[default]
    Coalesced,
}

impl FromStr for FetchMode {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serialized" => Ok(FetchMode::Serialized),
            "coalesced" => Ok(FetchMode::Coalesced),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown fetch mode '{}'",
                other
            ))),
        }
    }
}

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry stays fresh after it was written
    pub ttl: Duration,
    /// Period between garbage collector sweeps
    pub gc_interval: Duration,
    /// Fetch coordination strategy
    pub fetch_mode: FetchMode,
}

impl CacheConfig {
    /// Creates a config with the given TTL and GC interval and the default fetch mode.
    pub fn new(ttl: Duration, gc_interval: Duration) -> Self {
        Self {
            ttl,
            gc_interval,
            fetch_mode: FetchMode::default(),
        }
    }

    /// Returns a copy of this config using `fetch_mode`.
    pub fn with_fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.fetch_mode = fetch_mode;
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_SECS` - Entry freshness window in seconds (default: 1800)
    /// - `CACHE_GC_INTERVAL_SECS` - Garbage collector period in seconds (default: 60)
    /// - `CACHE_FETCH_MODE` - `coalesced` or `serialized` (default: coalesced)
    pub fn from_env() -> Self {
        Self {
            ttl: Duration::from_secs(
                env::var("CACHE_TTL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TTL_SECS),
            ),
            gc_interval: Duration::from_secs(
                env::var("CACHE_GC_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_GC_INTERVAL_SECS),
            ),
            fetch_mode: env::var("CACHE_FETCH_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Rejects durations the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.ttl.is_zero() {
            return Err(CacheError::InvalidConfig("ttl must be non-zero".into()));
        }
        if self.gc_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "gc_interval must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_TTL_SECS),
            Duration::from_secs(DEFAULT_GC_INTERVAL_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(1800));
        assert_eq!(config.gc_interval, Duration::from_secs(60));
        assert_eq!(config.fetch_mode, FetchMode::Coalesced);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env() {
        // Single test touching the env so parallel tests do not race on it
        env::remove_var("CACHE_TTL_SECS");
        env::remove_var("CACHE_GC_INTERVAL_SECS");
        env::remove_var("CACHE_FETCH_MODE");

        let config = CacheConfig::from_env();
        assert_eq!(config.ttl, Duration::from_secs(DEFAULT_TTL_SECS));
        assert_eq!(config.gc_interval, Duration::from_secs(DEFAULT_GC_INTERVAL_SECS));
        assert_eq!(config.fetch_mode, FetchMode::Coalesced);

        env::set_var("CACHE_TTL_SECS", "5");
        env::set_var("CACHE_GC_INTERVAL_SECS", "not-a-number");
        env::set_var("CACHE_FETCH_MODE", "Serialized");

        let config = CacheConfig::from_env();
        assert_eq!(config.ttl, Duration::from_secs(5));
        assert_eq!(config.gc_interval, Duration::from_secs(DEFAULT_GC_INTERVAL_SECS));
        assert_eq!(config.fetch_mode, FetchMode::Serialized);

        env::remove_var("CACHE_TTL_SECS");
        env::remove_var("CACHE_GC_INTERVAL_SECS");
        env::remove_var("CACHE_FETCH_MODE");
    }

    #[test]
    fn test_fetch_mode_parse() {
        assert_eq!("coalesced".parse::<FetchMode>().unwrap(), FetchMode::Coalesced);
        assert_eq!(" SERIALIZED ".parse::<FetchMode>().unwrap(), FetchMode::Serialized);
        assert!(matches!(
            "parallel".parse::<FetchMode>(),
            Err(CacheError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_durations() {
        let zero_ttl = CacheConfig::new(Duration::ZERO, Duration::from_secs(1));
        assert!(matches!(zero_ttl.validate(), Err(CacheError::InvalidConfig(_))));

        let zero_interval = CacheConfig::new(Duration::from_secs(1), Duration::ZERO);
        assert!(matches!(
            zero_interval.validate(),
            Err(CacheError::InvalidConfig(_))
        ));
    }
}
