//! Error types for the tag cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the tag cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Image reference or options could not be turned into a cache key
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// The remote lookup failed; the store is left untouched
    #[error("Failed to fetch latest tag for {image}")]
    Fetch {
        image: String,
        #[source]
        source: anyhow::Error,
    },

    /// The caller's cancellation token fired before the lookup completed
    #[error("Lookup cancelled for {0}")]
    Cancelled(String),

    /// Configuration values are unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Garbage collector was started twice
    #[error("Garbage collector already running")]
    AlreadyRunning,

    /// Garbage collector was stopped without being started
    #[error("Garbage collector not running")]
    NotRunning,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the tag cache.
pub type Result<T> = std::result::Result<T, CacheError>;
