//! Tag Cache - bounded-staleness cache for latest image tag lookups
//!
//! Serves the latest tag of a container image from memory while it is
//! fresh, falls back to a remote [`TagFetcher`] when it is not, and sweeps
//! stale results in the background.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod key;
pub mod models;
pub mod tasks;

pub use cache::{CacheStats, ImageCache};
pub use config::{CacheConfig, FetchMode};
pub use error::{CacheError, Result};
pub use fetch::TagFetcher;
pub use key::{derive_key, CacheKey};
pub use models::{ImageOptions, ImageTag};
pub use tasks::spawn_gc_task;
