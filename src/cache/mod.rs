//! Cache Module
//!
//! Provides the in-memory store of lookup results, the read-through
//! accessor in front of it, and the state shared with the garbage collector.

mod entry;
mod flight;
mod image_cache;
mod state;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use flight::{FlightMap, FlightPermit};
pub use image_cache::ImageCache;
pub use state::CacheState;
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;
