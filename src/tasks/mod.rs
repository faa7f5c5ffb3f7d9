//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Garbage collector: Removes stale cache entries at the configured interval

mod gc;

pub use gc::spawn_gc_task;
