//! Data models for latest-tag lookups
//!
//! This module defines the lookup options that callers pass in and the
//! tag values the cache hands back.

pub mod options;
pub mod tag;

pub use options::ImageOptions;
pub use tag::ImageTag;
