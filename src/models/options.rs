//! Lookup options for a latest-tag search
//!
//! Options change which tag a registry lookup resolves to, so they are part
//! of the cache key alongside the image reference.

use serde::{Deserialize, Serialize};

/// Options controlling how the latest tag of an image is chosen.
///
/// # Fields
/// - `use_meta_data`: Allow tags carrying semver metadata/pre-release suffixes
/// - `use_sha`: Compare by digest instead of by version
/// - `match_regex`: Only consider tags matching this pattern
/// - `pin_major` / `pin_minor` / `pin_patch`: Restrict the search to a version line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    #[serde(default)]
    pub use_meta_data: bool,
    #[serde(default)]
    pub use_sha: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_regex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_major: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_minor: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_patch: Option<u64>,
}

impl ImageOptions {
    /// Restricts the search to tags matching `pattern`.
    pub fn with_match_regex(mut self, pattern: impl Into<String>) -> Self {
        self.match_regex = Some(pattern.into());
        self
    }

    /// Pins the search to a major version.
    pub fn with_pin_major(mut self, major: u64) -> Self {
        self.pin_major = Some(major);
        self
    }
}
