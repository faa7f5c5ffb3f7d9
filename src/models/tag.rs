//! Image tag returned by a latest-tag lookup

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The latest tag found for an image.
///
/// The cache treats this as opaque; it is stored as-is and handed back to
/// callers behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTag {
    /// Tag name, e.g. `v1.2.3`
    pub tag: String,
    /// Manifest digest, if the registry reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// When the tag was pushed, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ImageTag {
    /// Creates a tag with no digest or push time.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            sha: None,
            timestamp: None,
        }
    }

    /// Attaches a manifest digest.
    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    /// Attaches a push time.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}
