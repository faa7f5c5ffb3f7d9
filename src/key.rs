//! Cache Key Derivation
//!
//! Maps an image reference and its lookup options to a stable cache key.

use std::fmt;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{CacheError, Result};
use crate::models::ImageOptions;

// == Cache Key ==
/// Hex encoded SHA-256 over the image reference and its options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns the key as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Derive Key ==
/// Derives the cache key for `image` searched with `opts`.
///
/// The same reference and options always produce the same key. Fails on
/// malformed input without touching any cache state.
///
/// # Errors
/// Returns `CacheError::KeyDerivation` if the image reference is empty,
/// contains whitespace or control characters, starts or ends with `/` or
/// `:`, or if `opts.match_regex` is not a valid pattern.
pub fn derive_key(image: &str, opts: &ImageOptions) -> Result<CacheKey> {
    validate_image_reference(image)?;

    if let Some(pattern) = &opts.match_regex {
        Regex::new(pattern).map_err(|e| {
            CacheError::KeyDerivation(format!("invalid match_regex '{}': {}", pattern, e))
        })?;
    }

    let encoded_opts = serde_json::to_vec(opts)
        .map_err(|e| CacheError::KeyDerivation(format!("failed to encode options: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(image.as_bytes());
    // Separator keeps `image` and the options from bleeding into each other
    hasher.update([0u8]);
    hasher.update(&encoded_opts);

    Ok(CacheKey(hex::encode(hasher.finalize())))
}

fn validate_image_reference(image: &str) -> Result<()> {
    if image.is_empty() {
        return Err(CacheError::KeyDerivation(
            "image reference cannot be empty".to_string(),
        ));
    }

    if image.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(CacheError::KeyDerivation(format!(
            "image reference '{}' contains whitespace or control characters",
            image.escape_debug()
        )));
    }

    let bad_edge = |c: char| c == '/' || c == ':';
    if image.starts_with(bad_edge) || image.ends_with(bad_edge) {
        return Err(CacheError::KeyDerivation(format!(
            "image reference '{}' is malformed",
            image
        )));
    }

    Ok(())
}
