//! Remote Fetch Port
//!
//! The cache does not talk to registries itself; it calls a `TagFetcher`
//! whenever an entry is missing or stale.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::models::{ImageOptions, ImageTag};

/// Source of truth for the latest tag of an image.
///
/// Implementations are expected to be slow and fallible. They should stop
/// work early once `cancel` fires; the cache also stops waiting on its own.
#[async_trait]
pub trait TagFetcher: Send + Sync + 'static {
    async fn latest_tag(
        &self,
        cancel: &CancellationToken,
        opts: &ImageOptions,
        image: &str,
    ) -> anyhow::Result<ImageTag>;
}

#[async_trait]
impl<T: TagFetcher + ?Sized> TagFetcher for Arc<T> {
    async fn latest_tag(
        &self,
        cancel: &CancellationToken,
        opts: &ImageOptions,
        image: &str,
    ) -> anyhow::Result<ImageTag> {
        (**self).latest_tag(cancel, opts, image).await
    }
}
