//! Latest Image Cache
//!
//! Read-through cache in front of a [`TagFetcher`]. Fresh entries are served
//! from memory; missing or stale ones trigger a remote lookup whose result
//! replaces the entry. A background garbage collector drops entries that
//! have gone stale so the map does not grow without bound.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::cache::{CacheEntry, CacheState, CacheStats};
use crate::config::{CacheConfig, FetchMode};
use crate::error::{CacheError, Result};
use crate::fetch::TagFetcher;
use crate::key::{derive_key, CacheKey};
use crate::models::{ImageOptions, ImageTag};
use crate::tasks::spawn_gc_task;

/// Handle to a running garbage collector.
#[derive(Debug)]
struct GcHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

// == Image Cache ==
/// Bounded-staleness cache of latest image tags.
///
/// Construct once and share (typically behind an `Arc`) with every caller.
/// Call [`ImageCache::start`] from inside a tokio runtime to run the garbage
/// collector, and [`ImageCache::stop`] to shut it down. Dropping the cache
/// also stops it.
#[derive(Debug)]
pub struct ImageCache<F> {
    state: Arc<CacheState<Arc<ImageTag>>>,
    fetcher: F,
    config: CacheConfig,
    gc: Mutex<Option<GcHandle>>,
}

impl<F: TagFetcher> ImageCache<F> {
    // == Constructor ==
    /// Creates an empty cache in front of `fetcher`.
    ///
    /// # Errors
    /// Returns `CacheError::InvalidConfig` if the TTL or GC interval is zero.
    pub fn new(fetcher: F, config: CacheConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            state: Arc::new(CacheState::new(config.ttl)),
            fetcher,
            config,
            gc: Mutex::new(None),
        })
    }

    /// Returns the configuration the cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Get Latest Image ==
    /// Returns the latest tag for `image` searched with `opts`.
    ///
    /// A fresh cached result is returned without calling the fetcher.
    /// Otherwise the fetcher is called at most once and a successful result is
    /// stored with the current time. Failures are never cached.
    ///
    /// # Errors
    /// - `KeyDerivation` if `image` or `opts` are malformed; nothing is locked
    /// - `Fetch` if the remote lookup failed; the store is unchanged
    /// - `Cancelled` if `cancel` fired while waiting for a lock or the fetch;
    ///   the store is unchanged. A fresh hit is still returned.
    #[instrument(level = "debug", skip(self, cancel, opts))]
    pub async fn get_latest_image(
        &self,
        cancel: &CancellationToken,
        image: &str,
        opts: &ImageOptions,
    ) -> Result<Arc<ImageTag>> {
        let key = derive_key(image, opts)?;

        if let Some(value) = self.lookup_fresh(cancel, image, &key).await? {
            self.state.stats.record_hit();
            debug!(key = %key, "found search");
            return Ok(value);
        }

        self.state.stats.record_miss();

        match self.config.fetch_mode {
            FetchMode::Serialized => self.refresh_serialized(cancel, image, opts, key).await,
            FetchMode::Coalesced => self.refresh_coalesced(cancel, image, opts, key).await,
        }
    }

    /// Shared-lock lookup. The lock is released before returning.
    ///
    /// An uncontended read never looks at `cancel`, so a fresh entry is served
    /// to a caller whose token already fired. Only waiting behind a writer is
    /// cancellable.
    async fn lookup_fresh(
        &self,
        cancel: &CancellationToken,
        image: &str,
        key: &CacheKey,
    ) -> Result<Option<Arc<ImageTag>>> {
        let store = match self.state.store.try_read() {
            Ok(store) => store,
            Err(_) => cancellable(cancel, image, self.state.store.read()).await?,
        };
        let now = Instant::now();

        Ok(store
            .lookup_fresh(key, now, self.state.ttl)
            .map(|entry| Arc::clone(&entry.value)))
    }

    /// Fetches while holding the store's write lock. Every reader and writer
    /// waits until the lookup finishes.
    async fn refresh_serialized(
        &self,
        cancel: &CancellationToken,
        image: &str,
        opts: &ImageOptions,
        key: CacheKey,
    ) -> Result<Arc<ImageTag>> {
        let mut store = cancellable(cancel, image, self.state.store.write()).await?;

        let value = self.fetch(cancel, image, opts).await?;

        debug!(key = %key, "committing search");
        store.store(key, CacheEntry::now(Arc::clone(&value)));

        Ok(value)
    }

    /// Fetches while holding only this key's flight. The store is locked
    /// briefly to re-check and to commit.
    async fn refresh_coalesced(
        &self,
        cancel: &CancellationToken,
        image: &str,
        opts: &ImageOptions,
        key: CacheKey,
    ) -> Result<Arc<ImageTag>> {
        let _permit = cancellable(cancel, image, self.state.flights.acquire(&key)).await?;

        // Whoever held the flight before us may have just refreshed the key
        if let Some(value) = self.lookup_fresh(cancel, image, &key).await? {
            self.state.stats.record_coalesced();
            debug!(key = %key, "search refreshed by concurrent caller");
            return Ok(value);
        }

        let value = self.fetch(cancel, image, opts).await?;

        debug!(key = %key, "committing search");
        self.state
            .store
            .write()
            .await
            .store(key, CacheEntry::now(Arc::clone(&value)));

        Ok(value)
    }

    async fn fetch(
        &self,
        cancel: &CancellationToken,
        image: &str,
        opts: &ImageOptions,
    ) -> Result<Arc<ImageTag>> {
        self.state.stats.record_fetch();

        let outcome = cancellable(cancel, image, self.fetcher.latest_tag(cancel, opts, image)).await;

        match outcome {
            Ok(Ok(tag)) => Ok(Arc::new(tag)),
            Ok(Err(source)) => {
                self.state.stats.record_fetch_error();
                warn!(image, error = %source, "latest tag lookup failed");
                Err(CacheError::Fetch {
                    image: image.to_string(),
                    source,
                })
            }
            Err(cancelled) => {
                self.state.stats.record_fetch_error();
                debug!(image, "latest tag lookup cancelled");
                Err(cancelled)
            }
        }
    }
}

impl<F> ImageCache<F> {
    // == Lifecycle ==
    /// Starts the background garbage collector.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns `CacheError::AlreadyRunning` if the collector is already running.
    pub fn start(&self) -> Result<()> {
        let mut gc = self.lock_gc();
        if gc.as_ref().is_some_and(|gc| !gc.handle.is_finished()) {
            return Err(CacheError::AlreadyRunning);
        }

        // Fresh token per run so the cache can be restarted after stop
        let cancel = CancellationToken::new();
        let handle = spawn_gc_task(Arc::clone(&self.state), self.config.gc_interval, cancel.clone());
        *gc = Some(GcHandle { cancel, handle });

        Ok(())
    }

    /// Stops the background garbage collector and waits for it to exit.
    ///
    /// # Errors
    /// Returns `CacheError::NotRunning` if it was never started or already
    /// stopped, `CacheError::Internal` if the task panicked.
    pub async fn stop(&self) -> Result<()> {
        let gc = self.lock_gc().take().ok_or(CacheError::NotRunning)?;

        gc.cancel.cancel();
        gc.handle
            .await
            .map_err(|e| CacheError::Internal(format!("garbage collector task failed: {}", e)))
    }

    /// Returns true while the garbage collector task is alive.
    pub fn is_running(&self) -> bool {
        self.lock_gc()
            .as_ref()
            .is_some_and(|gc| !gc.handle.is_finished())
    }

    // == Sweep Now ==
    /// Runs one garbage collection pass immediately.
    ///
    /// Returns the number of entries removed.
    pub async fn sweep_now(&self) -> usize {
        self.state.sweep().await
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let total_entries = self.state.len().await;
        self.state.stats.snapshot(total_entries)
    }

    // == Length ==
    /// Returns the number of stored entries, including stale ones not yet swept.
    pub async fn len(&self) -> usize {
        self.state.len().await
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn lock_gc(&self) -> MutexGuard<'_, Option<GcHandle>> {
        self.gc.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F> Drop for ImageCache<F> {
    fn drop(&mut self) {
        if let Some(gc) = self.lock_gc().take() {
            gc.cancel.cancel();
        }
    }
}

/// Races `fut` against the caller's cancellation token.
async fn cancellable<T>(
    cancel: &CancellationToken,
    image: &str,
    fut: impl Future<Output = T>,
) -> Result<T> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CacheError::Cancelled(image.to_string())),
        out = fut => Ok(out),
    }
}
