//! Garbage Collector Task
//!
//! Background task that periodically removes stale cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::CacheState;

/// Spawns a background task that periodically sweeps stale cache entries.
///
/// The task sleeps for `interval` between sweeps and takes the store's
/// write lock for each one. It runs until `cancel` fires, including while it
/// is waiting for the lock.
///
/// # Arguments
/// * `state` - Shared cache state to sweep
/// * `interval` - Time between sweeps
/// * `cancel` - Token that stops the loop
///
/// # Example
/// ```ignore
/// let cancel = CancellationToken::new();
/// let handle = spawn_gc_task(state.clone(), Duration::from_secs(60), cancel.clone());
/// // Later, during shutdown:
/// cancel.cancel();
/// handle.await?;
/// ```
pub fn spawn_gc_task<V>(
    state: Arc<CacheState<V>>,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs_f64(),
            "starting search cache garbage collector"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let removed = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                removed = state.sweep() => removed,
            };

            if removed > 0 {
                info!("garbage collector: removed {} stale searches", removed);
            } else {
                debug!("garbage collector: no stale searches found");
            }
        }

        info!("search cache garbage collector stopped");
    })
}
