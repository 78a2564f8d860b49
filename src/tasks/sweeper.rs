//! Expiration Sweeper Task
//!
//! Background task that periodically runs cache maintenance so expired entries
//! are reclaimed even when nobody touches the cache.

use std::hash::Hash;
use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

/// Extra time slept past a predicted expiration before re-checking.
pub const SWEEP_BUFFER: Duration = Duration::from_secs(1);

// == Sweeper Handle ==
/// Handle to a running sweeper task.
///
/// There is no way to stop a sweeper early: it exits on its own the first time
/// it wakes up and finds its cache gone.
#[derive(Debug)]
pub struct SweeperHandle {
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Returns true once the task has observed its cache was dropped and exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawns a sweeper for `store` on the current tokio runtime.
///
/// The task only holds a weak reference, so it never keeps the cache alive.
/// Each round it runs maintenance under the cache lock, then sleeps either the
/// full `interval` (nothing pending) or until just past the next expected
/// expiration.
///
/// # Errors
/// `InvalidConfig` when called outside a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::new(Some(100), Some(ttl))));
/// let sweeper = spawn_sweeper(Arc::downgrade(&store), Duration::from_secs(60))?;
/// drop(store);
/// // sweeper.is_finished() turns true within one interval
/// ```
pub fn spawn_sweeper<K, V>(
    store: Weak<Mutex<CacheStore<K, V>>>,
    interval: Duration,
) -> Result<SweeperHandle>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    let runtime = Handle::try_current().map_err(|e| {
        CacheError::InvalidConfig(format!(
            "a cleanup interval needs a running tokio runtime: {}",
            e
        ))
    })?;

    let handle = runtime.spawn(async move {
        info!("Starting cache sweeper with interval of {:?}", interval);

        loop {
            let next_expiry = {
                let Some(store) = store.upgrade() else {
                    break;
                };
                let mut guard = store.lock();
                guard.maintain()
            };

            let pause = match next_expiry {
                Some(until_expiry) => until_expiry + SWEEP_BUFFER,
                None => interval,
            };
            debug!("Sweeper: next pass in {:?}", pause);

            tokio::time::sleep(pause).await;
        }

        info!("Cache dropped, sweeper exiting");
    });

    Ok(SweeperHandle { handle })
}
