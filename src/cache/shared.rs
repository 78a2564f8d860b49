//! Shared Cache Module
//!
//! Thread-safe wrapper around [`CacheStore`] and the runtime-selected [`Cache`].

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::cache::{CacheStats, CacheStore};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::tasks::{spawn_sweeper, SweeperHandle};

// == Sync Cache ==
/// A [`CacheStore`] behind a lock, optionally swept in the background.
///
/// Clones share the same store. The lock is taken exactly once per public
/// operation; maintenance runs inside that critical section, so nothing ever
/// needs to re-acquire it.
pub struct SyncCache<K, V> {
    store: Arc<Mutex<CacheStore<K, V>>>,
    sweeper: Option<Arc<SweeperHandle>>,
}

impl<K, V> Clone for SyncCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sweeper: self.sweeper.clone(),
        }
    }
}

impl<K, V> fmt::Debug for SyncCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCache")
            .field("sweeper", &self.sweeper)
            .finish_non_exhaustive()
    }
}

impl<K, V> SyncCache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Creates a locked cache, starting a sweeper if `cleanup_interval` is set.
    ///
    /// # Errors
    /// `InvalidConfig` for an invalid configuration, or when a sweeper is
    /// requested outside a tokio runtime.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let config = config.thread_safe(true).validate()?;
        let store = Arc::new(Mutex::new(
            CacheStore::new(config.max_size, config.ttl).with_scan_mode(config.scan_mode),
        ));

        let sweeper = match config.cleanup_interval {
            Some(interval) => Some(Arc::new(spawn_sweeper(Arc::downgrade(&store), interval)?)),
            None => None,
        };

        Ok(Self { store, sweeper })
    }
}

impl<K, V> SyncCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Reports whether `key` is present after maintenance. Does not touch the key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().contains(key)
    }

    /// Returns a clone of the value and marks the key most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().get(key)
    }

    /// Like `get`, falling back to `default` when the key is absent.
    pub fn get_or<Q>(&self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().get_or(key, default)
    }

    /// Like `get`, but an absent key is a `NotFound` error.
    pub fn index<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.store.lock().index(key)
    }

    /// Stores a value with a fresh deadline, then runs maintenance.
    pub fn set(&self, key: K, value: V) {
        self.store.lock().set(key, value);
    }

    /// Removes a key, returning its value if it was present.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.lock().delete(key)
    }

    /// Runs maintenance and returns the remaining entry count.
    pub fn size(&self) -> usize {
        self.store.lock().size()
    }

    /// Entry count without running maintenance.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// True when no entries are stored, expired or not.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Runs maintenance now. See [`CacheStore::maintain`].
    pub fn maintain(&self) -> Option<Duration> {
        self.store.lock().maintain()
    }

    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    /// The background sweeper, if one was started.
    pub fn sweeper(&self) -> Option<Arc<SweeperHandle>> {
        self.sweeper.clone()
    }
}

// == Cache ==
/// A cache whose locking is chosen at construction time.
///
/// `Local` is the unsynchronized store; `&mut self` access means the borrow
/// checker makes callers serialize it. `Shared` goes through [`SyncCache`].
#[derive(Debug)]
pub enum Cache<K, V> {
    Local(CacheStore<K, V>),
    Shared(SyncCache<K, V>),
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    /// Builds the variant selected by `config.thread_safe`.
    ///
    /// A cleanup interval with `thread_safe = false` is corrected to a shared
    /// cache, with a warning.
    pub fn new(config: CacheConfig) -> Result<Self> {
        let config = config.validate()?;
        if config.thread_safe {
            Ok(Cache::Shared(SyncCache::new(config)?))
        } else {
            Ok(Cache::Local(CacheStore::from_config(&config)?))
        }
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn is_thread_safe(&self) -> bool {
        matches!(self, Cache::Shared(_))
    }

    pub fn contains<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self {
            Cache::Local(store) => store.contains(key),
            Cache::Shared(cache) => cache.contains(key),
        }
    }

    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self {
            Cache::Local(store) => store.get(key),
            Cache::Shared(cache) => cache.get(key),
        }
    }

    pub fn get_or<Q>(&mut self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    pub fn index<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        match self {
            Cache::Local(store) => store.index(key),
            Cache::Shared(cache) => cache.index(key),
        }
    }

    pub fn set(&mut self, key: K, value: V) {
        match self {
            Cache::Local(store) => store.set(key, value),
            Cache::Shared(cache) => cache.set(key, value),
        }
    }

    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self {
            Cache::Local(store) => store.delete(key),
            Cache::Shared(cache) => cache.delete(key),
        }
    }

    pub fn size(&mut self) -> usize {
        match self {
            Cache::Local(store) => store.size(),
            Cache::Shared(cache) => cache.size(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Cache::Local(store) => store.len(),
            Cache::Shared(cache) => cache.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn maintain(&mut self) -> Option<Duration> {
        match self {
            Cache::Local(store) => store.maintain(),
            Cache::Shared(cache) => cache.maintain(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        match self {
            Cache::Local(store) => store.stats(),
            Cache::Shared(cache) => cache.stats(),
        }
    }
}
