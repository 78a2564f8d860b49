//! Cache Store Module
//!
//! Main cache engine built on a recency-ordered map whose order drives both LRU
//! eviction and the lazy expiration scan.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::time::{Duration, Instant};

use lru::LruCache;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Scan Mode ==
/// How far the expiration scan walks on each maintenance pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Walk from the least recently touched entry and stop at the first live one.
    ///
    /// Cheap, but reads move keys to the tail without refreshing their deadline,
    /// so an expired entry sitting behind a live one survives until the live one
    /// is gone.
    #[default]
    RecencyOrdered,
    /// Examine every entry on every pass.
    Full,
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recency" | "recency_ordered" => Ok(ScanMode::RecencyOrdered),
            "full" => Ok(ScanMode::Full),
            other => Err(format!("unknown scan mode {:?}", other)),
        }
    }
}

// == Cache Store ==
/// Unsynchronized cache storage with LRU eviction and TTL expiration.
///
/// Every public operation except `delete` starts with a maintenance pass. The
/// store takes `&mut self` everywhere, so sharing it across threads is up to the
/// caller; see [`SyncCache`](crate::cache::SyncCache) for the locked variant.
pub struct CacheStore<K, V> {
    /// Key-value storage in recency order, LRU end = least recently touched.
    /// Its own capacity is unbounded; `max_size` is enforced by `maintain`.
    entries: LruCache<K, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, None = unbounded
    max_size: Option<usize>,
    /// Entry lifetime, None = entries never expire
    ttl: Option<Duration>,
    scan_mode: ScanMode,
}

impl<K, V> fmt::Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("stats", &self.stats)
            .field("max_size", &self.max_size)
            .field("ttl", &self.ttl)
            .field("scan_mode", &self.scan_mode)
            .finish_non_exhaustive()
    }
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `max_size` - Maximum number of entries, None = unbounded
    /// * `ttl` - Lifetime of each entry from its insertion, None = no expiration
    pub fn new(max_size: Option<usize>, ttl: Option<Duration>) -> Self {
        Self {
            entries: LruCache::unbounded(),
            stats: CacheStats::new(),
            max_size,
            ttl,
            scan_mode: ScanMode::default(),
        }
    }

    /// Creates a store from a validated copy of `config`.
    ///
    /// The store ignores `cleanup_interval` and `thread_safe`; those only matter to
    /// the wrappers that own a lock and a sweeper.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        let config = config.clone().validate()?;
        Ok(Self::new(config.max_size, config.ttl).with_scan_mode(config.scan_mode))
    }

    pub fn with_scan_mode(mut self, scan_mode: ScanMode) -> Self {
        self.scan_mode = scan_mode;
        self
    }

    // == Contains ==
    /// Reports whether `key` is present after maintenance. Does not touch the key.
    pub fn contains<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.maintain();
        self.entries.contains(key)
    }

    // == Get ==
    /// Retrieves a value by key, moving it to the most recently touched position.
    ///
    /// The entry's deadline is left as it was set.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.maintain();
        match self.entries.get(key) {
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Like [`get`](Self::get), returning `default` when the key is absent.
    pub fn get_or<Q>(&mut self, key: &Q, default: V) -> V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    // == Index ==
    /// Like [`get`](Self::get), failing with `NotFound` when the key is absent or
    /// was expired by this call's maintenance pass.
    pub fn index<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + fmt::Debug + ?Sized,
    {
        self.get(key).ok_or_else(|| CacheError::not_found(key))
    }

    // == Set ==
    /// Stores a key-value pair expiring `ttl` from now.
    ///
    /// Any existing entry is removed first, so the key always lands at the tail
    /// with a fresh deadline. Capacity is enforced by the maintenance pass that
    /// follows the insert.
    pub fn set(&mut self, key: K, value: V) {
        self.delete(&key);
        self.entries.put(key, CacheEntry::new(value, self.ttl));
        self.maintain();
    }

    // == Delete ==
    /// Removes an entry by key, returning its value if it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.pop(key)?;
        self.stats.set_total_entries(self.entries.len());
        Some(entry.into_value())
    }

    // == Size ==
    /// Returns the number of entries after a maintenance pass.
    pub fn size(&mut self) -> usize {
        self.maintain();
        self.entries.len()
    }

    // == Maintain ==
    /// Runs the expiration scan followed by capacity eviction.
    ///
    /// Returns how long until the next known deadline, or None when the cache is
    /// empty or no live entry with a deadline was reached by the scan.
    pub fn maintain(&mut self) -> Option<Duration> {
        let now = Instant::now();
        let before = self.entries.len();

        let next_expiry = match self.scan_mode {
            ScanMode::RecencyOrdered => self.expire_from_head(now),
            ScanMode::Full => self.expire_all(now),
        };
        let expired = before - self.entries.len();

        let mut evicted = 0;
        if let Some(max_size) = self.max_size {
            while self.entries.len() > max_size {
                match self.entries.pop_lru() {
                    Some(_) => {
                        self.stats.record_eviction();
                        evicted += 1;
                    }
                    None => break,
                }
            }
        }

        self.stats.set_total_entries(self.entries.len());
        if expired > 0 || evicted > 0 {
            debug!(
                "Maintenance: expired {} entries, evicted {}, {} remaining",
                expired,
                evicted,
                self.entries.len()
            );
        }

        if self.entries.is_empty() {
            return None;
        }
        next_expiry.map(|at| at.saturating_duration_since(now))
    }

    /// Removes expired entries from the head until a live one is found.
    fn expire_from_head(&mut self, now: Instant) -> Option<Instant> {
        loop {
            let expires_at = self.entries.peek_lru().map(|(_, entry)| entry.expires_at)?;

            match expires_at {
                Some(at) if at < now => {
                    self.entries.pop_lru();
                    self.stats.record_expiration();
                }
                live => return live,
            }
        }
    }

    /// Removes every expired entry and returns the earliest remaining deadline.
    fn expire_all(&mut self, now: Instant) -> Option<Instant> {
        let expired_keys: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in expired_keys {
            self.entries.pop(&key);
            self.stats.record_expiration();
        }

        self.entries.iter().filter_map(|(_, entry)| entry.expires_at).min()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries without running maintenance.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan_mode
    }
}
