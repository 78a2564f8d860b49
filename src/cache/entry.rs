//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with an absolute expiration.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value together with the instant it stops being valid.
///
/// Entries are never mutated in place: overwriting a key replaces the whole entry,
/// and reads leave `expires_at` untouched.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiration instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Optional time-to-live, None = never expires
    pub fn new(value: V, ttl: Option<Duration>) -> Self {
        Self::created_at(value, ttl, Instant::now())
    }

    /// Creates a new entry as if it had been inserted at `now`.
    pub fn created_at(value: V, ttl: Option<Duration>, now: Instant) -> Self {
        Self {
            value,
            // An overflowing deadline is as good as no deadline.
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry was already expired at `now`.
    ///
    /// Boundary condition: the entry is expired only once `now` is strictly past
    /// `expires_at`; at exactly `expires_at` it is still live.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => expires < now,
            None => false,
        }
    }

    /// Consumes the entry and returns its value.
    pub fn into_value(self) -> V {
        self.value
    }
}
