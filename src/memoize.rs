//! Memoization Module
//!
//! Turns a function into a cached one backed by a [`Cache`].

use std::fmt;
use std::hash::Hash;

use tracing::debug;

use crate::cache::{Cache, CacheStats};
use crate::config::CacheConfig;
use crate::error::Result;

/// A function paired with its own cache.
///
/// The cache key is the argument itself; functions of several arguments take a
/// tuple. Each wrapper owns a private cache, so two wrapped functions never see
/// each other's results.
///
/// A hit is any entry present in the cache, including results such as `0`,
/// `false`, `""` or `None`.
pub struct Memoized<A, R, F> {
    func: F,
    cache: Option<Cache<A, R>>,
}

/// Wraps `func` in a cache built from `config`.
///
/// A `max_size` of zero yields a wrapper that calls `func` every time and
/// stores nothing.
///
/// # Example
/// ```
/// use ttl_lru_cache::{memoize, CacheConfig};
///
/// let mut square = memoize(|x: u64| x * x, CacheConfig::new().max_size(16)).unwrap();
/// assert_eq!(square.call(12), 144);
/// assert_eq!(square.call(12), 144);
/// assert_eq!(square.stats().unwrap().hits, 1);
/// ```
pub fn memoize<A, R, F>(func: F, config: CacheConfig) -> Result<Memoized<A, R, F>>
where
    A: Hash + Eq + Clone + Send + 'static,
    R: Clone + Send + 'static,
    F: FnMut(A) -> R,
{
    let cache = if config.max_size == Some(0) {
        debug!("Memoization disabled by a zero max_size");
        None
    } else {
        Some(Cache::new(config)?)
    };

    Ok(Memoized { func, cache })
}

impl<A, R, F> Memoized<A, R, F>
where
    A: Hash + Eq + Clone,
    R: Clone,
    F: FnMut(A) -> R,
{
    /// Returns the cached result for `args`, computing and storing it on a miss.
    pub fn call(&mut self, args: A) -> R {
        let Some(cache) = self.cache.as_mut() else {
            return (self.func)(args);
        };

        if let Some(hit) = cache.get(&args) {
            return hit;
        }

        let result = (self.func)(args.clone());
        cache.set(args, result.clone());
        result
    }

    /// Statistics of the backing cache, None for a pass-through wrapper.
    pub fn stats(&self) -> Option<CacheStats> {
        self.cache.as_ref().map(Cache::stats)
    }

    pub fn cache(&self) -> Option<&Cache<A, R>> {
        self.cache.as_ref()
    }

    /// Returns the wrapped function, dropping the cache.
    pub fn into_inner(self) -> F {
        self.func
    }
}

impl<A, R, F> fmt::Debug for Memoized<A, R, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
