//! TTL LRU Cache - A bounded in-process key/value cache
//!
//! Combines least-recently-used eviction with per-entry time-to-live, an optional
//! background sweeper, and a memoizing wrapper for plain functions.

pub mod cache;
pub mod config;
pub mod error;
pub mod memoize;
pub mod tasks;

pub use cache::{Cache, CacheStats, CacheStore, ScanMode, SyncCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use memoize::{memoize, Memoized};
pub use tasks::{spawn_sweeper, SweeperHandle};
