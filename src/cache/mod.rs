//! Cache Module
//!
//! Provides in-process caching with TTL expiration and LRU eviction.

mod entry;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use shared::{Cache, SyncCache};
pub use stats::CacheStats;
pub use store::{CacheStore, ScanMode};
