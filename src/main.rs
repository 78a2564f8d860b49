//! TTL LRU Cache demo
//!
//! Builds a cache from environment configuration, memoizes a function on
//! top of it and reports statistics while the sweeper reclaims expired entries.

use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_lru_cache::{memoize, CacheConfig, SyncCache};

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Memoize a function and call it twice per argument
/// 4. Fill a swept cache, then let the sweeper empty it
/// 5. Print statistics as JSON
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_lru_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env().context("invalid cache configuration")?;
    info!(
        "Configuration loaded: max_size={:?}, ttl={:?}, cleanup_interval={:?}, thread_safe={}",
        config.max_size, config.ttl, config.cleanup_interval, config.thread_safe
    );

    let mut sum_of_squares = memoize(
        |n: u64| (1..=n).map(|k| k * k).sum::<u64>(),
        config.clone(),
    )?;
    for n in [1_000, 2_000, 1_000, 2_000] {
        info!("sum_of_squares({}) = {}", n, sum_of_squares.call(n));
    }
    if let Some(stats) = sum_of_squares.stats() {
        println!("memoized: {}", serde_json::to_string(&stats)?);
    }

    let cache: SyncCache<String, String> = SyncCache::new(
        config
            .max_size(2)
            .ttl(Duration::from_secs(3))
            .cleanup_interval(Duration::from_secs(2)),
    )?;
    for key in ["a", "b", "c"] {
        cache.set(key.to_string(), key.to_uppercase());
    }
    info!("Inserted 3 keys, {} kept", cache.len());

    tokio::time::sleep(Duration::from_secs(5)).await;
    info!("After 5s without access, {} keys remain", cache.len());
    println!("swept: {}", serde_json::to_string(&cache.stats())?);

    Ok(())
}
