//! Configuration Module
//!
//! Handles building, loading and validating cache configuration.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::cache::ScanMode;
use crate::error::{CacheError, Result};

/// Cache construction parameters.
///
/// Every field is independently optional; `None` means "unbounded" for
/// `max_size` and `ttl`, and "disabled" for `cleanup_interval`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries before LRU eviction kicks in
    pub max_size: Option<usize>,
    /// Lifetime of an entry, counted from its most recent `set`
    pub ttl: Option<Duration>,
    /// Period of the background sweeper
    pub cleanup_interval: Option<Duration>,
    /// Whether operations are serialized by a lock
    pub thread_safe: bool,
    /// How far the expiration scan walks on each maintenance pass
    pub scan_mode: ScanMode,
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity bound.
    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Removes the capacity bound.
    pub fn unbounded(mut self) -> Self {
        self.max_size = None;
        self
    }

    /// Sets the TTL for cache entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Disables TTL.
    pub fn no_expiration(mut self) -> Self {
        self.ttl = None;
        self
    }

    /// Enables the background sweeper with the given period.
    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = Some(interval);
        self
    }

    pub fn thread_safe(mut self, thread_safe: bool) -> Self {
        self.thread_safe = thread_safe;
        self
    }

    pub fn scan_mode(mut self, scan_mode: ScanMode) -> Self {
        self.scan_mode = scan_mode;
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum entries, or `none` (default: 128). `0` is
    ///   kept as is and rejected by `validate`, as with the builder.
    /// - `CACHE_TTL` - TTL in seconds, `0` or `none` disables (default: 300)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweeper period in seconds, 0 disables (default: 0)
    /// - `CACHE_THREAD_SAFE` - `true`/`false` (default: true)
    /// - `CACHE_SCAN_MODE` - `recency` or `full` (default: recency)
    ///
    /// Unset variables keep their defaults; malformed ones are an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(max_size) = read_var("CACHE_MAX_SIZE", parse_limit::<usize>)? {
            config.max_size = max_size;
        }
        if let Some(ttl) = read_var("CACHE_TTL", parse_limit::<u64>)? {
            config.ttl = ttl.map(Duration::from_secs);
        }
        if let Some(interval) = read_var("CACHE_CLEANUP_INTERVAL", parse_limit::<u64>)? {
            config.cleanup_interval = interval.map(Duration::from_secs);
        }
        if let Some(thread_safe) = read_var("CACHE_THREAD_SAFE", parse_bool)? {
            config.thread_safe = thread_safe;
        }
        if let Some(scan_mode) = read_var("CACHE_SCAN_MODE", ScanMode::from_str)? {
            config.scan_mode = scan_mode;
        }

        Ok(config)
    }

    /// Checks the configuration and returns its normalized form.
    ///
    /// - A zero `max_size` is rejected; use `None` for an unbounded cache.
    /// - A zero `ttl` or `cleanup_interval` is treated as unset.
    /// - A sweeper without thread safety is corrected to `thread_safe = true`
    ///   and reported with a warning.
    pub fn validate(mut self) -> Result<Self> {
        if self.max_size == Some(0) {
            return Err(CacheError::InvalidConfig(
                "max_size must be positive, use an unbounded cache instead of 0".to_string(),
            ));
        }

        self.ttl = self.ttl.filter(|ttl| !ttl.is_zero());
        self.cleanup_interval = self.cleanup_interval.filter(|interval| !interval.is_zero());

        if self.cleanup_interval.is_some() && !self.thread_safe {
            warn!("Background cleanup requires a thread safe cache, enabling thread safety");
            self.thread_safe = true;
        }

        Ok(self)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: Some(128),
            ttl: Some(Duration::from_secs(5 * 60)),
            cleanup_interval: None,
            thread_safe: true,
            scan_mode: ScanMode::RecencyOrdered,
        }
    }
}

// == Env Parsing ==
fn read_var<T, E, F>(name: &str, parse: F) -> Result<Option<T>>
where
    F: FnOnce(&str) -> std::result::Result<T, E>,
    E: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => parse(raw.trim())
            .map(Some)
            .map_err(|e| CacheError::InvalidConfig(format!("{}={:?}: {}", name, raw, e))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(CacheError::InvalidConfig(format!("{}: {}", name, e))),
    }
}

/// Parses a limit where `none`/`unbounded` mean "no limit".
///
/// Zero is passed through so `validate` treats it the same way for every source.
fn parse_limit<T>(raw: &str) -> std::result::Result<Option<T>, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if raw.eq_ignore_ascii_case("none") || raw.eq_ignore_ascii_case("unbounded") {
        return Ok(None);
    }
    raw.parse::<T>().map(Some).map_err(|e| e.to_string())
}

fn parse_bool(raw: &str) -> std::result::Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(format!("expected a boolean, got {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;

    // == Log Capture ==
    /// In-memory sink for formatted tracing output.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capturing_subscriber() -> (impl tracing::Subscriber + Send + Sync, CapturedLogs) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        (subscriber, logs)
    }

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.max_size, Some(128));
        assert_eq!(config.ttl, Some(Duration::from_secs(300)));
        assert_eq!(config.cleanup_interval, None);
        assert!(config.thread_safe);
        assert_eq!(config.scan_mode, ScanMode::RecencyOrdered);
    }

    #[test]
    fn test_builder_setters() {
        let config = CacheConfig::new()
            .max_size(2)
            .ttl(Duration::from_secs(3))
            .cleanup_interval(Duration::from_secs(2))
            .scan_mode(ScanMode::Full);

        assert_eq!(config.max_size, Some(2));
        assert_eq!(config.ttl, Some(Duration::from_secs(3)));
        assert_eq!(config.cleanup_interval, Some(Duration::from_secs(2)));
        assert_eq!(config.scan_mode, ScanMode::Full);

        let config = config.unbounded().no_expiration();
        assert_eq!(config.max_size, None);
        assert_eq!(config.ttl, None);
    }

    #[test]
    fn test_validate_rejects_zero_max_size() {
        let result = CacheConfig::new().max_size(0).validate();
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_normalizes_zero_durations() {
        let config = CacheConfig::new()
            .ttl(Duration::ZERO)
            .cleanup_interval(Duration::ZERO)
            .thread_safe(false)
            .validate()
            .unwrap();

        assert_eq!(config.ttl, None);
        assert_eq!(config.cleanup_interval, None);
        assert!(!config.thread_safe, "No sweeper, so no reason to force a lock");
    }

    #[test]
    fn test_validate_forces_thread_safety_for_sweeper() {
        let config = CacheConfig::new()
            .cleanup_interval(Duration::from_secs(1))
            .thread_safe(false)
            .validate()
            .unwrap();

        assert!(config.thread_safe);
        assert_eq!(config.cleanup_interval, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_validate_warns_when_forcing_thread_safety() {
        let (subscriber, logs) = capturing_subscriber();

        tracing::subscriber::with_default(subscriber, || {
            CacheConfig::new()
                .cleanup_interval(Duration::from_secs(1))
                .thread_safe(false)
                .validate()
                .unwrap();
        });

        let output = logs.contents();
        assert!(output.contains("WARN"), "expected a warning, got: {}", output);
        assert!(output.contains("enabling thread safety"));
    }

    #[test]
    fn test_validate_silent_without_conflict() {
        let (subscriber, logs) = capturing_subscriber();

        tracing::subscriber::with_default(subscriber, || {
            CacheConfig::new()
                .cleanup_interval(Duration::from_secs(1))
                .validate()
                .unwrap();
        });

        assert!(!logs.contents().contains("WARN"));
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit::<usize>("10"), Ok(Some(10)));
        assert_eq!(parse_limit::<usize>("0"), Ok(Some(0)));
        assert_eq!(parse_limit::<usize>("none"), Ok(None));
        assert_eq!(parse_limit::<u64>("Unbounded"), Ok(None));
        assert!(parse_limit::<u64>("ten").is_err());
        assert!(parse_limit::<u64>("-1").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_config_from_env() {
        // Only this test touches these variables
        env::set_var("CACHE_MAX_SIZE", "2");
        env::set_var("CACHE_TTL", "none");
        env::set_var("CACHE_CLEANUP_INTERVAL", "5");
        env::set_var("CACHE_THREAD_SAFE", "false");
        env::set_var("CACHE_SCAN_MODE", "full");

        let config = CacheConfig::from_env().unwrap();
        assert_eq!(config.max_size, Some(2));
        assert_eq!(config.ttl, None);
        assert_eq!(config.cleanup_interval, Some(Duration::from_secs(5)));
        assert!(!config.thread_safe);
        assert_eq!(config.scan_mode, ScanMode::Full);

        // Zero means the same thing as it does through the builder
        env::set_var("CACHE_MAX_SIZE", "0");
        env::set_var("CACHE_TTL", "0");
        let config = CacheConfig::from_env().unwrap();
        assert_eq!(config.max_size, Some(0));
        assert!(matches!(config.clone().validate(), Err(CacheError::InvalidConfig(_))));
        let config = config.max_size(2).validate().unwrap();
        assert_eq!(config.ttl, None);

        env::set_var("CACHE_TTL", "soon");
        let result = CacheConfig::from_env();
        assert!(matches!(result, Err(CacheError::InvalidConfig(_))));

        for name in [
            "CACHE_MAX_SIZE",
            "CACHE_TTL",
            "CACHE_CLEANUP_INTERVAL",
            "CACHE_THREAD_SAFE",
            "CACHE_SCAN_MODE",
        ] {
            env::remove_var(name);
        }

        assert_eq!(CacheConfig::from_env().unwrap(), CacheConfig::default());
    }
}
