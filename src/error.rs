//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key absent, or removed by the maintenance pass that ran just before the lookup
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid construction parameter
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Builds a `NotFound` error from any debuggable key.
    pub fn not_found<Q: std::fmt::Debug + ?Sized>(key: &Q) -> Self {
        CacheError::NotFound(format!("{:?}", key))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
