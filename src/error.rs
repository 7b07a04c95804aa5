//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the cache itself.
///
/// Producer errors never pass through this type: `fetch` returns them to the
/// caller as they were produced.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Parameters could not be turned into a canonical key
    #[error("Failed to serialize key params: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
