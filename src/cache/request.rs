//! Fetch Request Module
//!
//! Describes what to look up and how long the computed value stays valid.

use serde::Serialize;
use serde_json::Value;

use crate::cache::key::CompositeKey;
use crate::error::{CacheError, Result};

// == Fetch Request ==
/// Options for a single [`MapCache::fetch`](crate::MapCache::fetch) call.
///
/// ```
/// use map_cache::FetchRequest;
///
/// let request = FetchRequest::new("quotes")
///     .params(&("SOL", 10))
///     .expires_in_seconds(30)
///     .delete_on_expiry(true);
/// assert_eq!(request.key(), "quotes");
/// ```
#[derive(Debug)]
pub struct FetchRequest {
    key: String,
    /// Params converted at attach time; a failure is reported by `fetch`
    params: Option<Result<Value>>,
    expires_in_seconds: Option<i64>,
    delete_on_expiry: bool,
}

impl FetchRequest {
    // == Constructor ==
    /// Creates a request for `key` with no params, no TTL and no auto-eviction.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            params: None,
            expires_in_seconds: None,
            delete_on_expiry: false,
        }
    }

    /// Attaches structured params. Structurally equal params map to the same entry.
    pub fn params<P>(mut self, params: &P) -> Self
    where
        P: Serialize + ?Sized,
    {
        self.params = Some(serde_json::to_value(params).map_err(CacheError::from));
        self
    }

    /// Sets the TTL. Zero or negative values force recomputation on every fetch.
    pub fn expires_in_seconds(mut self, seconds: i64) -> Self {
        self.expires_in_seconds = Some(seconds);
        self
    }

    /// Also remove the entry once the TTL elapses, without waiting for another fetch.
    pub fn delete_on_expiry(mut self, delete: bool) -> Self {
        self.delete_on_expiry = delete;
        self
    }

    // == Accessors ==
    /// Base key, before params are folded in.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// TTL in seconds set on this request, if any.
    pub fn ttl_seconds(&self) -> Option<i64> {
        self.expires_in_seconds
    }

    /// Whether the entry is removed by a timer once its TTL elapses.
    pub fn deletes_on_expiry(&self) -> bool {
        self.delete_on_expiry
    }

    /// Splits the request into its composite key, TTL and eviction flag.
    pub(crate) fn into_parts(self) -> Result<(CompositeKey, Option<i64>, bool)> {
        let key = match self.params.transpose()? {
            None => CompositeKey::bare(self.key),
            Some(params) => CompositeKey::with_params(self.key, &params)?,
        };
        Ok((key, self.expires_in_seconds, self.delete_on_expiry))
    }
}

impl From<&str> for FetchRequest {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for FetchRequest {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}
