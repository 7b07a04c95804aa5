//! Configuration Module
//!
//! Settings for a cache instance. The cache never reads the environment on its own;
//! hosts call [`Config::from_env`] when they want that.

use std::env;

/// Cache instance configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Instance name, attached to every log record
    pub name: String,
    /// TTL applied when a request carries none. `None` = entries never expire
    pub default_ttl_seconds: Option<i64>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAP_CACHE_NAME` - Instance name (default: "map_cache")
    /// - `MAP_CACHE_DEFAULT_TTL` - Default TTL in seconds (default: unset, never expires)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            name: env::var("MAP_CACHE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.name),
            default_ttl_seconds: env::var("MAP_CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .or(defaults.default_ttl_seconds),
        }
    }

    // == Name ==
    /// Sets the instance name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    // == Default TTL ==
    /// Sets the TTL applied to requests that carry none.
    pub fn with_default_ttl(mut self, seconds: i64) -> Self {
        self.default_ttl_seconds = Some(seconds);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: "map_cache".to_string(),
            default_ttl_seconds: None,
        }
    }
}
