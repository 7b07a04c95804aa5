//! Cache Engine Module
//!
//! Lookup-or-compute over the shared store, with TTL checks and optional
//! scheduled eviction.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::cache::key::CompositeKey;
use crate::cache::store::{CacheStore, Lookup};
use crate::cache::{CacheEntry, CacheStats, FetchRequest};
use crate::config::Config;
use crate::error::CacheError;
use crate::tasks::schedule_eviction;

// == Map Cache ==
/// Memoizing cache for values produced by async computations.
///
/// Clones share the same store. Values are handed out by `Clone`; cache an
/// `Arc<T>` to share one allocation between callers.
///
/// Concurrent fetches of the same key are not deduplicated: each may run its
/// producer, and the entry written last wins.
pub struct MapCache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    config: Arc<Config>,
}

impl<V> MapCache<V>
where
    V: Clone + Send + 'static,
{
    // == Constructor ==
    /// Creates an empty cache with the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty cache with the given configuration.
    pub fn with_config(config: Config) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new())),
            config: Arc::new(config),
        }
    }

    // == Fetch ==
    /// Returns the value stored for the request's composite key, or runs
    /// `producer` and stores its result.
    ///
    /// The producer is not called when a fresh entry exists. When it fails its
    /// error is returned as-is and the store is left untouched, so a previously
    /// cached value survives a failed recomputation. Invalid params are reported
    /// before the producer runs.
    ///
    /// ```
    /// use map_cache::{FetchRequest, MapCache};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> anyhow::Result<()> {
    /// let cache: MapCache<String> = MapCache::new();
    ///
    /// let value = cache
    ///     .fetch(FetchRequest::new("greeting").expires_in_seconds(60), || async {
    ///         Ok::<_, anyhow::Error>("hello".to_string())
    ///     })
    ///     .await?;
    /// assert_eq!(value, "hello");
    /// assert_eq!(cache.size(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch<F, Fut, E>(
        &self,
        request: impl Into<FetchRequest>,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        E: From<CacheError>,
    {
        let (key, ttl, delete_on_expiry) = request.into().into_parts()?;
        let ttl = ttl.or(self.config.default_ttl_seconds);
        let name = self.config.name.as_str();

        let lookup = self.store.lock().lookup(&key);
        match lookup {
            Lookup::Hit(value) => {
                debug!(cache = %name, key = %key, "Cache hit");
                return Ok(value);
            }
            Lookup::Miss => debug!(cache = %name, key = %key, "Cache miss, running producer"),
            Lookup::Expired => {
                debug!(cache = %name, key = %key, "Entry expired, running producer")
            }
        }

        let value = match producer().await {
            Ok(value) => value,
            Err(err) => {
                self.store.lock().record_producer_failure();
                warn!(cache = %name, key = %key, "Producer failed, cache left unchanged");
                return Err(err);
            }
        };

        self.store_value(key, value.clone(), ttl, delete_on_expiry);
        Ok(value)
    }

    /// Writes a freshly produced value, replacing any previous entry and its timer.
    fn store_value(&self, key: CompositeKey, value: V, ttl: Option<i64>, delete_on_expiry: bool) {
        let name = self.config.name.as_str();
        let mut store = self.store.lock();
        let generation = store.next_generation();

        let eviction = match ttl {
            Some(seconds) if delete_on_expiry => {
                let delay = Duration::from_secs(seconds.max(0) as u64);
                let handle = schedule_eviction(
                    Arc::downgrade(&self.store),
                    self.config.name.clone(),
                    key.clone(),
                    generation,
                    delay,
                );
                if handle.is_none() {
                    warn!(
                        cache = %name,
                        key = %key,
                        "No tokio runtime, auto-eviction not scheduled; entry expires lazily"
                    );
                }
                handle
            }
            _ => None,
        };

        let entry = CacheEntry::new(value, ttl)
            .with_generation(generation)
            .with_eviction(eviction);
        let replaced = store.insert(key.clone(), entry);

        debug!(
            cache = %name,
            key = %key,
            ttl_seconds = ?ttl,
            delete_on_expiry,
            replaced,
            "Stored value"
        );
    }

    // == Size ==
    /// Number of entries in the store, including expired entries not yet evicted.
    pub fn size(&self) -> usize {
        self.store.lock().len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    // == Clear ==
    /// Removes every entry and cancels every pending eviction.
    pub fn clear(&self) {
        let removed = self.store.lock().clear();
        info!(cache = %self.config.name, removed, "Cache cleared");
    }

    // == Stats ==
    /// Snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }

    // == Accessors ==
    /// Instance name used in log records.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Configuration this instance was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<V> Clone for MapCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<V> Default for MapCache<V>
where
    V: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for MapCache<V>
where
    V: Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCache")
            .field("name", &self.config.name)
            .field("size", &self.store.lock().len())
            .finish()
    }
}
