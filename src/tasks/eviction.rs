//! Auto-Eviction Task
//!
//! One-shot timer that removes a single entry once its TTL has elapsed,
//! whether or not the key is fetched again.

use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::key::CompositeKey;
use crate::cache::CacheStore;

// == Eviction Handle ==
/// Owns a scheduled eviction. Dropping the handle cancels the timer.
///
/// The handle lives on the entry it evicts, so replacing or clearing the entry
/// cancels the timer as part of the same store mutation.
#[derive(Debug)]
pub(crate) struct EvictionHandle {
    task: JoinHandle<()>,
}

impl Drop for EvictionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// == Schedule Eviction ==
/// Schedules removal of `key` after `delay`.
///
/// Only the entry written with `generation` is removed, so a timer that fires
/// while a newer entry is being stored leaves the newer entry alone. The task
/// holds a weak reference: a dropped cache is not kept alive by its timers.
///
/// Returns `None` when called outside a tokio runtime.
pub(crate) fn schedule_eviction<V>(
    store: Weak<Mutex<CacheStore<V>>>,
    cache_name: String,
    key: CompositeKey,
    generation: u64,
    delay: Duration,
) -> Option<EvictionHandle>
where
    V: Clone + Send + 'static,
{
    let runtime = Handle::try_current().ok()?;

    let task = runtime.spawn(async move {
        tokio::time::sleep(delay).await;

        let Some(store) = store.upgrade() else {
            debug!(cache = %cache_name, key = %key, "Cache dropped before eviction fired");
            return;
        };

        let removed = store.lock().evict(&key, generation);
        if removed {
            info!(cache = %cache_name, key = %key, "Auto-eviction removed expired entry");
        } else {
            debug!(cache = %cache_name, key = %key, "Auto-eviction skipped, entry was replaced");
        }
    });

    Some(EvictionHandle { task })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cache::CacheEntry;

    fn shared_store() -> Arc<Mutex<CacheStore<&'static str>>> {
        Arc::new(Mutex::new(CacheStore::new()))
    }

    fn write(store: &Arc<Mutex<CacheStore<&'static str>>>, key: &str, delay: Duration) -> u64 {
        let mut guard = store.lock();
        let generation = guard.next_generation();
        let handle = schedule_eviction(
            Arc::downgrade(store),
            "test".to_string(),
            CompositeKey::bare(key),
            generation,
            delay,
        );
        assert!(handle.is_some());
        let entry = CacheEntry::new("value", Some(delay.as_secs() as i64))
            .with_generation(generation)
            .with_eviction(handle);
        guard.insert(CompositeKey::bare(key), entry);
        generation
    }

    #[tokio::test(start_paused = true)]
    async fn test_eviction_removes_entry_after_delay() {
        let store = shared_store();
        write(&store, "expire_soon", Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(store.lock().len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(store.lock().len(), 0);
        assert_eq!(store.lock().stats().evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_cancels_previous_timer() {
        let store = shared_store();
        write(&store, "key", Duration::from_secs(1));
        write(&store, "key", Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.lock().len(), 1, "Newer entry must survive the old timer");

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert_eq!(store.lock().len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_timers() {
        let store = shared_store();
        write(&store, "key1", Duration::from_secs(1));
        write(&store, "key2", Duration::from_secs(1));
        store.lock().clear();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.lock().stats().evictions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_cancels_timer() {
        let store = shared_store();
        let handle = schedule_eviction(
            Arc::downgrade(&store),
            "test".to_string(),
            CompositeKey::bare("key"),
            1,
            Duration::from_secs(1),
        )
        .unwrap();
        let entry = CacheEntry::new("value", Some(1)).with_generation(1);
        store.lock().insert(CompositeKey::bare("key"), entry);
        drop(handle);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.lock().len(), 1);
        assert_eq!(store.lock().stats().evictions, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_store_is_not_kept_alive() {
        let store = shared_store();
        let weak = Arc::downgrade(&store);
        write(&store, "key", Duration::from_secs(1));
        drop(store);

        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_schedule_outside_runtime() {
        let store = shared_store();
        let handle = schedule_eviction(
            Arc::downgrade(&store),
            "test".to_string(),
            CompositeKey::bare("key"),
            1,
            Duration::from_secs(1),
        );
        assert!(handle.is_none());
    }
}
