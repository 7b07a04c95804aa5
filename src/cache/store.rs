//! Cache Store Module
//!
//! The composite-key to entry mapping shared by a cache and its eviction timers.
//! Every method runs under the cache's lock, so each mutation is atomic.

use std::collections::HashMap;

use crate::cache::key::CompositeKey;
use crate::cache::{CacheEntry, CacheStats};

// == Lookup ==
/// Outcome of reading a key from the store.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Lookup<V> {
    /// Fresh entry, value cloned out
    Hit(V),
    /// No entry under the key
    Miss,
    /// Entry present but past its TTL; it stays in place until overwritten
    Expired,
}

// == Cache Store ==
#[derive(Debug)]
pub(crate) struct CacheStore<V> {
    /// Composite key to entry
    entries: HashMap<CompositeKey, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Source of entry generations
    last_generation: u64,
}

impl<V: Clone> CacheStore<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            last_generation: 0,
        }
    }

    // == Lookup ==
    /// Reads a key and records the hit, miss or expiry.
    ///
    /// Expired entries are left in the store: they still count towards `len`.
    pub(crate) fn lookup(&mut self, key: &CompositeKey) -> Lookup<V> {
        match self.entries.get(key) {
            Some(entry) if entry.is_expired() => {
                self.stats.record_expired();
                Lookup::Expired
            }
            Some(entry) => {
                self.stats.record_hit();
                Lookup::Hit(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                Lookup::Miss
            }
        }
    }

    // == Next Generation ==
    /// Reserves the generation for the next entry written.
    pub(crate) fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    // == Insert ==
    /// Stores an entry, replacing any previous one under the same key.
    ///
    /// The replaced entry is dropped here, which cancels its pending eviction.
    pub(crate) fn insert(&mut self, key: CompositeKey, entry: CacheEntry<V>) -> bool {
        let replaced = self.entries.insert(key, entry).is_some();
        self.stats.set_total_entries(self.entries.len());
        replaced
    }

    // == Evict ==
    /// Removes `key` only if it still holds the entry written with `generation`.
    ///
    /// Returns true when an entry was removed.
    pub(crate) fn evict(&mut self, key: &CompositeKey, generation: u64) -> bool {
        let current = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.generation == generation);
        if !current {
            return false;
        }

        self.entries.remove(key);
        self.stats.record_eviction();
        self.stats.set_total_entries(self.entries.len());
        true
    }

    // == Clear ==
    /// Removes every entry and cancels every pending eviction.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.stats.set_total_entries(0);
        count
    }

    // == Record Producer Failure ==
    pub(crate) fn record_producer_failure(&mut self) {
        self.stats.record_producer_failure();
    }

    // == Stats ==
    pub(crate) fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, key: &CompositeKey) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }
}
