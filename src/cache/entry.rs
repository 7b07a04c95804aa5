//! Cache Entry Module
//!
//! Defines a memoized value together with its TTL metadata and optional eviction timer.

use std::time::Duration;

use tokio::time::Instant;

use crate::tasks::EvictionHandle;

// == Cache Entry ==
/// A single memoized value with the metadata needed to judge its freshness.
#[derive(Debug)]
pub(crate) struct CacheEntry<V> {
    /// The memoized value
    pub value: V,
    /// Instant the entry was written
    pub stored_at: Instant,
    /// Validity in seconds, None = never expires
    pub ttl_seconds: Option<i64>,
    /// Write counter value, lets a timer recognise the entry it was scheduled for
    pub(crate) generation: u64,
    /// Pending auto-eviction, aborted when the entry is dropped
    pub(crate) eviction: Option<EvictionHandle>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped with the current instant.
    pub fn new(value: V, ttl_seconds: Option<i64>) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl_seconds,
            generation: 0,
            eviction: None,
        }
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub(crate) fn with_eviction(mut self, eviction: Option<EvictionHandle>) -> Self {
        self.eviction = eviction;
        self
    }

    // == Expires At ==
    /// Instant at which the entry stops being served.
    ///
    /// `None` when the entry has no TTL, or when the TTL is too large to represent.
    pub fn expires_at(&self) -> Option<Instant> {
        match self.ttl_seconds? {
            ttl if ttl <= 0 => Some(self.stored_at),
            ttl => self.stored_at.checked_add(Duration::from_secs(ttl as u64)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: expired once `now >= stored_at + ttl`. A zero or negative
    /// TTL is therefore expired on the very next check.
    pub fn is_expired(&self) -> bool {
        match self.expires_at() {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }

    /// True while an auto-eviction timer is attached to this entry.
    #[cfg(test)]
    pub(crate) fn has_scheduled_eviction(&self) -> bool {
        self.eviction.is_some()
    }
}
