//! Background Tasks Module
//!
//! Contains the deferred tasks a cache spawns on the tokio runtime.
//!
//! # Tasks
//! - Auto-eviction: removes one entry once its TTL has elapsed

mod eviction;

pub(crate) use eviction::EvictionHandle;
pub(crate) use eviction::schedule_eviction;
