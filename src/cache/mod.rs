//! Cache Module
//!
//! Memoizes async computations under composite keys, with TTL expiration and
//! optional scheduled eviction.

mod engine;
mod entry;
pub mod key;
mod request;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use engine::MapCache;
pub(crate) use entry::CacheEntry;
pub use key::build_key;
pub use request::FetchRequest;
pub use stats::CacheStats;
pub(crate) use store::CacheStore;
