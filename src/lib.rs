//! Map Cache - An in-process memoizing cache for async computations
//!
//! Returns a previously computed value while it is still valid, or runs the
//! caller's producer, stores the result and returns it. Entries can expire after
//! a TTL and can be removed proactively by a scheduled eviction.
//!
//! ```
//! use map_cache::{FetchRequest, MapCache};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let prices: MapCache<f64> = MapCache::new();
//!
//! let request = FetchRequest::new("price")
//!     .params(&serde_json::json!({ "symbol": "SOL" }))
//!     .expires_in_seconds(30)
//!     .delete_on_expiry(true);
//! let price = prices.fetch(request, || async { Ok::<_, anyhow::Error>(142.5) }).await?;
//!
//! assert_eq!(price, 142.5);
//! assert_eq!(prices.size(), 1);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{build_key, CacheStats, FetchRequest, MapCache};
pub use config::Config;
pub use error::{CacheError, Result};
