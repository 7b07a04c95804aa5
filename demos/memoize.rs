//! Memoizes a slow lookup and shows hits, params and TTL expiry.
//!
//! Run with `RUST_LOG=map_cache=debug cargo run --example memoize`.

use std::time::Duration;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use map_cache::{Config, FetchRequest, MapCache};

#[derive(Serialize)]
struct QuoteQuery<'a> {
    symbol: &'a str,
    currency: &'a str,
}

/// Stands in for a network call.
async fn load_quote(symbol: &str) -> anyhow::Result<f64> {
    tokio::time::sleep(Duration::from_millis(300)).await;
    Ok(symbol.len() as f64 * 10.0)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memoize=info,map_cache=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let quotes: MapCache<f64> = MapCache::with_config(Config::from_env().with_name("quotes"));

    for symbol in ["SOL", "SOL", "BTC"] {
        let query = QuoteQuery {
            symbol,
            currency: "USD",
        };
        let request = FetchRequest::new("quote")
            .params(&query)
            .expires_in_seconds(1)
            .delete_on_expiry(true);
        let price = quotes.fetch(request, || load_quote(symbol)).await?;
        info!("{} = {}", symbol, price);
    }
    info!("Cached quotes: {}", quotes.size());

    tokio::time::sleep(Duration::from_millis(1100)).await;
    info!("Cached quotes after expiry: {}", quotes.size());
    info!("Stats: {}", serde_json::to_string(&quotes.stats())?);

    Ok(())
}
