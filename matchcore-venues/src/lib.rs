//! Venue fetch adapters: one thin JSON-mapping layer per venue behind a
//! shared `VenueClient` trait, sharing the retry/rate-limit HTTP client.

pub mod client;
pub mod error;
pub mod kalshi;
pub mod polymarket;

use matchcore::model::Market;

use crate::error::VenueError;

/// What every venue adapter must provide: a catalog fetch (markets) and a
/// quote fetch (for watchlist polling). Exact response shapes are
/// venue-specific and illustrative; the interface and error taxonomy are
/// the load-bearing part.
#[async_trait::async_trait]
pub trait VenueClient: Send + Sync {
    async fn fetch_markets(&self) -> Result<Vec<Market>, VenueError>;
    async fn fetch_quotes(&self, market_ids: &[i64]) -> Result<Vec<Quote>, VenueError>;
}

/// A single best-bid/best-ask snapshot for one market's `yes` side.
#[derive(Debug, Clone)]
pub struct Quote {
    pub market_id: i64,
    pub yes_bid: Option<f64>,
    pub yes_ask: Option<f64>,
    pub observed_at: chrono::DateTime<chrono::Utc>,
}
