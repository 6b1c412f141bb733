//! Kalshi catalog/quote adapter. Response shapes are illustrative — the
//! load-bearing parts are the retry/rate-limit behavior and the mapping
//! into the common `Market`/`Quote` records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use matchcore::model::{Market, MarketStatus, Outcome, OutcomeSide, Venue};

use crate::error::{classify_status, VenueError};
use crate::{Quote, VenueClient};

pub struct KalshiClient {
    base_url: String,
    http: ClientWithMiddleware,
}

impl KalshiClient {
    pub fn new(base_url: impl Into<String>, http: ClientWithMiddleware) -> KalshiClient {
        KalshiClient { base_url: base_url.into(), http }
    }

    fn err(&self, detail: impl Into<String>, kind: matchcore::error::FetchErrorKind) -> VenueError {
        VenueError { venue: "kalshi".to_string(), kind, detail: detail.into() }
    }
}

#[derive(Debug, Deserialize)]
struct KalshiMarketsResponse {
    markets: Vec<KalshiMarket>,
}

#[derive(Debug, Deserialize)]
struct KalshiMarket {
    ticker: String,
    title: String,
    category: Option<String>,
    status: String,
    close_time: Option<DateTime<Utc>>,
    series_ticker: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KalshiQuotesResponse {
    quotes: Vec<KalshiQuote>,
}

#[derive(Debug, Deserialize)]
struct KalshiQuote {
    ticker: String,
    yes_bid: Option<f64>,
    yes_ask: Option<f64>,
}

fn map_status(raw: &str) -> MarketStatus {
    match raw {
        "active" | "open" => MarketStatus::Active,
        "closed" => MarketStatus::Closed,
        "settled" | "finalized" => MarketStatus::Resolved,
        _ => MarketStatus::Archived,
    }
}

fn ticker_to_id(ticker: &str) -> i64 {
    // Kalshi tickers are stable strings, not integers; the matching engine
    // only needs a stable per-venue integer key, so this hashes the ticker
    // into one deterministically rather than maintaining a side table.
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    ticker.hash(&mut hasher);
    (hasher.finish() & 0x7FFF_FFFF_FFFF_FFFF) as i64
}

impl From<KalshiMarket> for Market {
    fn from(raw: KalshiMarket) -> Self {
        let mut metadata = BTreeMap::new();
        if let Some(series) = &raw.series_ticker {
            metadata.insert("series_ticker".to_string(), serde_json::json!(series));
        }
        Market {
            id: ticker_to_id(&raw.ticker),
            venue: Venue::Kalshi,
            external_id: raw.ticker,
            title: raw.title,
            category: raw.category,
            status: map_status(&raw.status),
            close_time: raw.close_time,
            derived_topic: None,
            metadata,
            outcomes: vec![
                Outcome { name: "Yes".to_string(), side: OutcomeSide::Yes },
                Outcome { name: "No".to_string(), side: OutcomeSide::No },
            ],
        }
    }
}

#[async_trait::async_trait]
impl VenueClient for KalshiClient {
    async fn fetch_markets(&self) -> Result<Vec<Market>, VenueError> {
        let url = format!("{}/markets", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.err(e.to_string(), matchcore::error::FetchErrorKind::Network))?;

        if !response.status().is_success() {
            let kind = classify_status(response.status());
            return Err(self.err(format!("status {}", response.status()), kind));
        }

        let body: KalshiMarketsResponse = response
            .json()
            .await
            .map_err(|e| self.err(e.to_string(), matchcore::error::FetchErrorKind::ParseError))?;

        Ok(body.markets.into_iter().map(Market::from).collect())
    }

    async fn fetch_quotes(&self, market_ids: &[i64]) -> Result<Vec<Quote>, VenueError> {
        let wanted: std::collections::HashSet<i64> = market_ids.iter().copied().collect();
        let url = format!("{}/markets/quotes", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.err(e.to_string(), matchcore::error::FetchErrorKind::Network))?;

        if !response.status().is_success() {
            let kind = classify_status(response.status());
            return Err(self.err(format!("status {}", response.status()), kind));
        }

        let body: KalshiQuotesResponse = response
            .json()
            .await
            .map_err(|e| self.err(e.to_string(), matchcore::error::FetchErrorKind::ParseError))?;

        Ok(body
            .quotes
            .into_iter()
            .map(|q| Quote {
                market_id: ticker_to_id(&q.ticker),
                yes_bid: q.yes_bid,
                yes_ask: q.yes_ask,
                observed_at: Utc::now(),
            })
            .filter(|q| wanted.is_empty() || wanted.contains(&q.market_id))
            .collect())
    }
}
