//! Polymarket catalog/quote adapter. Polymarket exposes per-outcome CLOB
//! token ids rather than Kalshi's single yes/no ticker, so the mapping
//! into `Market`/`Quote` differs from the Kalshi adapter even though the
//! trait contract is identical.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use matchcore::model::{Market, MarketStatus, Outcome, OutcomeSide, Venue};

use crate::error::{classify_status, VenueError};
use crate::{Quote, VenueClient};

pub struct PolymarketClient {
    base_url: String,
    http: ClientWithMiddleware,
}

impl PolymarketClient {
    pub fn new(base_url: impl Into<String>, http: ClientWithMiddleware) -> PolymarketClient {
        PolymarketClient { base_url: base_url.into(), http }
    }

    fn err(&self, detail: impl Into<String>, kind: matchcore::error::FetchErrorKind) -> VenueError {
        VenueError { venue: "polymarket".to_string(), kind, detail: detail.into() }
    }
}

#[derive(Debug, Deserialize)]
struct PolymarketMarketsResponse {
    data: Vec<PolymarketMarket>,
}

#[derive(Debug, Deserialize)]
struct PolymarketMarket {
    condition_id: String,
    question: String,
    category: Option<String>,
    closed: bool,
    active: bool,
    end_date: Option<DateTime<Utc>>,
    tokens: Vec<PolymarketToken>,
    event_slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PolymarketToken {
    token_id: String,
    outcome: String,
}

#[derive(Debug, Deserialize)]
struct PolymarketPricesResponse {
    prices: Vec<PolymarketPrice>,
}

#[derive(Debug, Deserialize)]
struct PolymarketPrice {
    condition_id: String,
    best_bid: Option<f64>,
    best_ask: Option<f64>,
}

fn map_status(market: &PolymarketMarket) -> MarketStatus {
    if market.closed {
        MarketStatus::Resolved
    } else if market.active {
        MarketStatus::Active
    } else {
        MarketStatus::Closed
    }
}

fn condition_id_to_id(condition_id: &str) -> i64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};
    let mut hasher = DefaultHasher::new();
    condition_id.hash(&mut hasher);
    (hasher.finish() & 0x7FFF_FFFF_FFFF_FFFF) as i64
}

fn map_outcome_side(outcome_name: &str) -> OutcomeSide {
    if outcome_name.eq_ignore_ascii_case("yes") {
        OutcomeSide::Yes
    } else {
        OutcomeSide::No
    }
}

impl From<PolymarketMarket> for Market {
    fn from(raw: PolymarketMarket) -> Self {
        let mut metadata = BTreeMap::new();
        if let Some(slug) = &raw.event_slug {
            metadata.insert("event_slug".to_string(), serde_json::json!(slug));
        }
        for token in &raw.tokens {
            metadata.insert(format!("token_id:{}", token.outcome), serde_json::json!(token.token_id));
        }
        let outcomes = raw
            .tokens
            .iter()
            .map(|t| Outcome { name: t.outcome.clone(), side: map_outcome_side(&t.outcome) })
            .collect();
        let status = map_status(&raw);
        Market {
            id: condition_id_to_id(&raw.condition_id),
            venue: Venue::Polymarket,
            external_id: raw.condition_id,
            title: raw.question,
            category: raw.category,
            status,
            close_time: raw.end_date,
            derived_topic: None,
            metadata,
            outcomes,
        }
    }
}

#[async_trait::async_trait]
impl VenueClient for PolymarketClient {
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

        let body: PolymarketMarketsResponse = response
            .json()
            .await
            .map_err(|e| self.err(e.to_string(), matchcore::error::FetchErrorKind::ParseError))?;

        Ok(body.data.into_iter().map(Market::from).collect())
    }

    async fn fetch_quotes(&self, market_ids: &[i64]) -> Result<Vec<Quote>, VenueError> {
        let wanted: std::collections::HashSet<i64> = market_ids.iter().copied().collect();
        let url = format!("{}/prices", self.base_url);
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

        let body: PolymarketPricesResponse = response
            .json()
            .await
            .map_err(|e| self.err(e.to_string(), matchcore::error::FetchErrorKind::ParseError))?;

        Ok(body
            .prices
            .into_iter()
            .map(|p| Quote {
                market_id: condition_id_to_id(&p.condition_id),
                yes_bid: p.best_bid,
                yes_ask: p.best_ask,
                observed_at: Utc::now(),
            })
            .filter(|q| wanted.is_empty() || wanted.contains(&q.market_id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_market_maps_to_resolved_regardless_of_active_flag() {
        let market = PolymarketMarket {
            condition_id: "0xabc".to_string(),
            question: "Will X happen?".to_string(),
            category: None,
            closed: true,
            active: true,
            end_date: None,
            tokens: vec![],
            event_slug: None,
        };
        assert_eq!(map_status(&market), MarketStatus::Resolved);
    }

    #[test]
    fn yes_outcome_name_is_case_insensitive() {
        assert_eq!(map_outcome_side("Yes"), OutcomeSide::Yes);
        assert_eq!(map_outcome_side("No"), OutcomeSide::No);
    }
}
