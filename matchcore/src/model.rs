//! The data model shared by every layer of the matching engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An external prediction-market provider.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Venue {
    Kalshi,
    Polymarket,
}
impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Venue::Kalshi => write!(f, "kalshi"),
            Venue::Polymarket => write!(f, "polymarket"),
        }
    }
}

/// Lifecycle state of a market as reported by its venue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketStatus {
    Active,
    Closed,
    Resolved,
    Archived,
}
impl MarketStatus {
    /// Whether markets in this status are eligible for matching at all.
    pub fn is_matchable(&self) -> bool {
        matches!(self, MarketStatus::Active | MarketStatus::Closed)
    }
}

/// The side an outcome represents within its market.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeSide {
    Yes,
    No,
    Other,
}

/// One tradable answer within a market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub name: String,
    pub side: OutcomeSide,
}

/// Opaque per-venue metadata, already shaped into a small key/value tree.
///
/// Venue adapters parse their raw JSON payload down to this projection at
/// ingestion time; nothing past this point carries a raw blob.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// A single tradable question on a venue, normalized to the common schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    pub id: i64,
    pub venue: Venue,
    pub external_id: String,
    pub title: String,
    pub category: Option<String>,
    pub status: MarketStatus,
    pub close_time: Option<DateTime<Utc>>,
    pub derived_topic: Option<CanonicalTopic>,
    pub metadata: Metadata,
    pub outcomes: Vec<Outcome>,
}

impl Market {
    /// A market is eligible for matching if it is active/closed and its
    /// close time (if any) is not older than `lookback_hours`.
    pub fn is_eligible(&self, now: DateTime<Utc>, lookback_hours: i64) -> bool {
        if !self.status.is_matchable() {
            return false;
        }
        match self.close_time {
            Some(close) => (now - close).num_hours() <= lookback_hours,
            None => true,
        }
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

/// The fixed enum of real-world question categories the engine understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalTopic {
    CryptoDaily,
    CryptoIntraday,
    Macro,
    Rates,
    Elections,
    Commodities,
    Sports,
    Geopolitics,
    Entertainment,
    Finance,
    Climate,
    Universal,
    Unknown,
}
impl fmt::Display for CanonicalTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CanonicalTopic::CryptoDaily => "CRYPTO_DAILY",
            CanonicalTopic::CryptoIntraday => "CRYPTO_INTRADAY",
            CanonicalTopic::Macro => "MACRO",
            CanonicalTopic::Rates => "RATES",
            CanonicalTopic::Elections => "ELECTIONS",
            CanonicalTopic::Commodities => "COMMODITIES",
            CanonicalTopic::Sports => "SPORTS",
            CanonicalTopic::Geopolitics => "GEOPOLITICS",
            CanonicalTopic::Entertainment => "ENTERTAINMENT",
            CanonicalTopic::Finance => "FINANCE",
            CanonicalTopic::Climate => "CLIMATE",
            CanonicalTopic::Universal => "UNIVERSAL",
            CanonicalTopic::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}
impl CanonicalTopic {
    pub fn all() -> Vec<CanonicalTopic> {
        vec![
            CanonicalTopic::CryptoDaily,
            CanonicalTopic::CryptoIntraday,
            CanonicalTopic::Macro,
            CanonicalTopic::Rates,
            CanonicalTopic::Elections,
            CanonicalTopic::Commodities,
            CanonicalTopic::Sports,
            CanonicalTopic::Geopolitics,
            CanonicalTopic::Entertainment,
            CanonicalTopic::Finance,
            CanonicalTopic::Climate,
            CanonicalTopic::Universal,
            CanonicalTopic::Unknown,
        ]
    }
}

/// Where a classification decision came from, for diagnostics.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationSource {
    Ticker,
    Category,
    Tags,
    Title,
    Metadata,
    Fallback,
}

/// The output of the topic classifier for one market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub topic: CanonicalTopic,
    pub confidence: f32,
    pub source: ClassificationSource,
}

/// Lifecycle status of a suggested cross-venue link.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkStatus {
    Suggested,
    Confirmed,
    Rejected,
}
impl LinkStatus {
    /// Human review decisions are terminal; the engine must never move a
    /// link away from one of these states back to `Suggested`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LinkStatus::Confirmed | LinkStatus::Rejected)
    }
}

/// A suggested (or confirmed/rejected) correspondence between two markets
/// on different venues believed to reference the same real-world event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketLink {
    pub left_market_id: i64,
    pub right_market_id: i64,
    pub left_venue: Venue,
    pub right_venue: Venue,
    pub topic: CanonicalTopic,
    pub score: f32,
    pub reason: String,
    pub algo_version: String,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Priority tiers assigned to watchlist entries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WatchPriority {
    Confirmed = 100,
    CandidateSafe = 80,
    TopSuggested = 50,
}
impl WatchPriority {
    pub fn value(&self) -> u8 {
        match self {
            WatchPriority::Confirmed => 100,
            WatchPriority::CandidateSafe => 80,
            WatchPriority::TopSuggested => 50,
        }
    }
}

/// A `(venue, marketId)` whose quotes should be polled at the given priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub venue: Venue,
    pub market_id: i64,
    pub priority: u8,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_active_market_with_no_close_time() {
        let market = sample_market(MarketStatus::Active, None);
        assert!(market.is_eligible(Utc::now(), 720));
    }

    #[test]
    fn ineligible_when_closed_status_archived() {
        let market = sample_market(MarketStatus::Archived, None);
        assert!(!market.is_eligible(Utc::now(), 720));
    }

    #[test]
    fn ineligible_when_close_time_outside_lookback() {
        let close = Utc::now() - chrono::Duration::hours(1000);
        let market = sample_market(MarketStatus::Closed, Some(close));
        assert!(!market.is_eligible(Utc::now(), 720));
    }

    #[test]
    fn terminal_statuses() {
        assert!(LinkStatus::Confirmed.is_terminal());
        assert!(LinkStatus::Rejected.is_terminal());
        assert!(!LinkStatus::Suggested.is_terminal());
    }

    fn sample_market(status: MarketStatus, close_time: Option<DateTime<Utc>>) -> Market {
        Market {
            id: 1,
            venue: Venue::Kalshi,
            external_id: "X".into(),
            title: "Test market".into(),
            category: None,
            status,
            close_time,
            derived_topic: None,
            metadata: Metadata::new(),
            outcomes: vec![],
        }
    }
}
