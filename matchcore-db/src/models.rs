//! Row structs mirroring `schema.rs`, plus the conversions to/from
//! `matchcore`'s domain types. Diesel sees only these rows; nothing past
//! the repository boundary touches `diesel` types directly.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use matchcore::model::{Market, MarketLink, Metadata, Outcome, OutcomeSide, WatchlistItem};

use crate::convert::*;
use crate::error::RepoError;
use crate::schema::{market_links, markets, watchlist_items};

#[derive(Debug, Clone, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = markets)]
pub struct MarketRow {
    pub id: i64,
    pub venue: String,
    pub external_id: String,
    pub title: String,
    pub category: Option<String>,
    pub status: String,
    pub close_time: Option<DateTime<Utc>>,
    pub derived_topic: Option<String>,
    pub metadata: serde_json::Value,
    pub outcomes: serde_json::Value,
}

impl MarketRow {
    pub fn from_domain(m: &Market) -> MarketRow {
        MarketRow {
            id: m.id,
            venue: venue_to_str(m.venue).to_string(),
            external_id: m.external_id.clone(),
            title: m.title.clone(),
            category: m.category.clone(),
            status: status_to_str(m.status).to_string(),
            close_time: m.close_time,
            derived_topic: m.derived_topic.map(topic_to_str),
            metadata: serde_json::to_value(&m.metadata).unwrap_or(serde_json::Value::Null),
            outcomes: serde_json::to_value(
                m.outcomes
                    .iter()
                    .map(|o| serde_json::json!({ "name": o.name, "side": outcome_side_to_str(o.side) }))
                    .collect::<Vec<_>>(),
            )
            .unwrap_or(serde_json::Value::Null),
        }
    }

    pub fn into_domain(self) -> Result<Market, RepoError> {
        let metadata: Metadata = serde_json::from_value(self.metadata).unwrap_or_default();
        let outcomes: Vec<Outcome> = self
            .outcomes
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| {
                        let name = v.get("name")?.as_str()?.to_string();
                        let side = v.get("side")?.as_str().map(outcome_side_from_str).unwrap_or(OutcomeSide::Other);
                        Some(Outcome { name, side })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Market {
            id: self.id,
            venue: venue_from_str(&self.venue)?,
            external_id: self.external_id,
            title: self.title,
            category: self.category,
            status: status_from_str(&self.status)?,
            close_time: self.close_time,
            derived_topic: self.derived_topic.map(|s| topic_from_str(&s)).transpose()?,
            metadata,
            outcomes,
        })
    }
}

#[derive(Debug, Clone, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = market_links)]
pub struct MarketLinkRow {
    pub left_market_id: i64,
    pub right_market_id: i64,
    pub left_venue: String,
    pub right_venue: String,
    pub topic: String,
    pub score: f32,
    pub reason: String,
    pub algo_version: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MarketLinkRow {
    pub fn from_domain(link: &MarketLink) -> MarketLinkRow {
        MarketLinkRow {
            left_market_id: link.left_market_id,
            right_market_id: link.right_market_id,
            left_venue: venue_to_str(link.left_venue).to_string(),
            right_venue: venue_to_str(link.right_venue).to_string(),
            topic: topic_to_str(link.topic),
            score: link.score,
            reason: link.reason.clone(),
            algo_version: link.algo_version.clone(),
            status: link_status_to_str(link.status).to_string(),
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }

    pub fn into_domain(self) -> Result<MarketLink, RepoError> {
        Ok(MarketLink {
            left_market_id: self.left_market_id,
            right_market_id: self.right_market_id,
            left_venue: venue_from_str(&self.left_venue)?,
            right_venue: venue_from_str(&self.right_venue)?,
            topic: topic_from_str(&self.topic)?,
            score: self.score,
            reason: self.reason,
            algo_version: self.algo_version,
            status: link_status_from_str(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Queryable, Insertable, AsChangeset)]
#[diesel(table_name = watchlist_items)]
pub struct WatchlistItemRow {
    pub venue: String,
    pub market_id: i64,
    pub priority: i16,
    pub reason: String,
}

impl WatchlistItemRow {
    pub fn from_domain(item: &WatchlistItem) -> WatchlistItemRow {
        WatchlistItemRow {
            venue: venue_to_str(item.venue).to_string(),
            market_id: item.market_id,
            priority: item.priority as i16,
            reason: item.reason.clone(),
        }
    }

    pub fn into_domain(self) -> Result<WatchlistItem, RepoError> {
        Ok(WatchlistItem {
            venue: venue_from_str(&self.venue)?,
            market_id: self.market_id,
            priority: self.priority as u8,
            reason: self.reason,
        })
    }
}
