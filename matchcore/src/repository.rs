//! Storage-agnostic repository traits. `matchcore-db` provides the Diesel
//! implementation; tests use in-memory fakes so the engine and pipelines
//! never need a live database to exercise.

use chrono::{DateTime, Utc};

use crate::error::EngineError;
use crate::model::{Market, MarketLink, Venue, WatchlistItem};

/// Read access to normalized markets for one venue.
pub trait MarketRepository {
    fn markets_for_venue(&self, venue: Venue, since: DateTime<Utc>) -> Result<Vec<Market>, EngineError>;
    fn market_by_id(&self, id: i64) -> Result<Option<Market>, EngineError>;
}

/// Upsert access to suggested/confirmed/rejected cross-venue links.
/// Implementations must honor `LinkStatus::is_terminal`: a write that would
/// move an existing `Confirmed`/`Rejected` row back to `Suggested` is
/// rejected rather than silently applied.
pub trait MarketLinkRepository {
    fn upsert_links(&mut self, links: &[MarketLink]) -> Result<usize, EngineError>;
    fn links_for_market(&self, market_id: i64) -> Result<Vec<MarketLink>, EngineError>;
    fn existing_status(
        &self,
        left_market_id: i64,
        right_market_id: i64,
    ) -> Result<Option<crate::model::LinkStatus>, EngineError>;
}

/// Idempotent watchlist writes: re-running the policy with the same inputs
/// must produce the same persisted set, not an ever-growing one.
pub trait WatchlistRepository {
    fn replace_watchlist(&mut self, items: &[WatchlistItem]) -> Result<usize, EngineError>;
    fn current_watchlist(&self) -> Result<Vec<WatchlistItem>, EngineError>;
}

/// Write access for raw venue fetch results, kept separate from
/// `MarketRepository` since ingestion and matching run as distinct stages
/// and may use distinct connection pools in production.
pub trait IngestionRepository {
    fn upsert_markets(&mut self, venue: Venue, markets: &[Market]) -> Result<usize, EngineError>;
}

#[cfg(test)]
pub mod fakes {
    use super::*;
    use crate::model::LinkStatus;
    use std::collections::HashMap;

    /// In-memory `MarketRepository`/`MarketLinkRepository`/`WatchlistRepository`
    /// used by pipeline and engine tests.
    #[derive(Default)]
    pub struct InMemoryRepo {
        pub markets: HashMap<i64, Market>,
        pub links: HashMap<(i64, i64), MarketLink>,
        pub watchlist: Vec<WatchlistItem>,
    }

    impl MarketRepository for InMemoryRepo {
        fn markets_for_venue(&self, venue: Venue, since: DateTime<Utc>) -> Result<Vec<Market>, EngineError> {
            Ok(self
                .markets
                .values()
                .filter(|m| m.venue == venue && m.close_time.map(|c| c >= since).unwrap_or(true))
                .cloned()
                .collect())
        }

        fn market_by_id(&self, id: i64) -> Result<Option<Market>, EngineError> {
            Ok(self.markets.get(&id).cloned())
        }
    }

    impl MarketLinkRepository for InMemoryRepo {
        fn upsert_links(&mut self, links: &[MarketLink]) -> Result<usize, EngineError> {
            let mut written = 0;
            for link in links {
                let key = (link.left_market_id, link.right_market_id);
                match self.links.get_mut(&key) {
                    Some(existing) => {
                        // Score/reason/algo_version/updated_at always refresh so
                        // diagnostics stay current even for a link a human has
                        // already decided on; only the status column is
                        // protected once it reaches a terminal state.
                        existing.score = link.score;
                        existing.reason = link.reason.clone();
                        existing.algo_version = link.algo_version.clone();
                        existing.updated_at = link.updated_at;
                        if !existing.status.is_terminal() {
                            existing.status = link.status;
                        }
                    }
                    None => {
                        self.links.insert(key, link.clone());
                    }
                }
                written += 1;
            }
            Ok(written)
        }

        fn links_for_market(&self, market_id: i64) -> Result<Vec<MarketLink>, EngineError> {
            Ok(self
                .links
                .values()
                .filter(|l| l.left_market_id == market_id || l.right_market_id == market_id)
                .cloned()
                .collect())
        }

        fn existing_status(
            &self,
            left_market_id: i64,
            right_market_id: i64,
        ) -> Result<Option<LinkStatus>, EngineError> {
            Ok(self.links.get(&(left_market_id, right_market_id)).map(|l| l.status))
        }
    }

    impl WatchlistRepository for InMemoryRepo {
        fn replace_watchlist(&mut self, items: &[WatchlistItem]) -> Result<usize, EngineError> {
            self.watchlist = items.to_vec();
            Ok(self.watchlist.len())
        }

        fn current_watchlist(&self) -> Result<Vec<WatchlistItem>, EngineError> {
            Ok(self.watchlist.clone())
        }
    }

    impl IngestionRepository for InMemoryRepo {
        fn upsert_markets(&mut self, venue: Venue, markets: &[Market]) -> Result<usize, EngineError> {
            for market in markets {
                debug_assert_eq!(market.venue, venue);
                self.markets.insert(market.id, market.clone());
            }
            Ok(markets.len())
        }
    }

    #[test]
    fn terminal_link_status_is_never_overwritten_by_a_downgrade() {
        use crate::model::CanonicalTopic;

        let mut repo = InMemoryRepo::default();
        let confirmed = MarketLink {
            left_market_id: 1,
            right_market_id: 2,
            left_venue: Venue::Kalshi,
            right_venue: Venue::Polymarket,
            topic: CanonicalTopic::CryptoDaily,
            score: 0.95,
            reason: "exact match".into(),
            algo_version: "v1".into(),
            status: LinkStatus::Confirmed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repo.upsert_links(&[confirmed.clone()]).unwrap();

        let mut downgrade = confirmed.clone();
        downgrade.status = LinkStatus::Suggested;
        repo.upsert_links(&[downgrade]).unwrap();

        assert_eq!(
            repo.existing_status(1, 2).unwrap(),
            Some(LinkStatus::Confirmed)
        );
    }

    #[test]
    fn terminal_link_score_and_reason_still_refresh_on_rerun() {
        use crate::model::CanonicalTopic;

        let mut repo = InMemoryRepo::default();
        let confirmed = MarketLink {
            left_market_id: 1,
            right_market_id: 2,
            left_venue: Venue::Kalshi,
            right_venue: Venue::Polymarket,
            topic: CanonicalTopic::CryptoDaily,
            score: 0.90,
            reason: "stale reason".into(),
            algo_version: "v1".into(),
            status: LinkStatus::Confirmed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repo.upsert_links(&[confirmed.clone()]).unwrap();

        let mut rescored = confirmed.clone();
        rescored.score = 0.77;
        rescored.reason = "fresh reason".into();
        rescored.algo_version = "v2".into();
        repo.upsert_links(&[rescored]).unwrap();

        let refreshed = repo.links.get(&(1, 2)).unwrap();
        assert_eq!(refreshed.score, 0.77);
        assert_eq!(refreshed.reason, "fresh reason");
        assert_eq!(refreshed.algo_version, "v2");
        assert_eq!(refreshed.status, LinkStatus::Confirmed);
    }
}
