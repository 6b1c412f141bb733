//! Engine configuration. Mirrors the options table in the external
//! interfaces section one-for-one, with the documented defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::CanonicalTopic;

/// Per-topic watchlist "candidate-safe" score floor, i.e. the score above
/// which a `suggested` link is treated as if it would have auto-confirmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistConfig {
    pub max_total: usize,
    pub max_per_venue: usize,
    pub max_top_suggested: usize,
    pub safe_score_by_topic: HashMap<String, f32>,
}
impl Default for WatchlistConfig {
    fn default() -> Self {
        let mut safe_score_by_topic = HashMap::new();
        safe_score_by_topic.insert("MACRO".to_string(), 0.80);
        safe_score_by_topic.insert("CRYPTO_DAILY".to_string(), 0.88);
        safe_score_by_topic.insert("SPORTS".to_string(), 0.90);
        WatchlistConfig {
            max_total: 2000,
            max_per_venue: 1000,
            max_top_suggested: 500,
            safe_score_by_topic,
        }
    }
}
impl WatchlistConfig {
    pub fn safe_floor(&self, topic: CanonicalTopic) -> f32 {
        self.safe_score_by_topic
            .get(&topic.to_string())
            .copied()
            .unwrap_or(0.90)
    }
}

/// Top-level configuration object consumed by the engine loop and the
/// watchlist policy. `Default` matches every documented default; a real
/// deployment layers a TOML/YAML file and environment variables on top
/// (see `matchcore-db`/`match-engine` for the loading side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    pub lookback_hours: i64,
    pub max_candidates_per_left: usize,
    pub min_score_by_topic: HashMap<String, f32>,
    pub auto_confirm_enabled: HashMap<String, bool>,
    pub auto_reject_enabled: HashMap<String, bool>,
    pub bracket_grouping: bool,
    pub write_batch_size: usize,
    pub write_min_batch_size: usize,
    pub fetch_timeout_ms: u64,
    pub fetch_max_attempts: u32,
    pub watchlist: WatchlistConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        let mut min_score_by_topic = HashMap::new();
        for (topic, floor) in [
            ("CRYPTO_DAILY", 0.55),
            ("CRYPTO_INTRADAY", 0.55),
            ("MACRO", 0.50),
            ("RATES", 0.50),
            ("COMMODITIES", 0.50),
            ("ELECTIONS", 0.55),
            ("SPORTS", 0.60),
            ("FINANCE", 0.50),
            ("GEOPOLITICS", 0.50),
            ("ENTERTAINMENT", 0.50),
            ("CLIMATE", 0.50),
            ("UNIVERSAL", 0.50),
        ] {
            min_score_by_topic.insert(topic.to_string(), floor);
        }

        let mut auto_confirm_enabled = HashMap::new();
        let mut auto_reject_enabled = HashMap::new();
        for topic in CanonicalTopic::all() {
            let key = topic.to_string();
            let confirm = !matches!(
                topic,
                CanonicalTopic::Elections | CanonicalTopic::Unknown | CanonicalTopic::Universal
            );
            auto_confirm_enabled.insert(key.clone(), confirm);
            auto_reject_enabled.insert(key, !matches!(topic, CanonicalTopic::Unknown));
        }

        MatchConfig {
            lookback_hours: 720,
            max_candidates_per_left: 5,
            min_score_by_topic,
            auto_confirm_enabled,
            auto_reject_enabled,
            bracket_grouping: true,
            write_batch_size: 500,
            write_min_batch_size: 10,
            fetch_timeout_ms: 30_000,
            fetch_max_attempts: 3,
            watchlist: WatchlistConfig::default(),
        }
    }
}

impl MatchConfig {
    pub fn min_score(&self, topic: CanonicalTopic) -> f32 {
        self.min_score_by_topic
            .get(&topic.to_string())
            .copied()
            .unwrap_or(0.5)
    }

    pub fn is_auto_confirm_enabled(&self, topic: CanonicalTopic) -> bool {
        self.auto_confirm_enabled
            .get(&topic.to_string())
            .copied()
            .unwrap_or(false)
    }

    pub fn is_auto_reject_enabled(&self, topic: CanonicalTopic) -> bool {
        self.auto_reject_enabled
            .get(&topic.to_string())
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = MatchConfig::default();
        assert_eq!(cfg.lookback_hours, 720);
        assert_eq!(cfg.max_candidates_per_left, 5);
        assert_eq!(cfg.write_batch_size, 500);
        assert_eq!(cfg.write_min_batch_size, 10);
        assert_eq!(cfg.fetch_timeout_ms, 30_000);
        assert_eq!(cfg.fetch_max_attempts, 3);
        assert_eq!(cfg.watchlist.max_total, 2000);
        assert_eq!(cfg.watchlist.max_per_venue, 1000);
        assert_eq!(cfg.watchlist.max_top_suggested, 500);
    }

    #[test]
    fn elections_never_auto_confirm() {
        let cfg = MatchConfig::default();
        assert!(!cfg.is_auto_confirm_enabled(CanonicalTopic::Elections));
    }

    #[test]
    fn watchlist_safe_floors_per_topic() {
        let cfg = MatchConfig::default();
        assert_eq!(cfg.watchlist.safe_floor(CanonicalTopic::Macro), 0.80);
        assert_eq!(cfg.watchlist.safe_floor(CanonicalTopic::CryptoDaily), 0.88);
        assert_eq!(cfg.watchlist.safe_floor(CanonicalTopic::Sports), 0.90);
    }
}
