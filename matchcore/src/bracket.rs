//! Bracket grouping for crypto threshold markets. A single venue often
//! lists several adjacent threshold brackets for the same underlying and
//! settle date (e.g. Kalshi's "$95k-100k", "$100k-105k" ladder); without
//! grouping, each one would independently try to match against the single
//! broader-threshold market the other venue lists, producing a pile of
//! redundant suggestions for what is really one real-world event.

use std::collections::HashMap;

use crate::model::{Market, MarketLink};
use crate::signals::crypto::CryptoSignals;
use crate::signals::Signals;

/// `(entity, settle date period key, comparator)` identifies one bracket
/// group. Two markets with the same key are considered ladder rungs of
/// the same underlying event.
type GroupKey = (String, String, String);

fn group_key(signals: &CryptoSignals) -> Option<GroupKey> {
    let entity = signals.common.entity.clone()?;
    let period = signals.date.period_key.clone()?;
    let comparator = signals.comparator.map(|c| format!("{c:?}"))?;
    Some((entity, period, comparator))
}

/// Within each bracket group, keep only the link whose score is highest;
/// links scoring lower than their group's best are dropped unless they are
/// themselves the sole representative of their `right_market_id` (so a
/// right-side market genuinely matched by more than one rung still
/// produces at most one suggestion, not a silent loss of every bracket's
/// best possible pairing).
///
/// Invariant preserved: this never reduces the highest score seen within a
/// group; it only removes strictly-lower-scoring duplicates.
pub fn apply_bracket_grouping(
    links: Vec<MarketLink>,
    signals_by_market: &HashMap<i64, Signals>,
) -> Vec<MarketLink> {
    let mut groups: HashMap<GroupKey, Vec<MarketLink>> = HashMap::new();
    let mut ungrouped = Vec::new();

    for link in links {
        let key = signals_by_market
            .get(&link.left_market_id)
            .and_then(|s| match s {
                Signals::Crypto(c) => group_key(c),
                _ => None,
            });
        match key {
            Some(key) => groups.entry(key).or_default().push(link),
            None => ungrouped.push(link),
        }
    }

    let mut result = ungrouped;
    for (_, mut group_links) in groups {
        group_links.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        let mut seen_right: std::collections::HashSet<i64> = std::collections::HashSet::new();
        for link in group_links {
            if seen_right.insert(link.right_market_id) {
                result.push(link);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CanonicalTopic, LinkStatus, Venue};
    use crate::signals::comparator::Comparator;
    use crate::signals::crypto::{CryptoSubtype, SettleDateSource};
    use crate::signals::dates::{DateSignal, DateType};
    use crate::signals::SignalsCommon;
    use chrono::Utc;

    fn crypto_signals(entity: &str, period_key: &str) -> Signals {
        Signals::Crypto(CryptoSignals {
            common: SignalsCommon {
                entity: Some(entity.to_string()),
                entities: vec![entity.to_string()],
                title_tokens: vec![],
            },
            subtype: CryptoSubtype::DailyThreshold,
            comparator: Some(Comparator::Ge),
            numbers: vec![100_000.0],
            date: DateSignal {
                date_type: DateType::DayExact,
                target_date: None,
                period_key: Some(period_key.to_string()),
            },
            settle_date_source: SettleDateSource::TitleParse,
        })
    }

    fn link(left: i64, right: i64, score: f32) -> MarketLink {
        MarketLink {
            left_market_id: left,
            right_market_id: right,
            left_venue: Venue::Kalshi,
            right_venue: Venue::Polymarket,
            topic: CanonicalTopic::CryptoDaily,
            score,
            reason: String::new(),
            algo_version: "v1".into(),
            status: LinkStatus::Suggested,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn keeps_highest_scoring_rung_per_group() {
        let mut signals = HashMap::new();
        signals.insert(1, crypto_signals("BITCOIN", "2026-01"));
        signals.insert(2, crypto_signals("BITCOIN", "2026-01"));

        let links = vec![link(1, 100, 0.70), link(2, 100, 0.95)];
        let result = apply_bracket_grouping(links, &signals);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].score, 0.95);
    }

    #[test]
    fn never_drops_the_highest_score_in_a_group() {
        let mut signals = HashMap::new();
        signals.insert(1, crypto_signals("BITCOIN", "2026-01"));
        signals.insert(2, crypto_signals("BITCOIN", "2026-01"));
        signals.insert(3, crypto_signals("BITCOIN", "2026-01"));

        let links = vec![link(1, 100, 0.40), link(2, 100, 0.80), link(3, 100, 0.60)];
        let result = apply_bracket_grouping(links, &signals);
        let max_score = result.iter().map(|l| l.score).fold(0.0_f32, f32::max);
        assert_eq!(max_score, 0.80);
    }

    #[test]
    fn ungrouped_links_pass_through() {
        let signals: HashMap<i64, Signals> = HashMap::new();
        let links = vec![link(1, 100, 0.5)];
        let result = apply_bracket_grouping(links, &signals);
        assert_eq!(result.len(), 1);
    }
}
