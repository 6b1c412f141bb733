//! The per-topic matching pipeline contract.
//!
//! Rather than one trait object per topic, pipelines are modeled as a
//! closed sum type (`PipelineKind`): every topic's block key, hard gate,
//! and weighted score live in one `match` per method. A topic with no
//! distinguishing structured vocabulary (geopolitics, entertainment,
//! climate, the universal fallback) shares the same `Generic` arm. This
//! keeps the weight tables and gates auditable in one place instead of
//! scattered across eight near-identical trait impls.

use crate::model::CanonicalTopic;
use crate::scoring::{
    close_time_proximity_score, comparator_score, date_score, entity_score, number_score,
    numbers_score, range_score, text_score, time_bucket_score, weighted_sum,
};
use crate::signals::comparator::Comparator;
use crate::signals::sports::SportsMarketType;
use crate::signals::Signals;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    CryptoDaily,
    CryptoIntraday,
    Macro,
    Rates,
    Commodities,
    Finance,
    Elections,
    Sports,
    Generic(CanonicalTopic),
}

impl PipelineKind {
    pub fn for_topic(topic: CanonicalTopic) -> PipelineKind {
        match topic {
            CanonicalTopic::CryptoDaily => PipelineKind::CryptoDaily,
            CanonicalTopic::CryptoIntraday => PipelineKind::CryptoIntraday,
            CanonicalTopic::Macro => PipelineKind::Macro,
            CanonicalTopic::Rates => PipelineKind::Rates,
            CanonicalTopic::Commodities => PipelineKind::Commodities,
            CanonicalTopic::Finance => PipelineKind::Finance,
            CanonicalTopic::Elections => PipelineKind::Elections,
            CanonicalTopic::Sports => PipelineKind::Sports,
            other => PipelineKind::Generic(other),
        }
    }

    pub fn topic(&self) -> CanonicalTopic {
        match self {
            PipelineKind::CryptoDaily => CanonicalTopic::CryptoDaily,
            PipelineKind::CryptoIntraday => CanonicalTopic::CryptoIntraday,
            PipelineKind::Macro => CanonicalTopic::Macro,
            PipelineKind::Rates => CanonicalTopic::Rates,
            PipelineKind::Commodities => CanonicalTopic::Commodities,
            PipelineKind::Finance => CanonicalTopic::Finance,
            PipelineKind::Elections => CanonicalTopic::Elections,
            PipelineKind::Sports => CanonicalTopic::Sports,
            PipelineKind::Generic(t) => *t,
        }
    }

    /// The blocking key used to index candidates before the O(n*m)
    /// comparison inside a block: two markets with different block keys
    /// are never compared at all. `None` means "falls into the unblocked
    /// bucket", compared against everything else unblocked in its topic.
    pub fn block_key(&self, signals: &Signals) -> Option<String> {
        match (self, signals) {
            (PipelineKind::CryptoDaily, Signals::Crypto(s)) | (PipelineKind::CryptoIntraday, Signals::Crypto(s)) => {
                s.common.entity.clone()
            }
            (PipelineKind::Macro, Signals::Macro(s)) => s.common.entity.clone(),
            (PipelineKind::Rates, Signals::Rates(s)) => s.common.entity.clone(),
            (PipelineKind::Commodities, Signals::Commodities(s)) => s.common.entity.clone(),
            (PipelineKind::Finance, Signals::Finance(s)) => s.common.entity.clone(),
            (PipelineKind::Elections, Signals::Elections(s)) => s.country.clone(),
            (PipelineKind::Sports, Signals::Sports(s)) => s.teams.as_ref().map(|(a, b)| format!("{a}|{b}")),
            (PipelineKind::Generic(_), Signals::Universal(s)) => s.common.entity.clone(),
            _ => None,
        }
    }

    /// Hard gates: a `false` here means the pair is never a candidate,
    /// regardless of what the weighted score would otherwise be.
    pub fn hard_gate(&self, left: &Signals, right: &Signals) -> bool {
        match (self, left, right) {
            (PipelineKind::CryptoDaily, Signals::Crypto(l), Signals::Crypto(r))
            | (PipelineKind::CryptoIntraday, Signals::Crypto(l), Signals::Crypto(r)) => {
                l.common.entity.is_some() && l.common.entity == r.common.entity
            }
            (PipelineKind::Macro, Signals::Macro(l), Signals::Macro(r)) => {
                l.entities.iter().any(|e| r.entities.contains(e))
            }
            (PipelineKind::Rates, Signals::Rates(l), Signals::Rates(r)) => l.bank == r.bank,
            (PipelineKind::Commodities, Signals::Commodities(l), Signals::Commodities(r)) => {
                l.underlying == r.underlying
            }
            (PipelineKind::Finance, Signals::Finance(l), Signals::Finance(r)) => {
                l.instrument.is_some() && l.instrument == r.instrument
            }
            (PipelineKind::Elections, Signals::Elections(l), Signals::Elections(r)) => {
                l.country.is_some() && l.country == r.country && l.office == r.office && l.year == r.year
            }
            (PipelineKind::Sports, Signals::Sports(l), Signals::Sports(r)) => {
                l.teams.is_some() && l.teams == r.teams && l.league == r.league && l.period == r.period
            }
            (PipelineKind::Generic(_), Signals::Universal(l), Signals::Universal(r)) => {
                !l.common.entities.is_empty() && l.common.entities.iter().any(|e| r.common.entities.contains(e))
            }
            _ => false,
        }
    }

    /// The weighted score plus a short human-readable breakdown string
    /// (used as `MarketLink::reason`).
    pub fn score(&self, left: &Signals, right: &Signals) -> (f32, String) {
        match (self, left, right) {
            (PipelineKind::CryptoDaily, Signals::Crypto(l), Signals::Crypto(r))
            | (PipelineKind::CryptoIntraday, Signals::Crypto(l), Signals::Crypto(r)) => {
                score_crypto(l, r)
            }
            (PipelineKind::Macro, Signals::Macro(l), Signals::Macro(r)) => score_macro(l, r),
            (PipelineKind::Rates, Signals::Rates(l), Signals::Rates(r)) => score_rates(l, r),
            (PipelineKind::Commodities, Signals::Commodities(l), Signals::Commodities(r)) => {
                score_commodities(l, r)
            }
            (PipelineKind::Finance, Signals::Finance(l), Signals::Finance(r)) => score_finance(l, r),
            (PipelineKind::Elections, Signals::Elections(l), Signals::Elections(r)) => {
                score_elections(l, r)
            }
            (PipelineKind::Sports, Signals::Sports(l), Signals::Sports(r)) => score_sports(l, r),
            (PipelineKind::Generic(_), Signals::Universal(l), Signals::Universal(r)) => {
                score_generic(l, r)
            }
            _ => (0.0, "signals variant mismatch".to_string()),
        }
    }
}

fn score_crypto(
    l: &crate::signals::crypto::CryptoSignals,
    r: &crate::signals::crypto::CryptoSignals,
) -> (f32, String) {
    let entity = entity_score(l.common.entity.as_deref(), r.common.entity.as_deref());
    let comparator = comparator_score(l.comparator, r.comparator);
    let number = if l.comparator == Some(Comparator::Between) && l.numbers.len() == 2 && r.numbers.len() == 2 {
        range_score((l.numbers[0], l.numbers[1]), (r.numbers[0], r.numbers[1]))
    } else {
        numbers_score(&l.numbers, &r.numbers)
    };
    let date = date_score(&l.date, &r.date);
    let score = weighted_sum(&[(entity, 0.45), (comparator, 0.10), (number, 0.20), (date, 0.25)]);
    (score, format!("entity={entity:.2} comparator={comparator:.2} number={number:.2} date={date:.2}"))
}

fn score_macro(l: &crate::signals::macro_topic::MacroSignals, r: &crate::signals::macro_topic::MacroSignals) -> (f32, String) {
    let entity = text_score(&l.entities, &r.entities);
    let date = date_score(&l.date, &r.date);
    let text = text_score(&l.common.title_tokens, &r.common.title_tokens);
    let score = weighted_sum(&[(entity, 0.40), (date, 0.35), (text, 0.25)]);
    (score, format!("entities={entity:.2} date={date:.2} text={text:.2}"))
}

fn score_rates(l: &crate::signals::rates::RatesSignals, r: &crate::signals::rates::RatesSignals) -> (f32, String) {
    let bank = if l.bank == r.bank { 1.0 } else { 0.0 };
    let action = if l.action == r.action { 1.0 } else { 0.0 };
    let bps = match (l.basis_points, r.basis_points) {
        (Some(a), Some(b)) => number_score(a, b),
        (None, None) => 0.5,
        _ => 0.3,
    };
    let date = date_score(&l.date, &r.date);
    let score = weighted_sum(&[(bank, 0.25), (action, 0.25), (bps, 0.20), (date, 0.30)]);
    (score, format!("bank={bank:.2} action={action:.2} bps={bps:.2} date={date:.2}"))
}

fn score_commodities(
    l: &crate::signals::commodities::CommoditySignals,
    r: &crate::signals::commodities::CommoditySignals,
) -> (f32, String) {
    let underlying = if l.underlying == r.underlying { 1.0 } else { 0.0 };
    let comparator = comparator_score(l.comparator, r.comparator);
    let number = numbers_score(&l.numbers, &r.numbers);
    let date = date_score(&l.date, &r.date);
    let score = weighted_sum(&[(underlying, 0.45), (comparator, 0.10), (number, 0.15), (date, 0.30)]);
    (score, format!("underlying={underlying:.2} comparator={comparator:.2} number={number:.2} date={date:.2}"))
}

fn score_finance(l: &crate::signals::finance::FinanceSignals, r: &crate::signals::finance::FinanceSignals) -> (f32, String) {
    let instrument = entity_score(l.instrument.as_deref(), r.instrument.as_deref());
    // Comparator isn't part of finance's weighted sum (unlike crypto/commodities):
    // direction already captures the up/down intent comparator would otherwise proxy for.
    let comparator = comparator_score(l.comparator, r.comparator);
    let number = numbers_score(&l.target, &r.target);
    let direction = if l.direction == r.direction { 1.0 } else { 0.0 };
    let date = date_score(&l.date, &r.date);
    let text = text_score(&l.common.title_tokens, &r.common.title_tokens);
    let score = weighted_sum(&[
        (instrument, 0.35),
        (number, 0.25),
        (direction, 0.15),
        (date, 0.15),
        (text, 0.10),
    ]);
    (score, format!("instrument={instrument:.2} comparator={comparator:.2} number={number:.2} direction={direction:.2} date={date:.2} text={text:.2}"))
}

fn score_elections(
    l: &crate::signals::elections::ElectionSignals,
    r: &crate::signals::elections::ElectionSignals,
) -> (f32, String) {
    let country = entity_score(l.country.as_deref(), r.country.as_deref());
    let office = if l.office == r.office { 1.0 } else { 0.0 };
    let year = match (l.year, r.year) {
        (Some(a), Some(b)) if a == b => 1.0,
        _ => 0.0,
    };
    let candidates = text_score(&l.candidates, &r.candidates);
    let text = text_score(&l.common.title_tokens, &r.common.title_tokens);
    // Intent isn't part of the weighted sum: a mismatch is an auto-reject
    // hard signal (see incompatible_election_intent in rules.rs), not a
    // matter of degree a weighted score should smooth over.
    let intent = if l.intent == r.intent { 1.0 } else { 0.0 };
    let score = weighted_sum(&[
        (country, 0.20),
        (office, 0.20),
        (year, 0.15),
        (text, 0.20),
        (candidates, 0.25),
    ]);
    (score, format!("country={country:.2} office={office:.2} year={year:.2} text={text:.2} candidates={candidates:.2} intent={intent:.2}"))
}

fn score_sports(l: &crate::signals::sports::SportsSignals, r: &crate::signals::sports::SportsSignals) -> (f32, String) {
    let teams = match (&l.teams, &r.teams) {
        (Some(a), Some(b)) if a == b => 1.0,
        _ => 0.0,
    };
    let league = if l.league == r.league { 1.0 } else { 0.0 };
    let market_type = if l.market_type == r.market_type { 1.0 } else { 0.0 };
    let line = match (l.line, r.line) {
        (Some(a), Some(b)) => number_score(a, b),
        (None, None) => 1.0,
        _ => 0.3,
    };
    let time = time_bucket_score(l.start_bucket, r.start_bucket);
    let text = text_score(&l.common.title_tokens, &r.common.title_tokens);
    let score = if matches!(l.market_type, SportsMarketType::Moneyline) {
        weighted_sum(&[(teams, 0.40), (league, 0.15), (time, 0.30), (market_type, 0.15)])
    } else {
        weighted_sum(&[
            (teams, 0.25),
            (league, 0.25),
            (time, 0.15),
            (market_type, 0.10),
            (line, 0.15),
            (text, 0.10),
        ])
    };
    (score, format!("teams={teams:.2} league={league:.2} time={time:.2} type={market_type:.2} line={line:.2} text={text:.2}"))
}

fn score_generic(
    l: &crate::signals::universal::UniversalSignals,
    r: &crate::signals::universal::UniversalSignals,
) -> (f32, String) {
    let entities = text_score(&l.common.entities, &r.common.entities);
    let text = text_score(&l.common.title_tokens, &r.common.title_tokens);
    let date = date_score(&l.date, &r.date);
    let close_time_only = l.date.target_date.is_none() && r.date.target_date.is_none();
    let date = if close_time_only { close_time_proximity_score(0.0).min(date.max(0.3)) } else { date };
    let score = weighted_sum(&[(entities, 0.35), (text, 0.45), (date, 0.20)]);
    (score, format!("entities={entities:.2} text={text:.2} date={date:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarketStatus, Metadata, Venue};
    use crate::signals::{extract_signals, Signals};

    fn market(title: &str) -> crate::model::Market {
        crate::model::Market {
            id: 1,
            venue: Venue::Kalshi,
            external_id: "X".into(),
            title: title.into(),
            category: None,
            status: MarketStatus::Active,
            close_time: None,
            derived_topic: None,
            metadata: Metadata::new(),
            outcomes: vec![],
        }
    }

    #[test]
    fn crypto_exact_pair_scores_high_and_passes_hard_gate() {
        let left = market("Bitcoin above $100,000 on January 31, 2026");
        let right = market("Will BTC settle over $100,000 on Jan 31, 2026?");
        let ls = extract_signals(&left, CanonicalTopic::CryptoDaily);
        let rs = extract_signals(&right, CanonicalTopic::CryptoDaily);
        let pipeline = PipelineKind::for_topic(CanonicalTopic::CryptoDaily);
        assert!(pipeline.hard_gate(&ls, &rs));
        let (score, _) = pipeline.score(&ls, &rs);
        assert!(score > 0.85, "expected strong match, got {score}");
    }

    #[test]
    fn crypto_opposite_comparators_score_low() {
        let left = market("Bitcoin above $100,000 on January 31, 2026");
        let right = market("Bitcoin below $100,000 on January 31, 2026");
        let ls = extract_signals(&left, CanonicalTopic::CryptoDaily);
        let rs = extract_signals(&right, CanonicalTopic::CryptoDaily);
        let pipeline = PipelineKind::for_topic(CanonicalTopic::CryptoDaily);
        let (score, reason) = pipeline.score(&ls, &rs);
        // The comparator component alone only costs 10% of the weighted
        // sum, so a conflicting comparator does not need to tank the raw
        // score — the auto-reject rule pack catches this case directly
        // (see rules::reject_on_opposite_comparators), independent of
        // where the score lands relative to any topic floor.
        assert!(reason.contains("comparator=0.00"), "expected zero comparator component, got {reason}");
        assert!(score < 1.0, "expected the comparator mismatch to cost something, got {score}");
    }

    #[test]
    fn rates_same_meeting_scores_high() {
        let left = market("Fed to cut rates by 25 bps in January 2025");
        let right = market("Will the Fed cut by a quarter point in January 2025?");
        let ls = extract_signals(&left, CanonicalTopic::Rates);
        let rs = extract_signals(&right, CanonicalTopic::Rates);
        let pipeline = PipelineKind::for_topic(CanonicalTopic::Rates);
        assert!(pipeline.hard_gate(&ls, &rs));
        let (score, _) = pipeline.score(&ls, &rs);
        assert!(score > 0.8, "expected strong match, got {score}");
    }

    #[test]
    fn sports_moneyline_same_event_scores_high() {
        use chrono::{TimeZone, Utc};
        let close = Utc.with_ymd_and_hms(2025, 1, 23, 20, 0, 0).unwrap();
        let mut left = market("Lakers vs Celtics moneyline");
        left.close_time = Some(close);
        let mut right = market("Celtics vs Lakers winner");
        right.close_time = Some(close);
        let ls = extract_signals(&left, CanonicalTopic::Sports);
        let rs = extract_signals(&right, CanonicalTopic::Sports);
        let pipeline = PipelineKind::for_topic(CanonicalTopic::Sports);
        assert!(pipeline.hard_gate(&ls, &rs));
        let (score, _) = pipeline.score(&ls, &rs);
        assert!(score > 0.85, "expected strong match, got {score}");
    }

    #[test]
    fn sports_different_spread_line_fails_hard_gate_when_type_differs() {
        let left = market("Lakers vs Celtics -5.5 spread");
        let right = market("Lakers vs Celtics moneyline");
        let ls = extract_signals(&left, CanonicalTopic::Sports);
        let rs = extract_signals(&right, CanonicalTopic::Sports);
        let pipeline = PipelineKind::for_topic(CanonicalTopic::Sports);
        assert!(pipeline.hard_gate(&ls, &rs));
        let (score, _) = pipeline.score(&ls, &rs);
        assert!(score < 0.85);
    }

    #[test]
    fn unsupported_topic_falls_through_to_generic_pipeline() {
        let pipeline = PipelineKind::for_topic(CanonicalTopic::Unknown);
        assert!(matches!(pipeline, PipelineKind::Generic(CanonicalTopic::Unknown)));
    }
}
