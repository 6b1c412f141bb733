//! Auto-confirm and auto-reject rule packs, one per topic family. These run
//! after scoring and gating; a topic with `autoConfirmEnabled=false` (or
//! `autoRejectEnabled=false`) in `MatchConfig` skips the corresponding rule
//! entirely regardless of what it would otherwise decide.

use crate::config::MatchConfig;
use crate::model::CanonicalTopic;
use crate::scoring::comparators_conflict;
use crate::signals::Signals;

/// What a rule pack decided for one scored candidate pair, before the
/// config-level enable/disable gates are applied.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RuleVerdict {
    Confirm,
    Reject,
    NoOpinion,
}

/// A verdict plus the named rule that produced it, written into the link's
/// `reason` field for auditability (the name a human reviewer or diagnostic
/// command keys off, not just the score breakdown).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub verdict: RuleVerdict,
    pub rule: &'static str,
}

const NO_OPINION: RuleOutcome = RuleOutcome { verdict: RuleVerdict::NoOpinion, rule: "NONE" };

fn confirm(rule: &'static str) -> RuleOutcome {
    RuleOutcome { verdict: RuleVerdict::Confirm, rule }
}

fn reject(rule: &'static str) -> RuleOutcome {
    RuleOutcome { verdict: RuleVerdict::Reject, rule }
}

/// Evaluate the auto-confirm rule for `topic` against a scored pair. Never
/// called unless the caller has already confirmed
/// `config.is_auto_confirm_enabled(topic)`; kept as a pure function of
/// signals regardless so it stays independently testable.
pub fn auto_confirm_verdict(topic: CanonicalTopic, score: f32, left: &Signals, right: &Signals) -> RuleOutcome {
    match topic {
        CanonicalTopic::CryptoDaily | CanonicalTopic::CryptoIntraday => crypto_confirm(score, left, right),
        CanonicalTopic::Macro => threshold_confirm(score, 0.88, "MACRO_SCORE_FLOOR"),
        CanonicalTopic::Rates => threshold_confirm(score, 0.90, "RATES_SCORE_FLOOR"),
        CanonicalTopic::Commodities => threshold_confirm(score, 0.88, "COMMODITIES_SCORE_FLOOR"),
        CanonicalTopic::Finance => threshold_confirm(score, 0.88, "FINANCE_SCORE_FLOOR"),
        CanonicalTopic::Sports => sports_confirm(score, left, right),
        CanonicalTopic::Elections => NO_OPINION,
        CanonicalTopic::Geopolitics
        | CanonicalTopic::Entertainment
        | CanonicalTopic::Climate
        | CanonicalTopic::Universal
        | CanonicalTopic::Unknown => NO_OPINION,
    }
}

fn crypto_confirm(score: f32, left: &Signals, right: &Signals) -> RuleOutcome {
    use crate::signals::dates::DateType;

    let (Signals::Crypto(l), Signals::Crypto(r)) = (left, right) else {
        return NO_OPINION;
    };
    let entity_matches = l.common.entity.is_some() && l.common.entity == r.common.entity;
    let both_day_exact = l.date.date_type == DateType::DayExact && r.date.date_type == DateType::DayExact;
    let settle_date_exact = l.date.target_date.is_some() && l.date.target_date == r.date.target_date;
    let comparator_matches = l.comparator.is_some() && l.comparator == r.comparator;
    let numbers_close = !l.numbers.is_empty()
        && !r.numbers.is_empty()
        && l.numbers
            .iter()
            .any(|x| r.numbers.iter().any(|y| (x - y).abs() <= (0.001 * x.abs().max(y.abs())).max(1.0)));

    if entity_matches && both_day_exact && settle_date_exact && comparator_matches && numbers_close && score >= 0.90 {
        confirm("CRYPTO_EXACT_MATCH")
    } else {
        NO_OPINION
    }
}

fn threshold_confirm(score: f32, floor: f32, rule: &'static str) -> RuleOutcome {
    if score >= floor {
        confirm(rule)
    } else {
        NO_OPINION
    }
}

fn sports_confirm(score: f32, left: &Signals, right: &Signals) -> RuleOutcome {
    let (Signals::Sports(l), Signals::Sports(r)) = (left, right) else {
        return NO_OPINION;
    };
    // Non-moneyline sports markets (spread/total/prop) never auto-confirm:
    // line values drift too easily between venues for an unattended write.
    if !matches!(l.market_type, crate::signals::sports::SportsMarketType::Moneyline)
        || !matches!(r.market_type, crate::signals::sports::SportsMarketType::Moneyline)
    {
        return NO_OPINION;
    }
    if l.teams.is_some()
        && l.teams == r.teams
        && l.league == r.league
        && l.start_bucket.is_some()
        && l.start_bucket == r.start_bucket
        && score >= 0.92
    {
        confirm("MONEYLINE_EXACT_EVENT_MATCH")
    } else {
        NO_OPINION
    }
}

/// Evaluate the auto-reject rule for `topic`. Called only when the caller
/// has already confirmed `config.is_auto_reject_enabled(topic)`.
pub fn auto_reject_verdict(
    config: &MatchConfig,
    topic: CanonicalTopic,
    score: f32,
    left: &Signals,
    right: &Signals,
) -> RuleOutcome {
    if score < config.min_score(topic) {
        return reject("BELOW_SCORE_FLOOR");
    }
    if opposite_comparators(left, right) {
        return reject("CONFLICTING_COMPARATOR");
    }
    if no_entity_overlap(left, right) {
        return reject("NO_ENTITY_OVERLAP");
    }
    if incompatible_election_intent(left, right) {
        return reject("INCOMPATIBLE_INTENT");
    }
    NO_OPINION
}

fn opposite_comparators(left: &Signals, right: &Signals) -> bool {
    let pair = match (left, right) {
        (Signals::Crypto(l), Signals::Crypto(r)) => Some((l.comparator, r.comparator)),
        (Signals::Commodities(l), Signals::Commodities(r)) => Some((l.comparator, r.comparator)),
        (Signals::Finance(l), Signals::Finance(r)) => Some((l.comparator, r.comparator)),
        _ => None,
    };
    pair.map(|(a, b)| comparators_conflict(a, b)).unwrap_or(false)
}

/// Markets whose entity sets share nothing in common are never the same
/// real-world event, regardless of how the rest of the title scored.
fn no_entity_overlap(left: &Signals, right: &Signals) -> bool {
    let l = &left.common().entities;
    let r = &right.common().entities;
    if l.is_empty() || r.is_empty() {
        return false;
    }
    !l.iter().any(|e| r.contains(e))
}

fn incompatible_election_intent(left: &Signals, right: &Signals) -> bool {
    let (Signals::Elections(l), Signals::Elections(r)) = (left, right) else {
        return false;
    };
    l.intent != r.intent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::comparator::Comparator;
    use crate::signals::crypto::{CryptoSignals, CryptoSubtype, SettleDateSource};
    use crate::signals::dates::{DateSignal, DateType};
    use crate::signals::SignalsCommon;

    fn crypto_signal(entity: &str, comparator: Comparator, number: f64) -> Signals {
        use chrono::NaiveDate;
        Signals::Crypto(CryptoSignals {
            common: SignalsCommon {
                entity: Some(entity.to_string()),
                entities: vec![entity.to_string()],
                title_tokens: vec![],
            },
            subtype: CryptoSubtype::DailyThreshold,
            comparator: Some(comparator),
            numbers: vec![number],
            date: DateSignal {
                date_type: DateType::DayExact,
                target_date: NaiveDate::from_ymd_opt(2026, 1, 31),
                period_key: Some("2026-01-31".to_string()),
            },
            settle_date_source: SettleDateSource::Missing,
        })
    }

    #[test]
    fn crypto_confirms_on_exact_match() {
        let l = crypto_signal("BITCOIN", Comparator::Ge, 100_000.0);
        let r = crypto_signal("BITCOIN", Comparator::Ge, 100_000.0);
        let outcome = auto_confirm_verdict(CanonicalTopic::CryptoDaily, 0.95, &l, &r);
        assert_eq!(outcome.verdict, RuleVerdict::Confirm);
        assert_eq!(outcome.rule, "CRYPTO_EXACT_MATCH");
    }

    #[test]
    fn crypto_does_not_confirm_below_score_floor() {
        let l = crypto_signal("BITCOIN", Comparator::Ge, 100_000.0);
        let r = crypto_signal("BITCOIN", Comparator::Ge, 100_000.0);
        assert_eq!(auto_confirm_verdict(CanonicalTopic::CryptoDaily, 0.5, &l, &r).verdict, RuleVerdict::NoOpinion);
    }

    #[test]
    fn elections_never_auto_confirms() {
        use crate::signals::elections::{ElectionIntent, ElectionSignals, Office};
        let sig = Signals::Elections(ElectionSignals {
            common: SignalsCommon { entity: None, entities: vec![], title_tokens: vec![] },
            country: Some("US".into()),
            office: Office::President,
            year: Some(2024),
            state: None,
            candidates: vec![],
            intent: ElectionIntent::Winner,
        });
        assert_eq!(auto_confirm_verdict(CanonicalTopic::Elections, 0.99, &sig, &sig).verdict, RuleVerdict::NoOpinion);
    }

    #[test]
    fn reject_on_opposite_comparators() {
        let l = crypto_signal("BITCOIN", Comparator::Ge, 100_000.0);
        let r = crypto_signal("BITCOIN", Comparator::Le, 100_000.0);
        let cfg = MatchConfig::default();
        let outcome = auto_reject_verdict(&cfg, CanonicalTopic::CryptoDaily, 0.9, &l, &r);
        assert_eq!(outcome.verdict, RuleVerdict::Reject);
        assert_eq!(outcome.rule, "CONFLICTING_COMPARATOR");
    }

    #[test]
    fn reject_below_min_score() {
        let l = crypto_signal("BITCOIN", Comparator::Ge, 100_000.0);
        let r = crypto_signal("BITCOIN", Comparator::Ge, 100_000.0);
        let cfg = MatchConfig::default();
        assert_eq!(
            auto_reject_verdict(&cfg, CanonicalTopic::CryptoDaily, 0.01, &l, &r).rule,
            "BELOW_SCORE_FLOOR"
        );
    }

    #[test]
    fn no_entity_overlap_rejects() {
        let l = crypto_signal("BITCOIN", Comparator::Ge, 100_000.0);
        let r = crypto_signal("ETHEREUM", Comparator::Ge, 100_000.0);
        let cfg = MatchConfig::default();
        assert_eq!(
            auto_reject_verdict(&cfg, CanonicalTopic::CryptoDaily, 0.9, &l, &r).rule,
            "NO_ENTITY_OVERLAP"
        );
    }
}
