//! Pure, total, deterministic per-topic signal extraction. Nothing in this
//! module performs I/O: every function is `(title, closeTime, metadata) ->
//! Signals`.

pub mod comparator;
pub mod commodities;
pub mod crypto;
pub mod dates;
pub mod elections;
pub mod entities;
pub mod finance;
pub mod macro_topic;
pub mod numbers;
pub mod rates;
pub mod sports;
pub mod tokenizer;
pub mod universal;

use serde::{Deserialize, Serialize};

use crate::model::{CanonicalTopic, Market};

/// Fields every topic's signals record carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalsCommon {
    pub entity: Option<String>,
    pub entities: Vec<String>,
    pub title_tokens: Vec<String>,
}

/// The discriminated signals record. One variant per pipeline family;
/// `CryptoDaily`/`CryptoIntraday` share `CryptoSignals` (the subtype field
/// inside it distinguishes daily-threshold from intraday up/down), and
/// `Geopolitics`/`Entertainment`/`Climate`/`Universal` share
/// `UniversalSignals` since none of them has a dedicated structured
/// vocabulary worth a bespoke extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Signals {
    Crypto(crypto::CryptoSignals),
    Rates(rates::RatesSignals),
    Elections(elections::ElectionSignals),
    Sports(sports::SportsSignals),
    Commodities(commodities::CommoditySignals),
    Macro(macro_topic::MacroSignals),
    Finance(finance::FinanceSignals),
    Universal(universal::UniversalSignals),
}

impl Signals {
    pub fn common(&self) -> &SignalsCommon {
        match self {
            Signals::Crypto(s) => &s.common,
            Signals::Rates(s) => &s.common,
            Signals::Elections(s) => &s.common,
            Signals::Sports(s) => &s.common,
            Signals::Commodities(s) => &s.common,
            Signals::Macro(s) => &s.common,
            Signals::Finance(s) => &s.common,
            Signals::Universal(s) => &s.common,
        }
    }

    /// Kalshi "mutually exclusive event" sports markets are excluded from
    /// pairwise matching entirely; every other topic is never MVE.
    pub fn is_mve(&self) -> bool {
        matches!(self, Signals::Sports(s) if s.is_mve)
    }
}

/// Dispatch a market to its topic's extractor. `api_close_hint` is the
/// venue's own structured close-date field when the caller has one handy
/// (only crypto currently prefers it over a title-parsed date).
pub fn extract_signals(market: &Market, topic: CanonicalTopic) -> Signals {
    match topic {
        CanonicalTopic::CryptoDaily | CanonicalTopic::CryptoIntraday => {
            Signals::Crypto(crypto::extract(market, market.close_time))
        }
        CanonicalTopic::Rates => Signals::Rates(rates::extract(market)),
        CanonicalTopic::Elections => Signals::Elections(elections::extract(market)),
        CanonicalTopic::Sports => Signals::Sports(sports::extract(market)),
        CanonicalTopic::Commodities => Signals::Commodities(commodities::extract(market)),
        CanonicalTopic::Macro => Signals::Macro(macro_topic::extract(market)),
        CanonicalTopic::Finance => Signals::Finance(finance::extract(market)),
        CanonicalTopic::Geopolitics
        | CanonicalTopic::Entertainment
        | CanonicalTopic::Climate
        | CanonicalTopic::Universal
        | CanonicalTopic::Unknown => Signals::Universal(universal::extract(market)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarketStatus, Metadata, Venue};

    fn market(title: &str) -> Market {
        Market {
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
    fn extraction_is_pure_and_deterministic() {
        let m = market("Bitcoin above $100,000 on January 31, 2026");
        let a = extract_signals(&m, CanonicalTopic::CryptoDaily);
        let b = extract_signals(&m, CanonicalTopic::CryptoDaily);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn unknown_topic_uses_universal_extractor() {
        let m = market("Some unclassifiable question");
        match extract_signals(&m, CanonicalTopic::Unknown) {
            Signals::Universal(_) => {}
            other => panic!("expected Universal signals, got {other:?}"),
        }
    }
}
