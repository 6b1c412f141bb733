//! Crypto-threshold and crypto-range signal extraction.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Market;

use super::comparator::{parse_comparator, Comparator};
use super::dates::{parse_date, DateSignal};
use super::entities::normalize_entity;
use super::numbers::parse_numbers;
use super::tokenizer::tokenize;
use super::SignalsCommon;

const CANONICAL_COINS: &[&str] = &[
    "BITCOIN", "ETHEREUM", "SOLANA", "XRP", "DOGECOIN", "CARDANO", "LITECOIN", "BINANCE_COIN",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CryptoSubtype {
    DailyThreshold,
    DailyRange,
    YearlyThreshold,
    IntradayUpDown,
    Unknown,
}

/// Where the settle date came from, in order of trustworthiness.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettleDateSource {
    ApiClose,
    TitleParse,
    FallbackClose,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoSignals {
    pub common: SignalsCommon,
    pub subtype: CryptoSubtype,
    pub comparator: Option<Comparator>,
    pub numbers: Vec<f64>,
    pub date: DateSignal,
    pub settle_date_source: SettleDateSource,
}

fn detect_subtype(title: &str, comparator: Option<Comparator>) -> CryptoSubtype {
    let lower = title.to_lowercase();
    let is_intraday = lower.contains("today") || lower.contains("this hour")
        || lower.contains("by noon") || lower.contains("by end of day")
        || lower.contains("up or down");
    match (comparator, is_intraday) {
        (_, true) => CryptoSubtype::IntradayUpDown,
        (Some(Comparator::Between), _) => CryptoSubtype::DailyRange,
        (Some(_), _) if lower.contains("in 2025") || lower.contains("in 2026")
            || lower.contains("by end of year") =>
        {
            CryptoSubtype::YearlyThreshold
        }
        (Some(_), _) => CryptoSubtype::DailyThreshold,
        (None, _) => CryptoSubtype::Unknown,
    }
}

/// Pure extraction: `(title, closeTime, apiCloseHint)` → `CryptoSignals`.
/// `apiCloseHint` stands in for a venue's own structured close-date field,
/// preferred over a title-parsed date when present.
pub fn extract(market: &Market, api_close_hint: Option<DateTime<Utc>>) -> CryptoSignals {
    let tokens = tokenize(&market.title);
    let entity = tokens
        .iter()
        .map(|t| normalize_entity(t))
        .find(|e| CANONICAL_COINS.contains(&e.as_str()));

    let comparator = parse_comparator(&market.title);
    let numbers = parse_numbers(&market.title);
    let subtype = detect_subtype(&market.title, comparator);

    let title_date = parse_date(&market.title, None);
    let (date, settle_date_source) = match (api_close_hint, title_date.target_date) {
        (Some(api_close), _) => {
            let date = api_close.date_naive();
            (
                DateSignal {
                    date_type: super::dates::DateType::DayExact,
                    target_date: Some(date),
                    period_key: Some(format!("{:04}-{:02}", date.year(), date.month())),
                },
                SettleDateSource::ApiClose,
            )
        }
        (None, Some(_)) => (title_date, SettleDateSource::TitleParse),
        (None, None) => {
            let fallback = parse_date("", market.close_time);
            if fallback.target_date.is_some() {
                (fallback, SettleDateSource::FallbackClose)
            } else {
                (fallback, SettleDateSource::Missing)
            }
        }
    };

    CryptoSignals {
        common: SignalsCommon {
            entity: entity.clone(),
            entities: entity.into_iter().collect(),
            title_tokens: tokens,
        },
        subtype,
        comparator,
        numbers,
        date,
        settle_date_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarketStatus, Metadata, Venue};
    use chrono::TimeZone;

    fn market(title: &str, close_time: Option<DateTime<Utc>>) -> Market {
        Market {
            id: 1,
            venue: Venue::Kalshi,
            external_id: "X".into(),
            title: title.into(),
            category: None,
            status: MarketStatus::Active,
            close_time,
            derived_topic: None,
            metadata: Metadata::new(),
            outcomes: vec![],
        }
    }

    #[test]
    fn extracts_entity_comparator_and_number() {
        let m = market("Bitcoin above $100,000 on January 31, 2026", None);
        let sig = extract(&m, None);
        assert_eq!(sig.common.entity.as_deref(), Some("BITCOIN"));
        assert_eq!(sig.comparator, Some(Comparator::Ge));
        assert_eq!(sig.numbers, vec![100_000.0]);
        assert_eq!(sig.subtype, CryptoSubtype::DailyThreshold);
        assert_eq!(sig.settle_date_source, SettleDateSource::TitleParse);
    }

    #[test]
    fn prefers_api_close_hint_over_title_parse() {
        let m = market("Bitcoin above $100,000 on January 31, 2026", None);
        let api_close = chrono::Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        let sig = extract(&m, Some(api_close));
        assert_eq!(sig.settle_date_source, SettleDateSource::ApiClose);
        assert_eq!(sig.date.target_date, Some(api_close.date_naive()));
    }

    #[test]
    fn intraday_phrasing_detected() {
        let m = market("Will BTC be up or down today?", None);
        let sig = extract(&m, None);
        assert_eq!(sig.subtype, CryptoSubtype::IntradayUpDown);
    }
}
