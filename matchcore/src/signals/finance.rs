//! Equity / index / ETF finance-market signal extraction.

use serde::{Deserialize, Serialize};

use crate::model::Market;

use super::comparator::{parse_comparator, Comparator};
use super::dates::{parse_date, DateSignal};
use super::entities::normalize_entity;
use super::numbers::parse_numbers;
use super::tokenizer::tokenize;
use super::SignalsCommon;

const KNOWN_INSTRUMENTS: &[&str] = &["SPX", "NASDAQ", "DOW", "VIX"];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceSignals {
    pub common: SignalsCommon,
    pub instrument: Option<String>,
    pub comparator: Option<Comparator>,
    pub target: Vec<f64>,
    pub direction: Direction,
    pub date: DateSignal,
}

fn detect_instrument(title: &str) -> Option<String> {
    let upper = title.to_uppercase();
    for known in KNOWN_INSTRUMENTS {
        if upper.contains(known) {
            return Some(known.to_string());
        }
    }
    let tokens = tokenize(title);
    tokens
        .iter()
        .map(|t| normalize_entity(t))
        .find(|e| KNOWN_INSTRUMENTS.contains(&e.as_str()))
}

fn detect_direction(title: &str) -> Direction {
    let lower = title.to_lowercase();
    if lower.contains("close up") || lower.contains("finish higher") || lower.contains("rally") {
        Direction::Up
    } else if lower.contains("close down") || lower.contains("finish lower") || lower.contains("crash") {
        Direction::Down
    } else {
        Direction::Unknown
    }
}

pub fn extract(market: &Market) -> FinanceSignals {
    let tokens = tokenize(&market.title);
    let instrument = detect_instrument(&market.title);
    let comparator = parse_comparator(&market.title);
    let target = parse_numbers(&market.title);
    let direction = detect_direction(&market.title);
    let date = parse_date(&market.title, market.close_time);

    FinanceSignals {
        common: SignalsCommon {
            entity: instrument.clone(),
            entities: instrument.clone().into_iter().collect(),
            title_tokens: tokens,
        },
        instrument,
        comparator,
        target,
        direction,
        date,
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
    fn extracts_instrument_and_target() {
        let m = market("Will the SPX close above 5000 on January 31, 2026?");
        let sig = extract(&m);
        assert_eq!(sig.instrument.as_deref(), Some("SPX"));
        assert_eq!(sig.comparator, Some(Comparator::Ge));
        assert_eq!(sig.target, vec![5000.0]);
    }
}
