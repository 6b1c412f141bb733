//! Macro-indicator (CPI, GDP, unemployment, ...) signal extraction.
//! Named `macro_topic` because `macro` is a reserved keyword.

use serde::{Deserialize, Serialize};

use crate::model::Market;

use super::dates::{parse_date, DateSignal};
use super::entities::normalize_entity;
use super::tokenizer::tokenize;
use super::SignalsCommon;

const KNOWN_INDICATORS: &[&str] = &["CPI", "GDP", "UNEMPLOYMENT"];
const KNOWN_COUNTRIES: &[&str] = &["US", "UK", "FR"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroSignals {
    pub common: SignalsCommon,
    /// May be multi-valued, e.g. `{CPI, US}`.
    pub entities: Vec<String>,
    pub date: DateSignal,
}

pub fn extract(market: &Market) -> MacroSignals {
    let tokens = tokenize(&market.title);
    let normalized: Vec<String> = tokens.iter().map(|t| normalize_entity(t)).collect();

    let mut entities: Vec<String> = normalized
        .iter()
        .filter(|e| KNOWN_INDICATORS.contains(&e.as_str()) || KNOWN_COUNTRIES.contains(&e.as_str()))
        .cloned()
        .collect();
    entities.sort();
    entities.dedup();

    let date = parse_date(&market.title, market.close_time);

    MacroSignals {
        common: SignalsCommon {
            entity: entities.first().cloned(),
            entities: entities.clone(),
            title_tokens: tokens,
        },
        entities,
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
    fn extracts_cpi_and_country() {
        let m = market("US CPI year-over-year for January 2025");
        let sig = extract(&m);
        assert!(sig.entities.contains(&"CPI".to_string()));
        assert!(sig.entities.contains(&"US".to_string()));
        assert_eq!(sig.date.period_key.as_deref(), Some("2025-01"));
    }
}
