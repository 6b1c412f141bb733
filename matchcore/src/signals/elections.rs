//! Election-market signal extraction.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Market;

use super::entities::normalize_entity;
use super::tokenizer::tokenize;
use super::SignalsCommon;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Office {
    President,
    Senate,
    House,
    Governor,
    PartyControl,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionIntent {
    Winner,
    Margin,
    Turnout,
    PartyControl,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionSignals {
    pub common: SignalsCommon,
    pub country: Option<String>,
    pub office: Office,
    pub year: Option<i32>,
    pub state: Option<String>,
    pub candidates: Vec<String>,
    pub intent: ElectionIntent,
}

const KNOWN_CANDIDATES: &[&str] =
    &["DONALD_TRUMP", "JOE_BIDEN", "KAMALA_HARRIS", "KEIR_STARMER"];

fn year_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap())
}

fn detect_country(title: &str) -> Option<String> {
    let lower = title.to_lowercase();
    if lower.contains("president") || lower.contains("senate") || lower.contains("house")
        || lower.contains("u.s.") || lower.contains(" us ") || lower.contains("united states")
    {
        return Some("US".to_string());
    }
    if lower.contains("uk") || lower.contains("britain") || lower.contains("prime minister") {
        return Some("UK".to_string());
    }
    if lower.contains("france") || lower.contains("french") {
        return Some("FR".to_string());
    }
    None
}

fn detect_office(title: &str) -> Office {
    let lower = title.to_lowercase();
    if lower.contains("control of") || lower.contains("majority") {
        Office::PartyControl
    } else if lower.contains("president") {
        Office::President
    } else if lower.contains("senate") {
        Office::Senate
    } else if lower.contains("house") {
        Office::House
    } else if lower.contains("governor") {
        Office::Governor
    } else {
        Office::Unknown
    }
}

fn detect_intent(title: &str, office: Office) -> ElectionIntent {
    let lower = title.to_lowercase();
    if office == Office::PartyControl {
        ElectionIntent::PartyControl
    } else if lower.contains("margin") || lower.contains("by how much") {
        ElectionIntent::Margin
    } else if lower.contains("turnout") {
        ElectionIntent::Turnout
    } else {
        ElectionIntent::Winner
    }
}

pub fn extract(market: &Market) -> ElectionSignals {
    let tokens = tokenize(&market.title);
    let country = detect_country(&market.title);
    let office = detect_office(&market.title);
    let intent = detect_intent(&market.title, office);
    let year = year_re()
        .find(&market.title)
        .and_then(|m| m.as_str().parse::<i32>().ok());

    let candidates: Vec<String> = tokens
        .iter()
        .map(|t| normalize_entity(t))
        .filter(|e| KNOWN_CANDIDATES.contains(&e.as_str()))
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    ElectionSignals {
        common: SignalsCommon {
            entity: country.clone(),
            entities: candidates.clone(),
            title_tokens: tokens,
        },
        country,
        office,
        year,
        state: None,
        candidates,
        intent,
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
    fn extracts_us_president_winner() {
        let m = market("Will Donald Trump win the US presidential election in 2024?");
        let sig = extract(&m);
        assert_eq!(sig.country.as_deref(), Some("US"));
        assert_eq!(sig.office, Office::President);
        assert_eq!(sig.year, Some(2024));
        assert_eq!(sig.intent, ElectionIntent::Winner);
        assert!(sig.candidates.contains(&"DONALD_TRUMP".to_string()));
    }

    #[test]
    fn detects_party_control_intent() {
        let m = market("Which party will have control of the Senate in 2024?");
        let sig = extract(&m);
        assert_eq!(sig.office, Office::PartyControl);
        assert_eq!(sig.intent, ElectionIntent::PartyControl);
    }
}
