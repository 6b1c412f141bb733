//! Generic text+entity+date signal extraction for topics with no
//! dedicated structured fields (geopolitics, entertainment, climate) and
//! for the `UNIVERSAL` fallback pipeline.

use serde::{Deserialize, Serialize};

use crate::model::Market;

use super::dates::{parse_date, DateSignal};
use super::entities::normalize_entity;
use super::tokenizer::tokenize;
use super::SignalsCommon;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniversalSignals {
    pub common: SignalsCommon,
    pub date: DateSignal,
}

/// Proper-noun-shaped tokens (capitalized in the original title) are taken
/// as entity candidates; this is deliberately coarse since universal-topic
/// markets have no shared structured vocabulary across venues.
fn entity_candidates(title: &str) -> Vec<String> {
    title
        .split_whitespace()
        .filter(|w| w.chars().next().map(|c| c.is_uppercase()).unwrap_or(false))
        .map(|w| normalize_entity(w.trim_matches(|c: char| !c.is_alphanumeric())))
        .filter(|e| !e.is_empty())
        .collect()
}

pub fn extract(market: &Market) -> UniversalSignals {
    let tokens = tokenize(&market.title);
    let entities = entity_candidates(&market.title);
    let date = parse_date(&market.title, market.close_time);

    UniversalSignals {
        common: SignalsCommon {
            entity: entities.first().cloned(),
            entities,
            title_tokens: tokens,
        },
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
    fn extracts_proper_noun_entities() {
        let m = market("Will NATO admit a new member by 2026?");
        let sig = extract(&m);
        assert!(sig.common.entities.iter().any(|e| e == "NATO"));
    }
}
