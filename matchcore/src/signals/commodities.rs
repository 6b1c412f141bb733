//! Commodity-futures-style signal extraction.

use serde::{Deserialize, Serialize};

use crate::model::Market;

use super::comparator::{parse_comparator, Comparator};
use super::dates::{parse_date, DateSignal};
use super::numbers::parse_numbers;
use super::tokenizer::tokenize;
use super::SignalsCommon;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Underlying {
    OilWti,
    OilBrent,
    Natgas,
    Gold,
    Silver,
    Copper,
    Corn,
    Wheat,
    Unknown,
}
impl Underlying {
    /// The futures-style contract code conventionally used for this
    /// underlying (e.g. `CL` for WTI crude, `GC` for gold).
    pub fn contract_code(&self) -> &'static str {
        match self {
            Underlying::OilWti => "CL",
            Underlying::OilBrent => "BZ",
            Underlying::Natgas => "NG",
            Underlying::Gold => "GC",
            Underlying::Silver => "SI",
            Underlying::Copper => "HG",
            Underlying::Corn => "ZC",
            Underlying::Wheat => "ZW",
            Underlying::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommoditySignals {
    pub common: SignalsCommon,
    pub underlying: Underlying,
    pub comparator: Option<Comparator>,
    pub numbers: Vec<f64>,
    pub date: DateSignal,
}

fn detect_underlying(title: &str) -> Underlying {
    let lower = title.to_lowercase();
    if lower.contains("wti") || lower.contains("crude oil") {
        Underlying::OilWti
    } else if lower.contains("brent") {
        Underlying::OilBrent
    } else if lower.contains("natural gas") || lower.contains("natgas") {
        Underlying::Natgas
    } else if lower.contains("gold") {
        Underlying::Gold
    } else if lower.contains("silver") {
        Underlying::Silver
    } else if lower.contains("copper") {
        Underlying::Copper
    } else if lower.contains("corn") {
        Underlying::Corn
    } else if lower.contains("wheat") {
        Underlying::Wheat
    } else {
        Underlying::Unknown
    }
}

pub fn extract(market: &Market) -> CommoditySignals {
    let tokens = tokenize(&market.title);
    let underlying = detect_underlying(&market.title);
    let comparator = parse_comparator(&market.title);
    let numbers = parse_numbers(&market.title);
    let date = parse_date(&market.title, market.close_time);

    let entity = match underlying {
        Underlying::Unknown => None,
        other => Some(format!("{other:?}").to_uppercase()),
    };

    CommoditySignals {
        common: SignalsCommon {
            entity: entity.clone(),
            entities: entity.into_iter().collect(),
            title_tokens: tokens,
        },
        underlying,
        comparator,
        numbers,
        date,
    }
}
