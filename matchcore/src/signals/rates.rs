//! Central-bank rate decision signal extraction.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Market;

use super::dates::{parse_date, DateSignal};
use super::tokenizer::tokenize;
use super::SignalsCommon;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CentralBank {
    Fed,
    Ecb,
    Boe,
    Boj,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateAction {
    Cut,
    Hike,
    Hold,
    Pause,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatesSignals {
    pub common: SignalsCommon,
    pub bank: CentralBank,
    pub action: RateAction,
    pub basis_points: Option<f64>,
    pub date: DateSignal,
}

fn detect_bank(title: &str) -> CentralBank {
    let lower = title.to_lowercase();
    if lower.contains("fed") || lower.contains("fomc") {
        CentralBank::Fed
    } else if lower.contains("ecb") {
        CentralBank::Ecb
    } else if lower.contains("boe") || lower.contains("bank of england") {
        CentralBank::Boe
    } else if lower.contains("boj") || lower.contains("bank of japan") {
        CentralBank::Boj
    } else {
        CentralBank::Unknown
    }
}

fn detect_action(title: &str) -> RateAction {
    let lower = title.to_lowercase();
    if lower.contains("cut") {
        RateAction::Cut
    } else if lower.contains("hike") || lower.contains("raise") {
        RateAction::Hike
    } else if lower.contains("pause") {
        RateAction::Pause
    } else if lower.contains("hold") || lower.contains("no change") {
        RateAction::Hold
    } else {
        RateAction::Unknown
    }
}

fn bps_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*bps").unwrap())
}
fn pct_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+\.\d+)\s*%").unwrap())
}
fn fraction_point_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(quarter|half)\s*point").unwrap())
}

/// Parse basis points from `N bps`, `0.NN%`, or `(quarter|half) point`.
fn parse_bps(title: &str) -> Option<f64> {
    if let Some(cap) = bps_re().captures(title) {
        return cap[1].parse::<f64>().ok();
    }
    if let Some(cap) = pct_re().captures(title) {
        return cap[1].parse::<f64>().ok().map(|pct| pct * 100.0);
    }
    if let Some(cap) = fraction_point_re().captures(title) {
        return Some(if cap[1].eq_ignore_ascii_case("quarter") { 25.0 } else { 50.0 });
    }
    None
}

pub fn extract(market: &Market) -> RatesSignals {
    let tokens = tokenize(&market.title);
    let bank = detect_bank(&market.title);
    let action = detect_action(&market.title);
    let basis_points = parse_bps(&market.title);
    let date = parse_date(&market.title, market.close_time);

    let entity = match bank {
        CentralBank::Unknown => None,
        _ => Some(format!("{bank:?}").to_uppercase()),
    };

    RatesSignals {
        common: SignalsCommon {
            entity: entity.clone(),
            entities: entity.into_iter().collect(),
            title_tokens: tokens,
        },
        bank,
        action,
        basis_points,
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
    fn extracts_fed_cut_25bps_january_meeting() {
        let m = market("Fed to cut rates by 25 bps in January 2025");
        let sig = extract(&m);
        assert_eq!(sig.bank, CentralBank::Fed);
        assert_eq!(sig.action, RateAction::Cut);
        assert_eq!(sig.basis_points, Some(25.0));
        assert_eq!(sig.date.period_key.as_deref(), Some("2025-01"));
    }

    #[test]
    fn extracts_quarter_point_as_25_bps() {
        let m = market("ECB to hike by a quarter point");
        let sig = extract(&m);
        assert_eq!(sig.bank, CentralBank::Ecb);
        assert_eq!(sig.basis_points, Some(25.0));
    }
}
