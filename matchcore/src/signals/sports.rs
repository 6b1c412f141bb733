//! Sports-market signal extraction: league, normalized team pair, start
//! bucket, market type, and line value.

use std::sync::OnceLock;

use chrono::{DateTime, Timelike, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Market;

use super::entities::normalize_entity;
use super::tokenizer::tokenize;
use super::SignalsCommon;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum League {
    Nba,
    Nfl,
    Mlb,
    Nhl,
    Mls,
    Epl,
    Ufc,
    Cs2,
    Unknown,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SportsMarketType {
    Moneyline,
    Spread,
    Total,
    Prop,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePeriod {
    FullGame,
    H1,
    H2,
    Ot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportsSignals {
    pub common: SignalsCommon,
    pub league: League,
    /// Sorted lexicographically so the pair compares equal regardless of
    /// home/away ordering in either venue's title.
    pub teams: Option<(String, String)>,
    pub start_bucket: Option<DateTime<Utc>>,
    pub market_type: SportsMarketType,
    pub line: Option<f64>,
    pub period: GamePeriod,
    /// Kalshi "mutually exclusive event" markets are excluded from
    /// pairwise matching entirely.
    pub is_mve: bool,
}

fn detect_league(title: &str, category: Option<&str>) -> League {
    let lower = title.to_lowercase();
    let cat = category.unwrap_or("").to_lowercase();
    let haystack = format!("{lower} {cat}");
    if haystack.contains("nba") {
        League::Nba
    } else if haystack.contains("nfl") {
        League::Nfl
    } else if haystack.contains("mlb") {
        League::Mlb
    } else if haystack.contains("nhl") {
        League::Nhl
    } else if haystack.contains("mls") {
        League::Mls
    } else if haystack.contains("epl") || haystack.contains("premier league") {
        League::Epl
    } else if haystack.contains("ufc") {
        League::Ufc
    } else if haystack.contains("cs2") || haystack.contains("counter-strike") {
        League::Cs2
    } else {
        League::Unknown
    }
}

fn vs_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)([a-z0-9 .'-]+?)\s+(?:vs\.?|at|@)\s+([a-z0-9 .'-]+?)(?:\s*[—-]|$)").unwrap())
}

fn extract_teams(title: &str) -> Option<(String, String)> {
    let cap = vs_re().captures(title)?;
    let a = normalize_team(cap.get(1)?.as_str());
    let b = normalize_team(cap.get(2)?.as_str());
    let mut pair = [a, b];
    pair.sort();
    Some((pair[0].clone(), pair[1].clone()))
}

const MARKET_DESCRIPTOR_WORDS: &[&str] = &[
    "moneyline", "spread", "total", "winner", "odds", "matchup", "prop", "line",
    "over", "under",
];

fn normalize_team(raw: &str) -> String {
    let mut words: Vec<String> = tokenize(raw);
    while let Some(last) = words.last() {
        if MARKET_DESCRIPTOR_WORDS.contains(&last.as_str()) {
            words.pop();
        } else {
            break;
        }
    }
    if words.is_empty() {
        return raw.trim().to_lowercase();
    }
    let joined = words.join(" ");
    let normalized = normalize_entity(&joined.replace(' ', "-"));
    normalized.to_lowercase().replace('_', " ")
}

fn market_type_re_spread() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)spread|[+-]\d+(\.\d+)?\b").unwrap())
}

fn detect_market_type(title: &str) -> SportsMarketType {
    let lower = title.to_lowercase();
    if lower.contains("total") || lower.contains("over/under") || lower.contains("o/u") {
        SportsMarketType::Total
    } else if lower.contains("spread") || market_type_re_spread().is_match(&lower) {
        SportsMarketType::Spread
    } else if lower.contains("moneyline") || lower.contains("winner") || lower.contains("to win") {
        SportsMarketType::Moneyline
    } else {
        SportsMarketType::Prop
    }
}

fn line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([+-]\d+(?:\.\d+)?)").unwrap())
}

fn detect_period(title: &str) -> GamePeriod {
    let lower = title.to_lowercase();
    if lower.contains("1st half") || lower.contains("first half") {
        GamePeriod::H1
    } else if lower.contains("2nd half") || lower.contains("second half") {
        GamePeriod::H2
    } else if lower.contains(" ot") || lower.contains("overtime") {
        GamePeriod::Ot
    } else {
        GamePeriod::FullGame
    }
}

fn floor_to_30(dt: DateTime<Utc>) -> DateTime<Utc> {
    let minute = if dt.minute() < 30 { 0 } else { 30 };
    dt.with_minute(minute).unwrap().with_second(0).unwrap().with_nanosecond(0).unwrap()
}

fn is_mve_market(market: &Market) -> bool {
    market.external_id.to_uppercase().starts_with("KXMV")
        || market.metadata_str("series_ticker").map(|s| s.to_uppercase().starts_with("KXMV")).unwrap_or(false)
        || market.metadata.get("is_mve").and_then(|v| v.as_bool()).unwrap_or(false)
}

pub fn extract(market: &Market) -> SportsSignals {
    let tokens = tokenize(&market.title);
    let league = detect_league(&market.title, market.category.as_deref());
    let teams = extract_teams(&market.title);
    let market_type = detect_market_type(&market.title);
    let period = detect_period(&market.title);
    let start_bucket = market.close_time.map(floor_to_30);
    let line = if matches!(market_type, SportsMarketType::Spread | SportsMarketType::Total) {
        line_re().find(&market.title).and_then(|m| m.as_str().parse::<f64>().ok())
    } else {
        None
    };

    let entities = teams
        .clone()
        .map(|(a, b)| vec![a, b])
        .unwrap_or_default();

    SportsSignals {
        common: SignalsCommon { entity: None, entities, title_tokens: tokens },
        league,
        teams,
        start_bucket,
        market_type,
        line,
        period,
        is_mve: is_mve_market(market),
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
            category: Some("nba".into()),
            status: MarketStatus::Active,
            close_time,
            derived_topic: None,
            metadata: Metadata::new(),
            outcomes: vec![],
        }
    }

    #[test]
    fn extracts_and_sorts_teams() {
        let close = Utc.with_ymd_and_hms(2025, 1, 23, 20, 0, 0).unwrap();
        let m = market("Lakers vs Celtics moneyline", Some(close));
        let sig = extract(&m);
        assert_eq!(sig.league, League::Nba);
        assert_eq!(
            sig.teams,
            Some(("boston celtics".to_string(), "los angeles lakers".to_string()))
        );
        assert_eq!(sig.market_type, SportsMarketType::Moneyline);
        assert_eq!(sig.start_bucket, Some(close));
    }

    #[test]
    fn floors_start_bucket_to_30_minutes() {
        let close = Utc.with_ymd_and_hms(2025, 1, 23, 20, 41, 0).unwrap();
        let m = market("Lakers vs Celtics", Some(close));
        let sig = extract(&m);
        let expected = Utc.with_ymd_and_hms(2025, 1, 23, 20, 30, 0).unwrap();
        assert_eq!(sig.start_bucket, Some(expected));
    }

    #[test]
    fn detects_mve_by_ticker_prefix() {
        let mut m = market("Which team wins the conference?", None);
        m.external_id = "KXMVNBA-25".into();
        let sig = extract(&m);
        assert!(sig.is_mve);
    }
}
