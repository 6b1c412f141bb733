//! Topic classifier: assigns each market a `CanonicalTopic`, a confidence,
//! and a source tag, using a fixed precedence chain (ticker, then
//! category, then tags, then title keywords). Pure, total, deterministic,
//! and O(n) in title length for the keyword step.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Classification, ClassificationSource, CanonicalTopic, Market, Venue};

/// Venue-specific ticker-prefix rule. Confidence 0.95.
fn classify_by_ticker(market: &Market) -> Option<CanonicalTopic> {
    if market.venue != Venue::Kalshi {
        return None;
    }
    let prefix_map: &[(&str, CanonicalTopic)] = &[
        ("KXETH", CanonicalTopic::CryptoDaily),
        ("KXBTC", CanonicalTopic::CryptoDaily),
        ("KXCPI", CanonicalTopic::Macro),
        ("KXGDP", CanonicalTopic::Macro),
        ("KXFED", CanonicalTopic::Rates),
        ("KXFOMC", CanonicalTopic::Rates),
        ("KXPRES", CanonicalTopic::Elections),
        ("KXSEN", CanonicalTopic::Elections),
        ("KXMV", CanonicalTopic::Sports),
        ("KXNBA", CanonicalTopic::Sports),
        ("KXNFL", CanonicalTopic::Sports),
        ("KXOIL", CanonicalTopic::Commodities),
        ("KXGOLD", CanonicalTopic::Commodities),
    ];
    let ticker = market.external_id.to_uppercase();
    prefix_map
        .iter()
        .find(|(prefix, _)| ticker.starts_with(prefix))
        .map(|(_, topic)| *topic)
}

/// Venue-specific category map, exact lowercase key lookup. Confidence 0.85.
fn classify_by_category(market: &Market) -> Option<CanonicalTopic> {
    let category = market.category.as_ref()?.to_lowercase();
    let map: &[(&str, CanonicalTopic)] = &[
        ("crypto", CanonicalTopic::CryptoDaily),
        ("cryptocurrency", CanonicalTopic::CryptoDaily),
        ("economics", CanonicalTopic::Macro),
        ("economy", CanonicalTopic::Macro),
        ("interest rates", CanonicalTopic::Rates),
        ("politics", CanonicalTopic::Elections),
        ("elections", CanonicalTopic::Elections),
        ("sports", CanonicalTopic::Sports),
        ("commodities", CanonicalTopic::Commodities),
        ("geopolitics", CanonicalTopic::Geopolitics),
        ("entertainment", CanonicalTopic::Entertainment),
        ("finance", CanonicalTopic::Finance),
        ("climate", CanonicalTopic::Climate),
        ("weather", CanonicalTopic::Climate),
    ];
    map.iter().find(|(key, _)| *key == category).map(|(_, topic)| *topic)
}

/// Static tag→topic table. Confidence 0.70.
fn classify_by_tags(market: &Market) -> Option<CanonicalTopic> {
    let tags = market.metadata.get("tags")?.as_array()?;
    let map: &[(&str, CanonicalTopic)] = &[
        ("crypto", CanonicalTopic::CryptoDaily),
        ("fed", CanonicalTopic::Rates),
        ("central-bank", CanonicalTopic::Rates),
        ("election", CanonicalTopic::Elections),
        ("nba", CanonicalTopic::Sports),
        ("nfl", CanonicalTopic::Sports),
        ("oil", CanonicalTopic::Commodities),
        ("gold", CanonicalTopic::Commodities),
        ("geopolitics", CanonicalTopic::Geopolitics),
        ("movies", CanonicalTopic::Entertainment),
        ("awards", CanonicalTopic::Entertainment),
        ("stocks", CanonicalTopic::Finance),
        ("climate", CanonicalTopic::Climate),
    ];
    for tag_value in tags {
        let tag = tag_value.as_str()?.to_lowercase();
        if let Some((_, topic)) = map.iter().find(|(key, _)| *key == tag) {
            return Some(*topic);
        }
    }
    None
}

struct TitleRule {
    pattern: &'static str,
    topic: CanonicalTopic,
    confidence: f32,
}

/// Title keyword rules, ordered list of (compiled regex, topic, confidence).
/// First match wins.
fn compiled_title_rules() -> &'static Vec<(Regex, TitleRule)> {
    static RULES: OnceLock<Vec<(Regex, TitleRule)>> = OnceLock::new();
    RULES.get_or_init(|| {
        let specs: Vec<TitleRule> = vec![
            TitleRule { pattern: r"(?i)\b(bitcoin|btc|ethereum|eth|solana|doge|xrp)\b", topic: CanonicalTopic::CryptoDaily, confidence: 0.90 },
            TitleRule { pattern: r"(?i)\b(fed|fomc|ecb|boe|boj|rate (cut|hike)|bps)\b", topic: CanonicalTopic::Rates, confidence: 0.88 },
            TitleRule { pattern: r"(?i)\b(cpi|inflation|gdp|unemployment|jobs report|nonfarm)\b", topic: CanonicalTopic::Macro, confidence: 0.85 },
            TitleRule { pattern: r"(?i)\b(president|senate|governor|election|primary)\b", topic: CanonicalTopic::Elections, confidence: 0.85 },
            TitleRule { pattern: r"(?i)\b(nba|nfl|mlb|nhl|mls|epl|ufc|moneyline|vs\.?)\b", topic: CanonicalTopic::Sports, confidence: 0.80 },
            TitleRule { pattern: r"(?i)\b(wti|brent|crude|natgas|natural gas|gold|silver|copper|corn|wheat)\b", topic: CanonicalTopic::Commodities, confidence: 0.80 },
            TitleRule { pattern: r"(?i)\b(war|treaty|sanctions|invasion|ceasefire)\b", topic: CanonicalTopic::Geopolitics, confidence: 0.78 },
            TitleRule { pattern: r"(?i)\b(oscar|grammy|box office|album|movie|film)\b", topic: CanonicalTopic::Entertainment, confidence: 0.75 },
            TitleRule { pattern: r"(?i)\b(s&p|nasdaq|dow jones|vix|stock|shares)\b", topic: CanonicalTopic::Finance, confidence: 0.80 },
            TitleRule { pattern: r"(?i)\b(hurricane|temperature|rainfall|drought|wildfire)\b", topic: CanonicalTopic::Climate, confidence: 0.78 },
        ];
        specs
            .into_iter()
            .map(|rule| (Regex::new(rule.pattern).unwrap(), rule))
            .collect()
    })
}

fn classify_by_title(title: &str) -> Option<(CanonicalTopic, f32)> {
    compiled_title_rules()
        .iter()
        .find(|(re, _)| re.is_match(title))
        .map(|(_, rule)| (rule.topic, rule.confidence))
}

/// Run the full precedence chain against one market.
pub fn classify(market: &Market) -> Classification {
    if let Some(topic) = classify_by_ticker(market) {
        return Classification { topic, confidence: 0.95, source: ClassificationSource::Ticker };
    }
    if let Some(topic) = classify_by_category(market) {
        return Classification { topic, confidence: 0.85, source: ClassificationSource::Category };
    }
    if let Some(topic) = classify_by_tags(market) {
        return Classification { topic, confidence: 0.70, source: ClassificationSource::Tags };
    }
    if let Some((topic, confidence)) = classify_by_title(&market.title) {
        return Classification { topic, confidence, source: ClassificationSource::Title };
    }
    Classification { topic: CanonicalTopic::Unknown, confidence: 0.0, source: ClassificationSource::Fallback }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MarketStatus, Metadata, Venue};
    use serde_json::json;

    fn market(title: &str, external_id: &str, category: Option<&str>) -> Market {
        Market {
            id: 1,
            venue: Venue::Kalshi,
            external_id: external_id.into(),
            title: title.into(),
            category: category.map(String::from),
            status: MarketStatus::Active,
            close_time: None,
            derived_topic: None,
            metadata: Metadata::new(),
            outcomes: vec![],
        }
    }

    #[test]
    fn ticker_prefix_wins_over_everything() {
        let mut m = market("Random title", "KXETH-26JAN31", Some("politics"));
        m.metadata.insert("tags".into(), json!(["election"]));
        let c = classify(&m);
        assert_eq!(c.topic, CanonicalTopic::CryptoDaily);
        assert_eq!(c.source, ClassificationSource::Ticker);
        assert_eq!(c.confidence, 0.95);
    }

    #[test]
    fn category_wins_over_tags_and_title() {
        let mut m = market("completely generic text", "X-1", Some("Sports"));
        m.metadata.insert("tags".into(), json!(["oil"]));
        let c = classify(&m);
        assert_eq!(c.topic, CanonicalTopic::Sports);
        assert_eq!(c.source, ClassificationSource::Category);
    }

    #[test]
    fn tags_win_over_title() {
        let mut m = market("Bitcoin thing", "X-1", None);
        m.metadata.insert("tags".into(), json!(["fed"]));
        let c = classify(&m);
        assert_eq!(c.topic, CanonicalTopic::Rates);
        assert_eq!(c.source, ClassificationSource::Tags);
    }

    #[test]
    fn title_keyword_fallback() {
        let m = market("Will the Fed cut rates in March?", "X-1", None);
        let c = classify(&m);
        assert_eq!(c.topic, CanonicalTopic::Rates);
        assert_eq!(c.source, ClassificationSource::Title);
    }

    #[test]
    fn unknown_when_nothing_matches() {
        let m = market("A completely unclassifiable question", "X-1", None);
        let c = classify(&m);
        assert_eq!(c.topic, CanonicalTopic::Unknown);
        assert_eq!(c.confidence, 0.0);
    }
}
