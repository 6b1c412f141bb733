//! Comparator extraction: `above/over/≥` → `Ge`, `below/under/≤` → `Le`,
//! `between X and Y` → `Between`. `Gt`/`Lt` phrasing normalizes straight to
//! `Ge`/`Le` since the distinction is not meaningful for matching.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Ge,
    Le,
    Between,
    Eq,
}

fn ge_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(above|over|at least|greater than|settle over|higher than|>=|≥|>)\b")
            .unwrap()
    })
}
fn le_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(below|under|at most|less than|settle under|lower than|<=|≤|<)\b")
            .unwrap()
    })
}
fn between_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bbetween\b|\$?\d[\d,.]*\s*[-–]\s*\$?\d[\d,.]*").unwrap())
}

/// Parse the dominant comparator out of free text. `between` is checked
/// first since "between $90k and $100k" would otherwise also match the
/// `above`/`below`-style regex on one of its endpoints.
pub fn parse_comparator(text: &str) -> Option<Comparator> {
    if between_re().is_match(text) {
        return Some(Comparator::Between);
    }
    if ge_re().is_match(text) {
        return Some(Comparator::Ge);
    }
    if le_re().is_match(text) {
        return Some(Comparator::Le);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ge_variants() {
        for phrase in ["Bitcoin above $100,000", "BTC over 100k", "at least 50"] {
            assert_eq!(parse_comparator(phrase), Some(Comparator::Ge), "{phrase}");
        }
    }

    #[test]
    fn parses_le_variants() {
        for phrase in ["Bitcoin below $100,000", "BTC under 100k"] {
            assert_eq!(parse_comparator(phrase), Some(Comparator::Le), "{phrase}");
        }
    }

    #[test]
    fn parses_between() {
        assert_eq!(
            parse_comparator("Bitcoin between $90,000 and $100,000"),
            Some(Comparator::Between)
        );
        assert_eq!(parse_comparator("BTC $90k-$100k"), Some(Comparator::Between));
    }

    #[test]
    fn none_when_no_comparator_present() {
        assert_eq!(parse_comparator("Bitcoin price on January 1"), None);
    }
}
