//! Number parsing for market titles: `$50`, `50k`, `1.5m`, `100,000`,
//! `4.25%`, and plain integers. Year-like bare integers in `[1900, 2100]`
//! are skipped unless they carry an explicit currency/magnitude suffix, so
//! `"... by 2026"` does not get misread as a $2026 threshold. A bare
//! integer with no such suffix is only extracted when a comparator keyword
//! (above/below/over/under/between/at least/at most/...) appears nearby,
//! so e.g. "50 total contestants" is not misread as a $50 threshold.

use std::sync::OnceLock;

use regex::Regex;

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\$?([0-9][0-9,]*(?:\.[0-9]+)?)\s*(k|m|bn|%)?").unwrap()
    })
}

fn comparator_context_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(above|below|over|under|between|at least|at most|greater than|less than|higher than|lower than|settle over|settle under)\b",
        )
        .unwrap()
    })
}

const YEAR_MIN: f64 = 1900.0;
const YEAR_MAX: f64 = 2100.0;

/// How many characters of preceding context to scan for a comparator
/// keyword when deciding whether a bare (unmarked) integer is a real
/// threshold. Wide enough to cover "between $90k and " before a second
/// bare number, narrow enough to not pick up unrelated earlier clauses.
const COMPARATOR_WINDOW_CHARS: usize = 40;

/// `text[..start]`, trimmed to at most `max_chars` characters, always on a
/// UTF-8 char boundary.
fn window_before(text: &str, start: usize, max_chars: usize) -> &str {
    let mut begin = start.min(text.len());
    let mut taken = 0;
    while begin > 0 && taken < max_chars {
        begin -= 1;
        while begin > 0 && !text.is_char_boundary(begin) {
            begin -= 1;
        }
        taken += 1;
    }
    &text[begin..start]
}

fn has_comparator_context(text: &str, match_start: usize) -> bool {
    // "between X and Y" can put a comparator keyword well before the
    // second bare number, so a title-wide "between" also counts.
    if text.to_lowercase().contains("between") {
        return true;
    }
    comparator_context_re().is_match(window_before(text, match_start, COMPARATOR_WINDOW_CHARS))
}

/// Parse every numeric-looking token in `text`, applying magnitude suffixes
/// (`k` = 1e3, `m` = 1e6, `bn` = 1e9) and dropping the thousands separator.
/// Bare integers that look like calendar years are skipped unless a `$`
/// prefix or `k`/`m`/`bn`/`%` suffix disambiguates them; any other bare
/// integer is only kept when it sits near a comparator keyword.
pub fn parse_numbers(text: &str) -> Vec<f64> {
    let mut out = Vec::new();
    for cap in number_re().captures_iter(text) {
        let whole = cap.get(0).unwrap();
        let had_dollar = whole.as_str().trim_start().starts_with('$');
        let digits = cap.get(1).unwrap().as_str().replace(',', "");
        let suffix = cap.get(2).map(|m| m.as_str().to_lowercase());

        let Ok(mut value) = digits.parse::<f64>() else {
            continue;
        };

        let scale = match suffix.as_deref() {
            Some("k") => 1_000.0,
            Some("m") => 1_000_000.0,
            Some("bn") => 1_000_000_000.0,
            _ => 1.0,
        };
        value *= scale;

        let is_percent = suffix.as_deref() == Some("%");
        let marked = had_dollar || scale != 1.0 || is_percent;
        if !marked {
            if (YEAR_MIN..=YEAR_MAX).contains(&value) {
                continue;
            }
            if !has_comparator_context(text, whole.start()) {
                continue;
            }
        }

        out.push(value);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dollar_amount() {
        assert_eq!(parse_numbers("Bitcoin above $100,000"), vec![100_000.0]);
    }

    #[test]
    fn parses_k_suffix() {
        assert_eq!(parse_numbers("BTC over 100k"), vec![100_000.0]);
    }

    #[test]
    fn parses_m_suffix() {
        assert_eq!(parse_numbers("Market cap above 1.5m"), vec![1_500_000.0]);
    }

    #[test]
    fn parses_percent() {
        assert_eq!(parse_numbers("Fed cuts by 4.25%"), vec![4.25]);
    }

    #[test]
    fn skips_bare_year() {
        assert_eq!(parse_numbers("Will this resolve by 2026?"), Vec::<f64>::new());
    }

    #[test]
    fn keeps_disambiguated_year_like_value() {
        assert_eq!(parse_numbers("Above $2026"), vec![2026.0]);
    }

    #[test]
    fn bare_integer_without_comparator_context_is_not_a_threshold() {
        assert_eq!(
            parse_numbers("Market has 50 total contestants in 2026"),
            Vec::<f64>::new()
        );
    }

    #[test]
    fn bare_integer_near_comparator_keyword_is_kept() {
        assert_eq!(parse_numbers("Will turnout be at least 50 percent?"), vec![50.0]);
    }

    #[test]
    fn bare_integers_in_between_range_are_both_kept() {
        assert_eq!(parse_numbers("Contestants between 90 and 100"), vec![90.0, 100.0]);
    }
}
