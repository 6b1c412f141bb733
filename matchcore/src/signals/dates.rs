//! Date parsing: three textual families tried in order, falling back to
//! the market's own `closeTime` when none match.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateType {
    DayExact,
    MonthEnd,
    Quarter,
    CloseTime,
    Unknown,
}

/// The parsed date/period for a market, however it was derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSignal {
    pub date_type: DateType,
    pub target_date: Option<NaiveDate>,
    /// `YYYY-MM`, `YYYY-Qn`, or `YYYY`.
    pub period_key: Option<String>,
}
impl DateSignal {
    fn unknown() -> Self {
        DateSignal { date_type: DateType::Unknown, target_date: None, period_key: None }
    }
}

fn months() -> &'static [(&'static str, u32)] {
    &[
        ("january", 1), ("february", 2), ("march", 3), ("april", 4),
        ("may", 5), ("june", 6), ("july", 7), ("august", 8),
        ("september", 9), ("october", 10), ("november", 11), ("december", 12),
        ("jan", 1), ("feb", 2), ("mar", 3), ("apr", 4), ("jun", 6), ("jul", 7),
        ("aug", 8), ("sep", 9), ("sept", 9), ("oct", 10), ("nov", 11), ("dec", 12),
    ]
}

fn month_alternation() -> String {
    months().iter().map(|(name, _)| *name).collect::<Vec<_>>().join("|")
}

fn month_to_num(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    months().iter().find(|(n, _)| *n == lower).map(|(_, n)| *n)
}

fn month_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)final trading day of ({})(?:\s+(\d{{4}}))?",
            month_alternation()
        ))
        .unwrap()
    })
}
fn day_exact_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)({})\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})",
            month_alternation()
        ))
        .unwrap()
    })
}
fn period_month_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\b(?:on|in|for|by)\s+({})\s+(\d{{4}})",
            month_alternation()
        ))
        .unwrap()
    })
}
fn quarter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bQ([1-4])\s*(\d{4})").unwrap())
}

/// Try each date family in order of specificity, falling back to `closeTime`.
pub fn parse_date(text: &str, close_time: Option<DateTime<Utc>>) -> DateSignal {
    let current_year = Utc::now().year();

    if let Some(cap) = month_end_re().captures(text) {
        let month = month_to_num(&cap[1]).unwrap();
        let year = cap
            .get(2)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or(current_year);
        if let Some(date) = last_day_of_month(year, month) {
            return DateSignal {
                date_type: DateType::MonthEnd,
                target_date: Some(date),
                period_key: Some(format!("{year:04}-{month:02}")),
            };
        }
    }

    if let Some(cap) = day_exact_re().captures(text) {
        let month = month_to_num(&cap[1]).unwrap();
        let day: u32 = cap[2].parse().unwrap_or(1);
        let year: i32 = cap[3].parse().unwrap_or(current_year);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return DateSignal {
                date_type: DateType::DayExact,
                target_date: Some(date),
                period_key: Some(format!("{year:04}-{month:02}")),
            };
        }
    }

    if let Some(cap) = quarter_re().captures(text) {
        let quarter: u32 = cap[1].parse().unwrap_or(1);
        let year: i32 = cap[2].parse().unwrap_or(current_year);
        return DateSignal {
            date_type: DateType::Quarter,
            target_date: None,
            period_key: Some(format!("{year:04}-Q{quarter}")),
        };
    }

    if let Some(cap) = period_month_re().captures(text) {
        let month = month_to_num(&cap[1]).unwrap();
        let year: i32 = cap[2].parse().unwrap_or(current_year);
        let target = last_day_of_month(year, month);
        return DateSignal {
            date_type: DateType::MonthEnd,
            target_date: target,
            period_key: Some(format!("{year:04}-{month:02}")),
        };
    }

    if let Some(close) = close_time {
        let date = close.date_naive();
        return DateSignal {
            date_type: DateType::CloseTime,
            target_date: Some(date),
            period_key: Some(format!("{:04}-{:02}", date.year(), date.month())),
        };
    }

    DateSignal::unknown()
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).map(|d| d.pred_opt().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_day_exact() {
        let sig = parse_date("Bitcoin above $100,000 on January 31, 2026", None);
        assert_eq!(sig.date_type, DateType::DayExact);
        assert_eq!(sig.target_date, NaiveDate::from_ymd_opt(2026, 1, 31));
        assert_eq!(sig.period_key.as_deref(), Some("2026-01"));
    }

    #[test]
    fn parses_month_end() {
        let sig = parse_date("BTC final trading day of January 2026", None);
        assert_eq!(sig.date_type, DateType::MonthEnd);
        assert_eq!(sig.target_date, NaiveDate::from_ymd_opt(2026, 1, 31));
    }

    #[test]
    fn parses_quarter() {
        let sig = parse_date("US GDP growth in Q1 2025", None);
        assert_eq!(sig.date_type, DateType::Quarter);
        assert_eq!(sig.period_key.as_deref(), Some("2025-Q1"));
    }

    #[test]
    fn parses_period_month() {
        let sig = parse_date("Fed decision for January 2025", None);
        assert_eq!(sig.date_type, DateType::MonthEnd);
        assert_eq!(sig.period_key.as_deref(), Some("2025-01"));
    }

    #[test]
    fn falls_back_to_close_time() {
        let close = Utc.with_ymd_and_hms(2026, 3, 15, 0, 0, 0).unwrap();
        let sig = parse_date("No recognizable date phrase here", Some(close));
        assert_eq!(sig.date_type, DateType::CloseTime);
        assert_eq!(sig.target_date, NaiveDate::from_ymd_opt(2026, 3, 15));
    }

    #[test]
    fn unknown_when_nothing_matches() {
        let sig = parse_date("Totally unrelated text", None);
        assert_eq!(sig.date_type, DateType::Unknown);
    }
}
