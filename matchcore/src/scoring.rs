//! Shared weighted-scoring component functions, used by every pipeline's
//! `score` implementation. Every component returns a value in `[0, 1]`.

use crate::signals::comparator::Comparator;
use crate::signals::dates::{DateSignal, DateType};
use crate::signals::tokenizer::jaccard;

/// The overall match strength implied by a pipeline's weighted score.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tier {
    Strong,
    Weak,
}

/// `1.0` if the two canonicalized entity strings are equal, else `0.0`.
/// Most pipelines additionally treat this as a hard gate rather than a
/// soft component.
pub fn entity_score(a: Option<&str>, b: Option<&str>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => {
            if a == b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// The six period-compatibility kinds enumerated by `isPeriodCompatible`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PeriodCompatibility {
    Exact,
    MonthInQuarter,
    QuarterContainsMonth,
    SameYear,
    AdjacentMonth,
    Incompatible,
}

fn period_year(period_key: &str) -> Option<i32> {
    period_key.get(0..4)?.parse().ok()
}

fn period_month(period_key: &str) -> Option<u32> {
    if period_key.len() == 7 {
        period_key.get(5..7)?.parse().ok()
    } else {
        None
    }
}

fn period_quarter(period_key: &str) -> Option<u32> {
    let tail = period_key.get(5..)?;
    tail.strip_prefix('Q')?.parse().ok()
}

/// Classify the relationship between two period keys (`YYYY-MM`, `YYYY-Qn`,
/// `YYYY`). A `null`/missing key on either side is `Incompatible`, per the
/// resolved Open Question in DESIGN.md (never silently scored as partial).
pub fn is_period_compatible(a: &str, b: &str) -> PeriodCompatibility {
    if a == b {
        return PeriodCompatibility::Exact;
    }
    let (Some(ya), Some(yb)) = (period_year(a), period_year(b)) else {
        return PeriodCompatibility::Incompatible;
    };
    if ya != yb {
        return PeriodCompatibility::Incompatible;
    }

    match (period_month(a), period_quarter(a), period_month(b), period_quarter(b)) {
        (Some(ma), None, None, Some(qb)) => {
            if month_in_quarter(ma, qb) {
                PeriodCompatibility::MonthInQuarter
            } else {
                PeriodCompatibility::SameYear
            }
        }
        (None, Some(qa), Some(mb), None) => {
            if month_in_quarter(mb, qa) {
                PeriodCompatibility::QuarterContainsMonth
            } else {
                PeriodCompatibility::SameYear
            }
        }
        (Some(ma), None, Some(mb), None) => {
            if ma == mb {
                PeriodCompatibility::Exact
            } else if ma.abs_diff(mb) == 1 {
                PeriodCompatibility::AdjacentMonth
            } else {
                PeriodCompatibility::SameYear
            }
        }
        _ => PeriodCompatibility::SameYear,
    }
}

fn month_in_quarter(month: u32, quarter: u32) -> bool {
    matches!((quarter, month), (1, 1..=3) | (2, 4..=6) | (3, 7..=9) | (4, 10..=12))
}

impl PeriodCompatibility {
    /// The score contribution used by macro/rates-family pipelines.
    /// `null`/`incompatible` is uniformly `0.0` and treated as a hard gate
    /// by callers that require period alignment.
    pub fn score(&self) -> f32 {
        match self {
            PeriodCompatibility::Exact => 1.0,
            PeriodCompatibility::MonthInQuarter | PeriodCompatibility::QuarterContainsMonth => 0.8,
            PeriodCompatibility::SameYear => 0.4,
            PeriodCompatibility::AdjacentMonth => 0.4,
            PeriodCompatibility::Incompatible => 0.0,
        }
    }
}

/// Date/period score: exact match on the same `dateType` is `1.0`; exact
/// date under a different type is `0.8`-`0.9`; same month different
/// day/type is `0.7`; adjacent month is `0.4`; else `0.0`.
pub fn date_score(a: &DateSignal, b: &DateSignal) -> f32 {
    match (a.target_date, b.target_date) {
        (Some(da), Some(db)) if da == db => {
            if a.date_type == b.date_type {
                1.0
            } else {
                0.85
            }
        }
        _ => match (&a.period_key, &b.period_key) {
            (Some(pa), Some(pb)) => match is_period_compatible(pa, pb) {
                PeriodCompatibility::Exact => 1.0,
                PeriodCompatibility::MonthInQuarter | PeriodCompatibility::QuarterContainsMonth => 0.7,
                PeriodCompatibility::AdjacentMonth => 0.4,
                PeriodCompatibility::SameYear | PeriodCompatibility::Incompatible => 0.0,
            },
            _ => 0.0,
        },
    }
}

fn normalize_comparator(c: Comparator) -> Comparator {
    // GT/LT phrasing is already folded into Ge/Le at parse time; this
    // function exists so call sites read the normalization step
    // explicitly.
    c
}

/// Comparator score: `1.0` equal, `0.5` one missing, `0.0` opposite,
/// `0.3` one side `Between` and the other single-sided.
pub fn comparator_score(a: Option<Comparator>, b: Option<Comparator>) -> f32 {
    match (a.map(normalize_comparator), b.map(normalize_comparator)) {
        (Some(x), Some(y)) if x == y => 1.0,
        (Some(Comparator::Ge), Some(Comparator::Le)) | (Some(Comparator::Le), Some(Comparator::Ge)) => 0.0,
        (Some(Comparator::Between), Some(_)) | (Some(_), Some(Comparator::Between)) => 0.3,
        (Some(_), Some(_)) => 0.5,
        (None, None) => 0.5,
        _ => 0.5,
    }
}

/// Whether two comparators are direct opposites (used by auto-reject).
pub fn comparators_conflict(a: Option<Comparator>, b: Option<Comparator>) -> bool {
    matches!(
        (a, b),
        (Some(Comparator::Ge), Some(Comparator::Le)) | (Some(Comparator::Le), Some(Comparator::Ge))
    )
}

/// Single-threshold number score: `1.0` within tolerance
/// `max(1.0, 0.001 * max(a,b))`, partial credit scaled down to zero by a
/// 10% relative gap.
pub fn number_score(a: f64, b: f64) -> f32 {
    let tolerance = (0.001 * a.abs().max(b.abs())).max(1.0);
    let diff = (a - b).abs();
    if diff <= tolerance {
        return 1.0;
    }
    let relative_gap = diff / a.abs().max(b.abs()).max(1.0);
    if relative_gap >= 0.10 {
        0.0
    } else {
        (1.0 - (relative_gap / 0.10)) as f32
    }
}

/// Best-match number score across two threshold lists: take the closest
/// pairing rather than requiring positional alignment, since extractors
/// may return thresholds in different orders.
pub fn numbers_score(a: &[f64], b: &[f64]) -> f32 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    a.iter()
        .flat_map(|x| b.iter().map(move |y| number_score(*x, *y)))
        .fold(0.0_f32, f32::max)
}

/// Range (`Between`) overlap score: Jaccard-like overlap ratio >= 0.90, or
/// both endpoints individually within number tolerance.
pub fn range_score(a: (f64, f64), b: (f64, f64)) -> f32 {
    let overlap_start = a.0.max(b.0);
    let overlap_end = a.1.min(b.1);
    let union_start = a.0.min(b.0);
    let union_end = a.1.max(b.1);
    let overlap = (overlap_end - overlap_start).max(0.0);
    let union = (union_end - union_start).max(f64::EPSILON);
    let ratio = overlap / union;
    if ratio >= 0.90 {
        1.0
    } else if number_score(a.0, b.0) >= 0.99 && number_score(a.1, b.1) >= 0.99 {
        1.0
    } else {
        ratio as f32
    }
}

/// Jaccard text similarity of two token sets.
pub fn text_score(a: &[String], b: &[String]) -> f32 {
    jaccard(a, b)
}

/// Time-proximity score for sports/intraday matching: `1.0` same 30-minute
/// bucket, `0.7` the adjacent bucket, `0.0` else.
pub fn time_bucket_score(
    a: Option<chrono::DateTime<chrono::Utc>>,
    b: Option<chrono::DateTime<chrono::Utc>>,
) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let diff_minutes = (a - b).num_minutes().abs();
            if diff_minutes == 0 {
                1.0
            } else if diff_minutes <= 30 {
                0.7
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Close-time-only proximity: linear decay with breakpoints at 12h, 24h,
/// 48h, and 168h (one week).
pub fn close_time_proximity_score(hours_apart: f64) -> f32 {
    let breakpoints: &[(f64, f32)] = &[(12.0, 1.0), (24.0, 0.8), (48.0, 0.5), (168.0, 0.2)];
    for (hours, score) in breakpoints {
        if hours_apart <= *hours {
            return *score;
        }
    }
    0.0
}

/// Weighted sum of `(component, weight)` pairs, clamped to `[0, 1]`.
pub fn weighted_sum(components: &[(f32, f32)]) -> f32 {
    let sum: f32 = components.iter().map(|(score, weight)| score * weight).sum();
    sum.clamp(0.0, 1.0)
}

/// Classify a final score into `Strong`/`Weak`. `Strong` means the main
/// components all aligned, not just that the numeric sum happened to
/// clear a threshold.
pub fn classify_tier(score: f32, all_main_components_aligned: bool) -> Tier {
    if score >= 0.85 && all_main_components_aligned {
        Tier::Strong
    } else {
        Tier::Weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_score_exact_match() {
        assert_eq!(entity_score(Some("BITCOIN"), Some("BITCOIN")), 1.0);
        assert_eq!(entity_score(Some("BITCOIN"), Some("ETHEREUM")), 0.0);
        assert_eq!(entity_score(None, Some("ETHEREUM")), 0.0);
    }

    #[test]
    fn period_compatibility_exact_and_adjacent() {
        assert_eq!(is_period_compatible("2025-01", "2025-01"), PeriodCompatibility::Exact);
        assert_eq!(is_period_compatible("2025-01", "2025-02"), PeriodCompatibility::AdjacentMonth);
        assert_eq!(is_period_compatible("2025-01", "2026-01"), PeriodCompatibility::Incompatible);
    }

    #[test]
    fn period_compatibility_quarter_relationships() {
        assert_eq!(is_period_compatible("2025-02", "2025-Q1"), PeriodCompatibility::MonthInQuarter);
        assert_eq!(is_period_compatible("2025-Q1", "2025-02"), PeriodCompatibility::QuarterContainsMonth);
    }

    #[test]
    fn null_period_is_hard_incompatible() {
        assert_eq!(is_period_compatible("", "2025-01"), PeriodCompatibility::Incompatible);
        assert_eq!(PeriodCompatibility::Incompatible.score(), 0.0);
    }

    #[test]
    fn comparator_score_cases() {
        assert_eq!(comparator_score(Some(Comparator::Ge), Some(Comparator::Ge)), 1.0);
        assert_eq!(comparator_score(Some(Comparator::Ge), Some(Comparator::Le)), 0.0);
        assert_eq!(comparator_score(Some(Comparator::Between), Some(Comparator::Ge)), 0.3);
        assert_eq!(comparator_score(Some(Comparator::Ge), None), 0.5);
    }

    #[test]
    fn comparators_conflict_detects_opposites() {
        assert!(comparators_conflict(Some(Comparator::Ge), Some(Comparator::Le)));
        assert!(!comparators_conflict(Some(Comparator::Ge), Some(Comparator::Ge)));
    }

    #[test]
    fn number_score_exact_and_within_tolerance() {
        assert_eq!(number_score(100_000.0, 100_000.0), 1.0);
        assert!(number_score(100_000.0, 100_050.0) > 0.9);
    }

    #[test]
    fn number_score_zero_beyond_ten_percent() {
        assert_eq!(number_score(100.0, 200.0), 0.0);
    }

    #[test]
    fn range_score_high_overlap() {
        assert_eq!(range_score((90_000.0, 100_000.0), (90_000.0, 100_000.0)), 1.0);
    }

    #[test]
    fn time_bucket_score_buckets() {
        use chrono::TimeZone;
        let a = chrono::Utc.with_ymd_and_hms(2025, 1, 23, 20, 0, 0).unwrap();
        let b = chrono::Utc.with_ymd_and_hms(2025, 1, 23, 20, 30, 0).unwrap();
        let c = chrono::Utc.with_ymd_and_hms(2025, 1, 23, 22, 0, 0).unwrap();
        assert_eq!(time_bucket_score(Some(a), Some(a)), 1.0);
        assert_eq!(time_bucket_score(Some(a), Some(b)), 0.7);
        assert_eq!(time_bucket_score(Some(a), Some(c)), 0.0);
    }

    #[test]
    fn close_time_proximity_breakpoints() {
        assert_eq!(close_time_proximity_score(6.0), 1.0);
        assert_eq!(close_time_proximity_score(20.0), 0.8);
        assert_eq!(close_time_proximity_score(40.0), 0.5);
        assert_eq!(close_time_proximity_score(100.0), 0.2);
        assert_eq!(close_time_proximity_score(200.0), 0.0);
    }

    #[test]
    fn weighted_sum_clamps() {
        assert_eq!(weighted_sum(&[(1.0, 0.6), (1.0, 0.6)]), 1.0);
        assert_eq!(weighted_sum(&[(0.5, 0.5), (0.5, 0.5)]), 0.5);
    }
}
