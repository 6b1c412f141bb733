//! `Display`/`FromStr`-style round-trips between `matchcore`'s enums and
//! the plain `Text` columns they're stored in. Kept here rather than on
//! the enums themselves so `matchcore` stays free of any storage-format
//! opinion.

use matchcore::model::{CanonicalTopic, LinkStatus, MarketStatus, OutcomeSide, Venue};

use crate::error::RepoError;

pub fn venue_to_str(v: Venue) -> &'static str {
    match v {
        Venue::Kalshi => "kalshi",
        Venue::Polymarket => "polymarket",
    }
}
pub fn venue_from_str(s: &str) -> Result<Venue, RepoError> {
    match s {
        "kalshi" => Ok(Venue::Kalshi),
        "polymarket" => Ok(Venue::Polymarket),
        other => Err(RepoError::BadEnumValue { column: "venue", value: other.to_string() }),
    }
}

pub fn status_to_str(s: MarketStatus) -> &'static str {
    match s {
        MarketStatus::Active => "active",
        MarketStatus::Closed => "closed",
        MarketStatus::Resolved => "resolved",
        MarketStatus::Archived => "archived",
    }
}
pub fn status_from_str(s: &str) -> Result<MarketStatus, RepoError> {
    match s {
        "active" => Ok(MarketStatus::Active),
        "closed" => Ok(MarketStatus::Closed),
        "resolved" => Ok(MarketStatus::Resolved),
        "archived" => Ok(MarketStatus::Archived),
        other => Err(RepoError::BadEnumValue { column: "status", value: other.to_string() }),
    }
}

pub fn outcome_side_to_str(s: OutcomeSide) -> &'static str {
    match s {
        OutcomeSide::Yes => "yes",
        OutcomeSide::No => "no",
        OutcomeSide::Other => "other",
    }
}
pub fn outcome_side_from_str(s: &str) -> OutcomeSide {
    match s {
        "yes" => OutcomeSide::Yes,
        "no" => OutcomeSide::No,
        _ => OutcomeSide::Other,
    }
}

pub fn topic_to_str(t: CanonicalTopic) -> String {
    t.to_string()
}
pub fn topic_from_str(s: &str) -> Result<CanonicalTopic, RepoError> {
    CanonicalTopic::all()
        .into_iter()
        .find(|t| t.to_string() == s)
        .ok_or_else(|| RepoError::BadEnumValue { column: "topic", value: s.to_string() })
}

pub fn link_status_to_str(s: LinkStatus) -> &'static str {
    match s {
        LinkStatus::Suggested => "suggested",
        LinkStatus::Confirmed => "confirmed",
        LinkStatus::Rejected => "rejected",
    }
}
pub fn link_status_from_str(s: &str) -> Result<LinkStatus, RepoError> {
    match s {
        "suggested" => Ok(LinkStatus::Suggested),
        "confirmed" => Ok(LinkStatus::Confirmed),
        "rejected" => Ok(LinkStatus::Rejected),
        other => Err(RepoError::BadEnumValue { column: "status", value: other.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn venue_round_trips() {
        for v in [Venue::Kalshi, Venue::Polymarket] {
            assert_eq!(venue_from_str(venue_to_str(v)).unwrap(), v);
        }
    }

    #[test]
    fn topic_round_trips_for_every_variant() {
        for t in CanonicalTopic::all() {
            assert_eq!(topic_from_str(&topic_to_str(t)).unwrap(), t);
        }
    }

    #[test]
    fn unknown_enum_value_is_an_error() {
        assert!(venue_from_str("nope").is_err());
    }
}
