//! Engine-level errors. Hand-rolled `Display`-based error enums rather
//! than a derive-macro error crate, so that the disposition of each
//! variant (retry? skip? abort the run?) is visible right next to its
//! definition.

use std::fmt;

use crate::model::CanonicalTopic;

/// Failures the engine loop can hit. Most are non-fatal for the overall
/// run; see `EngineError::is_fatal_for_run`.
#[derive(Debug)]
pub enum EngineError {
    /// No pipeline is registered for this topic.
    UnsupportedTopic(CanonicalTopic),
    /// A pipeline's internal invariant was violated (programmer error).
    InvariantViolation { pipeline: CanonicalTopic, detail: String },
    /// The venue fetch collaborator failed after exhausting retries.
    FetchFailed { venue: String, kind: FetchErrorKind, detail: String },
    /// The link/watchlist write-back collaborator failed on a batch.
    WriteFailed { detail: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnsupportedTopic(topic) => {
                write!(f, "unsupported_topic: no pipeline registered for {topic}")
            }
            EngineError::InvariantViolation { pipeline, detail } => {
                write!(f, "{pipeline}: invariant violation: {detail}")
            }
            EngineError::FetchFailed { venue, kind, detail } => {
                write!(f, "{venue}: fetch failed ({kind}): {detail}")
            }
            EngineError::WriteFailed { detail } => write!(f, "write failed: {detail}"),
        }
    }
}
impl std::error::Error for EngineError {}

impl EngineError {
    /// Only a programmer error (pipeline invariant violation) aborts the
    /// run outright; everything else is caught, logged, and counted so the
    /// orchestrator can move on to the next `(topic, venues)` triple.
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(self, EngineError::InvariantViolation { .. })
    }
}

/// The standard fetch-failure taxonomy, shared with the ingestion
/// collaborator's own error categorization so operators see one vocabulary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    RateLimited,
    ServerError,
    Timeout,
    Network,
    Db,
    ParseError,
    Other,
}
impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchErrorKind::RateLimited => "429_rate_limit",
            FetchErrorKind::ServerError => "5xx_server",
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::Network => "network",
            FetchErrorKind::Db => "db",
            FetchErrorKind::ParseError => "parse_error",
            FetchErrorKind::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// Why a single market failed extraction. Always non-fatal: the market is
/// skipped and counted under `extractor_skipped`.
#[derive(Debug)]
pub enum ExtractError {
    MissingField { market_id: i64, field: &'static str },
    UnparsableDate { market_id: i64, raw: String },
}
impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::MissingField { market_id, field } => {
                write!(f, "market {market_id}: missing required field `{field}`")
            }
            ExtractError::UnparsableDate { market_id, raw } => {
                write!(f, "market {market_id}: unparsable date `{raw}`")
            }
        }
    }
}
impl std::error::Error for ExtractError {}
