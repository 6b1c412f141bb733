//! Venue fetch error type, matching the standard taxonomy every collaborator
//! that talks to a venue over HTTP is expected to report through.

use std::fmt;

use matchcore::error::{EngineError, FetchErrorKind};

#[derive(Debug)]
pub struct VenueError {
    pub venue: String,
    pub kind: FetchErrorKind,
    pub detail: String,
}

impl fmt::Display for VenueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.venue, self.detail, self.kind)
    }
}
impl std::error::Error for VenueError {}

impl From<VenueError> for EngineError {
    fn from(e: VenueError) -> Self {
        EngineError::FetchFailed { venue: e.venue, kind: e.kind, detail: e.detail }
    }
}

pub fn classify_status(status: reqwest::StatusCode) -> FetchErrorKind {
    if status.as_u16() == 429 {
        FetchErrorKind::RateLimited
    } else if status.is_server_error() {
        FetchErrorKind::ServerError
    } else {
        FetchErrorKind::Other
    }
}
