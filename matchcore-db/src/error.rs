//! Hand-rolled repository error type, in the same style as `matchcore`'s
//! `EngineError`: every variant documents its own disposition instead of
//! leaning on a derive-macro error crate.

use std::fmt;

#[derive(Debug)]
pub enum RepoError {
    Connection(String),
    Query(String),
    Pool(String),
    /// A `Text` column held a value that doesn't match any known enum
    /// variant — indicates a schema/code version skew, not bad input data.
    BadEnumValue { column: &'static str, value: String },
}

impl fmt::Display for RepoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoError::Connection(detail) => write!(f, "db connection error: {detail}"),
            RepoError::Query(detail) => write!(f, "db query error: {detail}"),
            RepoError::Pool(detail) => write!(f, "db pool error: {detail}"),
            RepoError::BadEnumValue { column, value } => {
                write!(f, "column `{column}` held unrecognized value `{value}`")
            }
        }
    }
}
impl std::error::Error for RepoError {}

impl From<diesel::result::Error> for RepoError {
    fn from(e: diesel::result::Error) -> Self {
        RepoError::Query(e.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for RepoError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        RepoError::Pool(e.to_string())
    }
}

impl From<RepoError> for matchcore::error::EngineError {
    fn from(e: RepoError) -> Self {
        matchcore::error::EngineError::WriteFailed { detail: e.to_string() }
    }
}
