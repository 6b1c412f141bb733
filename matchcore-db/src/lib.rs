//! Postgres/Diesel-backed implementations of `matchcore`'s repository
//! traits: schema, row/domain conversions, the chunked batch writer, and
//! the `PgRepo` that wires them together behind a connection pool.

pub mod convert;
pub mod error;
pub mod models;
pub mod repo;
pub mod schema;
pub mod writer;

pub use repo::{build_pool, PgPool, PgRepo};
