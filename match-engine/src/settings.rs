//! Environment/file configuration loading: `dotenvy::dotenv()` followed
//! by `std::env::var` lookups, with structured per-topic options layered
//! in from an optional TOML file.

use std::env;
use std::fs;

use anyhow::{Context, Result};
use matchcore::config::MatchConfig;

pub struct Settings {
    pub database_url: String,
    pub match_config: MatchConfig,
    pub db_pool_size: u32,
}

impl Settings {
    /// Load `DATABASE_URL` from the environment (after `dotenvy::dotenv()`
    /// has been called by the caller) and `MatchConfig` from an optional
    /// TOML file named by `MATCH_ENGINE_CONFIG`, falling back to
    /// documented defaults when the variable is unset.
    pub fn load() -> Result<Settings> {
        let database_url =
            env::var("DATABASE_URL").context("Required environment variable DATABASE_URL not set.")?;
        let db_pool_size = env::var("DATABASE_POOL_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5);

        let match_config = match env::var("MATCH_ENGINE_CONFIG") {
            Ok(path) => {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file at {path}"))?;
                toml::from_str(&raw).with_context(|| format!("Failed to parse config file at {path}"))?
            }
            Err(_) => MatchConfig::default(),
        };

        Ok(Settings { database_url, match_config, db_pool_size })
    }
}
