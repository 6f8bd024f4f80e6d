use std::time::Duration;

use anyhow::{Context, Result};

use crate::board::orchestrator::DEFAULT_DEBOUNCE;
use crate::upstream::DEFAULT_UPSTREAM_URL;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub upstream_url: String,
    /// Quiet period before a filter change triggers a fetch.
    pub search_debounce: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let search_debounce = match lookup("SEARCH_DEBOUNCE_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse::<u64>()
                    .context("SEARCH_DEBOUNCE_MS must be a whole number of milliseconds")?,
            ),
            None => DEFAULT_DEBOUNCE,
        };

        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            upstream_url: lookup("UPSTREAM_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            search_debounce,
        })
    }
}
