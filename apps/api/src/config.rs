use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; startup only fails on malformed values.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Artificial processing latency applied to every upload before the
    /// analyzer runs. Tests set this to zero.
    pub analysis_delay: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            analysis_delay: Duration::from_millis(
                std::env::var("ANALYSIS_DELAY_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse::<u64>()
                    .context("ANALYSIS_DELAY_MS must be a number of milliseconds")?,
            ),
        })
    }
}
