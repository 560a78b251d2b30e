use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api_client::MAX_READ_RETRIES;

const DEFAULT_SESSION_PATH: &str = ".applicant/session.json";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_path: PathBuf,
    pub http_timeout: Duration,
    pub read_retries: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_url = require(&lookup, "APPLICANT_API_URL")?;
        let http_timeout_secs = lookup("APPLICANT_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("APPLICANT_HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            session_path: lookup("APPLICANT_SESSION_PATH")
                .unwrap_or_else(|| DEFAULT_SESSION_PATH.to_string())
                .into(),
            http_timeout: Duration::from_secs(http_timeout_secs),
            read_retries: lookup("APPLICANT_READ_RETRIES")
                .unwrap_or_else(|| "3".to_string())
                .parse::<u32>()
                .context("APPLICANT_READ_RETRIES must be a non-negative integer")?
                .clamp(1, MAX_READ_RETRIES),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}
