use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_SHARD: &str = "steam";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings read from the environment (and `.env`, when present).
#[derive(Debug, Clone)]
pub struct Config {
    pub pubg_api_key: String,
    pub shard: String,
    pub base_url: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let pubg_api_key =
            non_empty("PUBG_API_KEY").context("PUBG_API_KEY environment variable is required")?;

        let http_timeout = match non_empty("PUBG_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PUBG_HTTP_TIMEOUT_SECS must be a number, got '{raw}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            pubg_api_key,
            shard: non_empty("PUBG_SHARD").unwrap_or_else(|| DEFAULT_SHARD.to_string()),
            base_url: non_empty("PUBG_API_BASE_URL")
                .unwrap_or_else(|| pubg_client::DEFAULT_BASE_URL.to_string()),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let head: String = val.chars().take(5).collect();
            format!("{head}...({} chars)", val.chars().count())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  PUBG_API_KEY: {}", preview(&self.pubg_api_key));
        tracing::info!("  PUBG_SHARD: {}", self.shard);
        tracing::info!("  PUBG_API_BASE_URL: {}", self.base_url);
        tracing::info!("  PUBG_HTTP_TIMEOUT_SECS: {}", self.http_timeout.as_secs());
    }
}
