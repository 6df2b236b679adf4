use std::time::Duration;

use anyhow::{Context, Result};

use crate::suggestions::provider::ProviderSettings;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MOCK_LATENCY_MS: u64 = 2000;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Absent or placeholder keys route suggestion requests to the mock provider.
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub mock_latency: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mock_latency_ms = match optional_env("MOCK_LATENCY_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("MOCK_LATENCY_MS must be a whole number of milliseconds")?,
            None => DEFAULT_MOCK_LATENCY_MS,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            mock_latency: Duration::from_millis(mock_latency_ms),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// The subset of configuration the provider factory needs.
    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            openai_api_key: self.openai_api_key.clone(),
            openai_base_url: self.openai_base_url.clone(),
            mock_latency: self.mock_latency,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and empty variables the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
