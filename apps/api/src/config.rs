use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or numbers don't parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    /// Sent as the `Referer` header on every OpenRouter call.
    pub site_url: String,
    pub port: u16,
    pub rust_log: String,
    pub generation_timeout: Duration,
    pub sentiment_timeout: Duration,
    pub session_idle_timeout: Duration,
    pub session_reap_interval: Duration,
    pub transcript_dir: PathBuf,
    pub transcript_filename: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
            openrouter_model: env_or("OPENROUTER_MODEL", DEFAULT_MODEL),
            site_url: env_or("SITE_URL", "http://localhost:8501"),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG")
                .or_else(|_| std::env::var("LOG_LEVEL"))
                .unwrap_or_else(|_| "info".to_string()),
            generation_timeout: Duration::from_secs(parse_env("GENERATION_TIMEOUT_SECS", 60)?),
            sentiment_timeout: Duration::from_secs(parse_env("SENTIMENT_TIMEOUT_SECS", 5)?),
            session_idle_timeout: Duration::from_secs(parse_env(
                "SESSION_IDLE_TIMEOUT_SECS",
                1800,
            )?),
            session_reap_interval: Duration::from_secs(parse_env(
                "SESSION_REAP_INTERVAL_SECS",
                60,
            )?),
            transcript_dir: std::env::var("TRANSCRIPT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            transcript_filename: env_or("TRANSCRIPT_FILENAME", "candidate_data.txt"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
