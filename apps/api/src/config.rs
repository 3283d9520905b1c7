use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MAX_RETRIES;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// When unset, records live in an in-process store and vanish on restart.
    pub database_url: Option<String>,
    pub gemini_api_key: String,
    pub port: u16,
    pub cors_origin: String,
    pub max_retries: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            port: optional_env("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            cors_origin: optional_env("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:5173".to_string()),
            max_retries: match optional_env("GENERATION_MAX_RETRIES") {
                Some(raw) => raw
                    .parse::<u32>()
                    .context("GENERATION_MAX_RETRIES must be a non-negative integer")?,
                None => DEFAULT_MAX_RETRIES,
            },
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats an empty value the same as an unset one.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
