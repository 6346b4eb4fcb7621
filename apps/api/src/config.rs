use anyhow::{Context, Result};

use crate::llm_client::{ModelConfig, DEFAULT_GEMINI_BASE_URL};

const DEFAULT_CACHE_NAMESPACE: &str = "careerguide";

/// Application configuration loaded from environment variables.
///
/// Nothing here is strictly required: a missing `GEMINI_API_KEY` puts every
/// use case on its fallback, a missing `REDIS_URL` keeps the cache in memory.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub redis_url: Option<String>,
    pub cache_namespace: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_base_url: optional_env("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            redis_url: optional_env("REDIS_URL"),
            cache_namespace: optional_env("CACHE_NAMESPACE")
                .unwrap_or_else(|| DEFAULT_CACHE_NAMESPACE.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Resolves the model settings once so the invoker never reads the environment.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            api_key: self.gemini_api_key.clone(),
            base_url: self.gemini_base_url.clone(),
        }
    }
}

/// Reads an env var, treating unset and blank values the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
