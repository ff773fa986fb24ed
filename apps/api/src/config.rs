use anyhow::{Context, Result};

use crate::jobs::models::SkillMatchMode;

const DEFAULT_ADZUNA_BASE_URL: &str = "https://api.adzuna.com/v1/api/jobs";

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Optional. Job search caching is disabled without it.
    pub redis_url: Option<String>,
    pub job_cache_ttl_secs: u64,
    /// Optional. Job search returns 503 until both id and key are set.
    pub adzuna_app_id: Option<String>,
    pub adzuna_app_key: Option<String>,
    pub adzuna_base_url: String,
    pub skill_match_mode: SkillMatchMode,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: optional_env("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse::<u32>()
                .context("DATABASE_MAX_CONNECTIONS must be a positive integer")?,
            redis_url: optional_env("REDIS_URL"),
            job_cache_ttl_secs: optional_env("JOB_CACHE_TTL_SECS")
                .unwrap_or_else(|| "300".to_string())
                .parse::<u64>()
                .context("JOB_CACHE_TTL_SECS must be a whole number of seconds")?,
            adzuna_app_id: optional_env("ADZUNA_APP_ID"),
            adzuna_app_key: optional_env("ADZUNA_APP_KEY"),
            adzuna_base_url: optional_env("ADZUNA_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ADZUNA_BASE_URL.to_string()),
            skill_match_mode: match optional_env("SKILL_MATCH_MODE") {
                Some(raw) => raw
                    .parse::<SkillMatchMode>()
                    .map_err(anyhow::Error::msg)
                    .context("SKILL_MATCH_MODE must be 'substring' or 'exact'")?,
                None => SkillMatchMode::default(),
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and blank values both read as `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
