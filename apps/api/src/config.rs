use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub hh_client_id: String,
    pub hh_client_secret: String,
    pub hh_user_agent: String,
    pub openrouter_api_key: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            hh_client_id: require_env("HH_CLIENT_ID")?,
            hh_client_secret: require_env("HH_CLIENT_SECRET")?,
            // The job-board API rejects requests without a User-Agent
            hh_user_agent: std::env::var("HH_USER_AGENT")
                .unwrap_or_else(|_| "job-swipe-api/0.1 (dev)".to_string()),
            openrouter_api_key: require_env("OPENROUTER_API_KEY")?,
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
