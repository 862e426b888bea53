// Centralized configuration management for the PhishGuard engine
// Load ALL env vars ONCE at startup

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Access the global configuration
pub fn config() -> &'static AppConfig {
    &CONFIG
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    // Server
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,

    // Classifier artifact
    pub model_path: String,

    // Feature extraction
    pub shortener_catalog_path: String,

    // Content fetch
    pub fetch_timeout_ms: u64,
    pub fetch_user_agent: String,

    // Security
    pub cors_allowed_origins: Vec<String>,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with sane defaults.
    /// Only malformed values error; absent values fall back.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_address: env_or("BIND_ADDRESS", "0.0.0.0"),
            port: parse_var("PORT", 8080)?,
            environment: Environment::from(env_or("ENVIRONMENT", "development")),
            rust_log: env_or("RUST_LOG", "phishguard_core=debug,tower_http=info"),
            model_path: env_or("MODEL_PATH", "data/model.json"),
            shortener_catalog_path: env_or("SHORTENER_CATALOG_PATH", "data/url_shorteners.json"),
            fetch_timeout_ms: parse_var("FETCH_TIMEOUT_MS", 2000)?,
            fetch_user_agent: env_or("FETCH_USER_AGENT", "PhishGuard-Bot/1.0"),
            cors_allowed_origins: env_or("CORS_ALLOWED_ORIGINS", "*")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), value)),
        Err(_) => Ok(default),
    }
}
