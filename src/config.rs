use crate::logging::LogLevel;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

fn default_items_per_page() -> usize {
    35
}

fn default_max_items_per_page() -> usize {
    100
}

fn default_max_officer_items_per_page() -> usize {
    50
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_log_level() -> String {
    "INFO".to_string()
}

/// Service configuration, loaded from a JSON document.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the registry metrics API.
    pub metrics_api_url: String,
    /// Base URL of the registry company profile API.
    pub company_profile_api_url: String,
    /// Base URL of the downstream notification endpoint.
    pub notification_api_url: String,
    #[serde(default = "default_timeout_ms")]
    pub upstream_timeout_ms: u64,
    #[serde(default = "default_items_per_page")]
    pub default_items_per_page: usize,
    #[serde(default = "default_max_items_per_page")]
    pub max_items_per_page: usize,
    #[serde(default = "default_max_officer_items_per_page")]
    pub max_officer_items_per_page: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("metrics_api_url", &self.metrics_api_url),
            ("company_profile_api_url", &self.company_profile_api_url),
            ("notification_api_url", &self.notification_api_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingEndpoint(name.to_string()));
            }
        }
        if self.default_items_per_page == 0 || self.max_items_per_page == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        if self.default_items_per_page > self.max_items_per_page {
            return Err(ConfigError::InvalidPageSize);
        }
        if LogLevel::parse(&self.log_level).is_none() {
            return Err(ConfigError::InvalidLogLevel(self.log_level.clone()));
        }
        Ok(())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.log_level).unwrap_or(LogLevel::Info)
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("endpoint [{0}] must be configured")]
    MissingEndpoint(String),
    #[error("page size limits must be non-zero and default <= max")]
    InvalidPageSize,
    #[error("unknown log level [{0}]")]
    InvalidLogLevel(String),
}
