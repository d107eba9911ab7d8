//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; API keys are only ever read
//! from environment variables (`FOOTBALL_DATA_API_KEY`, `API_FOOTBALL_KEY`,
//! `ODDS_API_KEY`), never from the config file.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::ConfigError;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "scoreline.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Per-source toggles and request pacing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    #[serde(default)]
    pub fbref: FbrefConfig,
    #[serde(default)]
    pub football_data: FootballDataConfig,
    #[serde(default)]
    pub api_football: ApiFootballConfig,
    #[serde(default)]
    pub odds_api: OddsApiConfig,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct FbrefConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_fbref_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_fbref_delay_ms() -> u64 {
    2000
}

impl Default for FbrefConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            request_delay_ms: default_fbref_delay_ms(),
        }
    }
}

impl FbrefConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FootballDataConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_football_data_delay_ms")]
    pub request_delay_ms: u64,
    /// Loaded from `FOOTBALL_DATA_API_KEY` at runtime, never from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_football_data_delay_ms() -> u64 {
    500
}

impl Default for FootballDataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            request_delay_ms: default_football_data_delay_ms(),
            api_key: None,
        }
    }
}

impl FootballDataConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiFootballConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_api_football_delay_ms")]
    pub request_delay_ms: u64,
    /// Loaded from `API_FOOTBALL_KEY` at runtime, never from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_api_football_delay_ms() -> u64 {
    250
}

impl Default for ApiFootballConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            request_delay_ms: default_api_football_delay_ms(),
            api_key: None,
        }
    }
}

impl ApiFootballConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsApiConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_odds_api_delay_ms")]
    pub request_delay_ms: u64,
    /// Loaded from `ODDS_API_KEY` at runtime, never from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

fn default_odds_api_delay_ms() -> u64 {
    500
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            request_delay_ms: default_odds_api_delay_ms(),
            api_key: None,
        }
    }
}

impl OddsApiConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;

        config.sources.football_data.api_key = std::env::var("FOOTBALL_DATA_API_KEY").ok();
        config.sources.api_football.api_key = std::env::var("API_FOOTBALL_KEY").ok();
        config.sources.odds_api.api_key = std::env::var("ODDS_API_KEY").ok();

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "database.url",
            });
        }
        if self.logging.level.is_empty() {
            return Err(ConfigError::MissingField {
                field: "logging.level",
            });
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: format!("expected 'pretty' or 'json', got '{other}'"),
            }),
        }
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}
