//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate, later layers winning:
//! 1. Built-in defaults
//! 2. `<user config dir>/odonto-monitor/config.{toml,json,yaml}` (optional)
//! 3. `./odonto-monitor.{toml,json,yaml}` (optional), or the file named by
//!    `ODONTO_CONFIG` (required when set)
//! 4. `ODONTO__SECTION__KEY` environment variables
//!
//! `DATABASE_URL` is honoured on top of everything for compatibility with
//! existing deployments.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::infrastructure::http_client::DEFAULT_USER_AGENT;
use crate::infrastructure::parsing::default_price_selectors;

pub const APP_NAME: &str = "odonto-monitor";
const ENV_PREFIX: &str = "ODONTO";
const CONFIG_PATH_VAR: &str = "ODONTO_CONFIG";
const DATABASE_URL_VARS: [&str; 3] = ["DATABASE_URL", "database_url", "Database_Url"];
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Default values, kept in one place so docs and tests agree.
pub mod defaults {
    pub const SERVER_HOST: &str = "0.0.0.0";
    pub const SERVER_PORT: u16 = 8000;
    pub const DATABASE_URL: &str = "sqlite://odonto-monitor.db";
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;
    pub const SCRAPER_TIMEOUT_SECONDS: u64 = 20;
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_DIR: &str = "logs";
    pub const LOG_MAX_FILES: u32 = 7;
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

impl ConfigError {
    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub scraper: ScraperConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx SQLite URL, e.g. `sqlite://odonto-monitor.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Per-request timeout, 1 to 120 seconds
    pub timeout_seconds: u64,
    pub user_agent: String,
    /// Ordered CSS selectors tried before the whole-page fallback
    pub price_selectors: Vec<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    pub console_output: bool,

    /// Write a daily rolling file under `log_dir`
    pub file_output: bool,

    pub log_dir: PathBuf,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DATABASE_URL.to_string(),
            max_connections: defaults::DATABASE_MAX_CONNECTIONS,
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: defaults::SCRAPER_TIMEOUT_SECONDS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            price_selectors: default_price_selectors(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            max_files: defaults::LOG_MAX_FILES,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load from every source, honouring `ODONTO_CONFIG` and `DATABASE_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(user_file) = Self::user_config_file() {
            builder = builder.add_source(File::from(user_file).required(false));
        }
        builder = match &explicit {
            Some(path) => {
                info!("Using configuration file from {}: {}", CONFIG_PATH_VAR, path.display());
                builder.add_source(File::from(path.as_path()).required(true))
            }
            None => builder.add_source(File::with_name(APP_NAME).required(false)),
        };
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let mut app_config: Self = builder.build()?.try_deserialize()?;
        app_config.apply_database_url_override(|key| std::env::var(key).ok());
        app_config.validate()?;
        Ok(app_config)
    }

    /// Defaults overlaid with a single file, no environment. Used by tools
    /// and tests that need a reproducible configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let app_config: Self = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// `<config dir>/odonto-monitor/config`, extension resolved by `config`.
    fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config"))
    }

    /// Replace `database.url` with the first non-blank value `lookup` finds
    /// among the `DATABASE_URL` spellings.
    pub fn apply_database_url_override<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let found = DATABASE_URL_VARS
            .iter()
            .find_map(|key| lookup(key).filter(|value| !value.trim().is_empty()));
        if let Some(url) = found {
            info!("Database URL taken from environment");
            self.database.url = url;
        }
    }

    /// Reject values the service cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid("server.host", "must not be empty"));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::invalid("database.url", "must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::invalid("database.max_connections", "must be greater than 0"));
        }
        if !(1..=120).contains(&self.scraper.timeout_seconds) {
            return Err(ConfigError::invalid(
                "scraper.timeout_seconds",
                format!("{} is outside 1..=120", self.scraper.timeout_seconds),
            ));
        }
        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("scraper.user_agent", "must not be empty"));
        }
        if self.scraper.price_selectors.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::invalid("scraper.price_selectors", "at least one selector is required"));
        }
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("'{}' is not one of {}", self.logging.level, LOG_LEVELS.join(", ")),
            ));
        }
        if self.logging.file_output && self.logging.max_files == 0 {
            warn!("logging.max_files is 0; old log files will not be pruned");
        }
        Ok(())
    }
}
