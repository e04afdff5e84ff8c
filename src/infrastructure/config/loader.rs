//! Figment-based configuration loading and validation

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;
use crate::domain::ports::config_keys;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown `logging.level`
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// Unknown `logging.format`
    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    /// `resolver.timeout_secs` is zero
    #[error("Invalid resolver timeout: must be at least 1 second")]
    InvalidTimeout,

    /// `database.port` is zero
    #[error("Invalid database port: 0")]
    InvalidDatabasePort,
}

/// Default project configuration directory
pub const CONFIG_DIR: &str = ".credmanager";

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .credmanager/config.yaml
    /// 3. .credmanager/local.yaml (optional local overrides)
    /// 4. Environment variables (CREDMANAGER_* prefix, `__` separates sections)
    /// 5. Plain DB_HOST, DB_PORT, DB_USER, DB_NAME, AWS_REGION variables
    pub fn load() -> Result<Config> {
        Self::load_from_dir(CONFIG_DIR)
    }

    /// Same as [`load`](Self::load) with the YAML files read from `dir`
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Config> {
        let dir = dir.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed("CREDMANAGER_").split("__"))
            .merge(database_env())
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.resolver.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        if config.database.port == Some(0) {
            return Err(ConfigError::InvalidDatabasePort);
        }

        Ok(())
    }
}

/// Maps the conventional unprefixed database variables into `database.*`
fn database_env() -> Env {
    Env::raw()
        .only(&[
            config_keys::DB_HOST,
            config_keys::DB_PORT,
            config_keys::DB_USER,
            config_keys::DB_NAME,
            config_keys::AWS_REGION,
        ])
        .map(|key| {
            let key = key.as_str();
            let mapped = if key.eq_ignore_ascii_case(config_keys::DB_HOST) {
                "database.host"
            } else if key.eq_ignore_ascii_case(config_keys::DB_PORT) {
                "database.port"
            } else if key.eq_ignore_ascii_case(config_keys::DB_USER) {
                "database.username"
            } else if key.eq_ignore_ascii_case(config_keys::DB_NAME) {
                "database.database"
            } else {
                "database.region"
            };
            mapped.into()
        })
}
