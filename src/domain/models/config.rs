//! Configuration model loaded by [`ConfigLoader`](crate::infrastructure::config::ConfigLoader)

use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::warn;

use super::context::ResolveContext;

/// Main configuration structure for credmanager
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Credential resolution settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Fallback database connection parameters for dynamic sources
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}

/// Credential resolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResolverConfig {
    /// Upper bound on a single `get_first_valid` call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ResolverConfig {
    /// Configured timeout as a `Duration`
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Fresh context bounded by the configured timeout
    pub fn context(&self) -> ResolveContext {
        ResolveContext::with_timeout(self.timeout())
    }
}

/// Database connection parameters used when a source is built with sentinels
///
/// Every field is optional; absent fields fall through to the source
/// defaults (port 5432, region `us-west-2`). Empty strings count as absent
/// and an unusable port is dropped with a warning, matching how the
/// environment fallback treats the same values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Database host name
    #[serde(default, deserialize_with = "non_empty")]
    pub host: Option<String>,

    /// Database port
    #[serde(default, deserialize_with = "lenient_port")]
    pub port: Option<u16>,

    /// Database user
    #[serde(default, deserialize_with = "non_empty")]
    pub username: Option<String>,

    /// Database name
    #[serde(default, deserialize_with = "non_empty")]
    pub database: Option<String>,

    /// Cloud region used when signing IAM tokens
    #[serde(default, deserialize_with = "non_empty")]
    pub region: Option<String>,
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPort {
    Number(i64),
    Text(String),
}

fn lenient_port<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let port = match Option::<RawPort>::deserialize(deserializer)? {
        None => None,
        Some(RawPort::Number(number)) => u16::try_from(number).ok().or_else(|| {
            warn!(value = number, "ignoring out-of-range database port");
            None
        }),
        Some(RawPort::Text(text)) if text.trim().is_empty() => None,
        Some(RawPort::Text(text)) => text.trim().parse::<u16>().ok().or_else(|| {
            warn!(value = %text, "ignoring unparsable database port");
            None
        }),
    };
    Ok(port)
}
