//! Connection target resolution for RDS sources

use tracing::warn;

use crate::domain::ports::{config_keys, ConfigProvider};

/// Default PostgreSQL port
pub const DEFAULT_PORT: u16 = 5432;

/// Region used for token signing when nothing else is configured
pub const DEFAULT_REGION: &str = "us-west-2";

/// Connection target of an RDS PostgreSQL instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RdsConnectionSettings {
    /// Database host name
    pub host: String,
    /// Database port
    pub port: u16,
    /// Database user the credential is for
    pub username: String,
    /// Database name
    pub database: String,
    /// Region used when signing tokens
    pub region: String,
}

impl RdsConnectionSettings {
    /// Resolve settings from explicit arguments with a configuration fallback
    ///
    /// Empty strings and a zero port are sentinels meaning "not given";
    /// those fields are looked up in `provider` (`DB_HOST`, `DB_PORT`,
    /// `DB_USER`, `DB_NAME`, `AWS_REGION`). Port and region then fall back
    /// to [`DEFAULT_PORT`] and [`DEFAULT_REGION`]. Host, username and
    /// database stay empty when nothing supplies them.
    pub fn resolve(
        host: &str,
        port: u16,
        username: &str,
        database: &str,
        region: &str,
        provider: &dyn ConfigProvider,
    ) -> Self {
        let port = if port == 0 {
            provider
                .get(config_keys::DB_PORT)
                .and_then(|raw| parse_port(&raw))
                .unwrap_or(DEFAULT_PORT)
        } else {
            port
        };

        let region = or_lookup(region, provider, config_keys::AWS_REGION)
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        Self {
            host: or_lookup(host, provider, config_keys::DB_HOST).unwrap_or_default(),
            port,
            username: or_lookup(username, provider, config_keys::DB_USER).unwrap_or_default(),
            database: or_lookup(database, provider, config_keys::DB_NAME).unwrap_or_default(),
            region,
        }
    }

    /// Resolve every field from `provider` and the defaults
    pub fn from_provider(provider: &dyn ConfigProvider) -> Self {
        Self::resolve("", 0, "", "", "", provider)
    }

    /// `host:port` endpoint handed to the token issuer
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn or_lookup(explicit: &str, provider: &dyn ConfigProvider, key: &str) -> Option<String> {
    if explicit.is_empty() {
        provider.get(key).filter(|value| !value.is_empty())
    } else {
        Some(explicit.to_string())
    }
}

fn parse_port(raw: &str) -> Option<u16> {
    match raw.trim().parse::<u16>() {
        Ok(0) => None,
        Ok(port) => Some(port),
        Err(_) => {
            warn!(value = raw, "ignoring unparsable {}", config_keys::DB_PORT);
            None
        }
    }
}
