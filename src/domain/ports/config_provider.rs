//! Key/value configuration port

use crate::domain::models::DatabaseConfig;

/// Lookup keys understood by connection-settings resolution
pub mod keys {
    /// Database host
    pub const DB_HOST: &str = "DB_HOST";
    /// Database port
    pub const DB_PORT: &str = "DB_PORT";
    /// Database user
    pub const DB_USER: &str = "DB_USER";
    /// Database name
    pub const DB_NAME: &str = "DB_NAME";
    /// Region used to sign IAM tokens
    pub const AWS_REGION: &str = "AWS_REGION";
}

/// Port for key/value configuration used to fill in unset source parameters
///
/// Injected into source construction instead of reading process-wide state
/// directly, so sources stay testable without touching the environment.
pub trait ConfigProvider: Send + Sync {
    /// Returns the value for `key`, or `None` when it is unset
    fn get(&self, key: &str) -> Option<String>;
}

impl ConfigProvider for DatabaseConfig {
    fn get(&self, key: &str) -> Option<String> {
        match key {
            keys::DB_HOST => self.host.clone(),
            keys::DB_PORT => self.port.map(|port| port.to_string()),
            keys::DB_USER => self.username.clone(),
            keys::DB_NAME => self.database.clone(),
            keys::AWS_REGION => self.region.clone(),
            _ => None,
        }
    }
}
