//! Fixed-password source for RDS PostgreSQL

use async_trait::async_trait;

use crate::domain::error::CredentialError;
use crate::domain::models::{metadata_keys, Credential, ResolveContext};
use crate::domain::ports::CredentialSource;

/// Pre-configured password credential for an RDS PostgreSQL instance
///
/// Always yields the same credential with no expiry. Useful as the last
/// entry of a chain behind a token-minting source.
#[derive(Clone)]
pub struct StaticRdsSource {
    host: String,
    port: u16,
    username: String,
    password: String,
    database: String,
}

impl StaticRdsSource {
    /// Source name
    pub const NAME: &'static str = "static_rds_postgres";
    /// Key of every credential this source returns
    pub const KEY: &'static str = "rds_postgres";

    /// Creates a source that always returns `password`
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            database: database.into(),
        }
    }
}

impl std::fmt::Debug for StaticRdsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticRdsSource")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database", &self.database)
            .finish()
    }
}

#[async_trait]
impl CredentialSource for StaticRdsSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn get_credentials(&self, ctx: &ResolveContext) -> Result<Credential, CredentialError> {
        ctx.check()?;

        if self.password.is_empty() {
            return Err(CredentialError::source_unavailable(
                Self::NAME,
                "no password configured",
            ));
        }

        Ok(Credential::new(Self::KEY, self.password.as_str())
            .with_metadata(metadata_keys::HOST, self.host.as_str())
            .with_metadata(metadata_keys::PORT, self.port.to_string())
            .with_metadata(metadata_keys::USERNAME, self.username.as_str())
            .with_metadata(metadata_keys::DATABASE, self.database.as_str())
            .with_metadata(metadata_keys::TYPE, "static")
            .with_metadata(metadata_keys::SERVICE, "rds_postgres"))
    }
}
