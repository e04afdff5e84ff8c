//! IAM token source for RDS PostgreSQL
//!
//! Mints a short-lived authentication token on every call by delegating to
//! an [`AuthTokenIssuer`]. The issuer owns the ambient cloud identity
//! (instance role, service account); this source only describes the
//! target and stamps the validity window.

use async_trait::async_trait;
use chrono::{Duration, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::debug;

use super::settings::RdsConnectionSettings;
use crate::domain::error::CredentialError;
use crate::domain::models::{metadata_keys, AuthMethod, Credential, ResolveContext};
use crate::domain::ports::{AuthTokenIssuer, ConfigProvider, CredentialSource, TokenRequest};

/// RDS IAM auth tokens are accepted for 15 minutes after signing
pub const TOKEN_VALIDITY_MINUTES: i64 = 15;

/// Credential source generating temporary RDS IAM authentication tokens
pub struct DynamicRdsSource {
    settings: RdsConnectionSettings,
    issuer: Arc<dyn AuthTokenIssuer>,
}

impl DynamicRdsSource {
    /// Source name, also used as the credential key
    pub const NAME: &'static str = "dynamic_rds_postgres";

    /// Creates a source minting tokens for `settings` through `issuer`
    pub fn new(settings: RdsConnectionSettings, issuer: Arc<dyn AuthTokenIssuer>) -> Self {
        Self { settings, issuer }
    }

    /// Builds the source from explicit arguments, filling empty/zero ones from `provider`
    pub fn from_provider(
        host: &str,
        port: u16,
        username: &str,
        database: &str,
        region: &str,
        provider: &dyn ConfigProvider,
        issuer: Arc<dyn AuthTokenIssuer>,
    ) -> Self {
        let settings = RdsConnectionSettings::resolve(host, port, username, database, region, provider);
        Self::new(settings, issuer)
    }

    /// Resolved connection target
    pub const fn settings(&self) -> &RdsConnectionSettings {
        &self.settings
    }

    /// How long an issued token is accepted
    pub fn token_validity() -> Duration {
        Duration::minutes(TOKEN_VALIDITY_MINUTES)
    }

    /// Forces a new token to be minted
    ///
    /// Tokens are never cached, so this is the same as `get_credentials`.
    pub async fn refresh_credentials(&self, ctx: &ResolveContext) -> Result<Credential, CredentialError> {
        self.get_credentials(ctx).await
    }

    fn unavailable(message: impl Into<String>) -> CredentialError {
        CredentialError::source_unavailable(Self::NAME, message)
    }
}

impl std::fmt::Debug for DynamicRdsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicRdsSource")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialSource for DynamicRdsSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn get_credentials(&self, ctx: &ResolveContext) -> Result<Credential, CredentialError> {
        ctx.check()?;

        let settings = &self.settings;
        if settings.host.is_empty() {
            return Err(Self::unavailable("no database host configured"));
        }
        if settings.username.is_empty() {
            return Err(Self::unavailable("no database user configured"));
        }

        let endpoint = settings.endpoint();
        let request = TokenRequest {
            endpoint: endpoint.clone(),
            region: settings.region.clone(),
            username: settings.username.clone(),
        };

        let issued_at = Utc::now();
        let token = ctx
            .run(async {
                self.issuer
                    .issue_token(&request)
                    .await
                    .map_err(|e| Self::unavailable(format!("failed to generate RDS auth token: {e}")))
            })
            .await?;

        if token.is_empty() {
            return Err(Self::unavailable("token issuer returned an empty token"));
        }

        let expiry = issued_at + Self::token_validity();
        debug!(endpoint = %endpoint, region = %settings.region, expires_at = %expiry, "issued RDS auth token");

        Ok(Credential::new(Self::NAME, token)
            .with_expiry(expiry)
            .with_metadata(metadata_keys::HOST, settings.host.as_str())
            .with_metadata(metadata_keys::PORT, settings.port.to_string())
            .with_metadata(metadata_keys::USERNAME, settings.username.as_str())
            .with_metadata(metadata_keys::DATABASE, settings.database.as_str())
            .with_metadata(metadata_keys::REGION, settings.region.as_str())
            .with_metadata(metadata_keys::TYPE, "dynamic")
            .with_metadata(metadata_keys::SERVICE, "rds_postgres")
            .with_metadata(metadata_keys::AUTH_METHOD, AuthMethod::IamToken.as_str())
            .with_metadata(
                metadata_keys::EXPIRES_AT,
                expiry.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .with_metadata(metadata_keys::ENDPOINT, endpoint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::TokenIssueError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingIssuer {
        requests: Mutex<Vec<TokenRequest>>,
        counter: AtomicUsize,
        reject: bool,
    }

    #[async_trait]
    impl AuthTokenIssuer for RecordingIssuer {
        async fn issue_token(&self, request: &TokenRequest) -> Result<String, TokenIssueError> {
            self.requests.lock().unwrap().push(request.clone());
            if self.reject {
                return Err(TokenIssueError::Rejected("AccessDenied".to_string()));
            }
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{}/?Action=connect&DBUser={}&X-Amz-Signature=sig{n}", request.endpoint, request.username))
        }
    }

    fn settings() -> RdsConnectionSettings {
        RdsConnectionSettings {
            host: "mydb.abc.us-west-2.rds.amazonaws.com".to_string(),
            port: 5432,
            username: "iam_user".to_string(),
            database: "app".to_string(),
            region: "us-west-2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_token_credential_shape() {
        let issuer = Arc::new(RecordingIssuer::default());
        let source = DynamicRdsSource::new(settings(), issuer.clone());

        let before = Utc::now();
        let cred = source.get_credentials(&ResolveContext::new()).await.unwrap();
        let after = Utc::now();

        assert_eq!(cred.key(), "dynamic_rds_postgres");
        assert!(cred.value().expose().contains("X-Amz-Signature"));
        let expiry = cred.expiry().expect("dynamic credentials expire");
        assert!(expiry >= before + Duration::minutes(15));
        assert!(expiry <= after + Duration::minutes(15));

        assert_eq!(cred.auth_method(), AuthMethod::IamToken);
        assert_eq!(cred.metadata_value("auth_method"), Some("iam_token"));
        assert_eq!(cred.metadata_value("type"), Some("dynamic"));
        assert_eq!(cred.metadata_value("region"), Some("us-west-2"));
        assert_eq!(
            cred.metadata_value("endpoint"),
            Some("mydb.abc.us-west-2.rds.amazonaws.com:5432")
        );
        assert!(cred.metadata_value("expires_at").is_some());

        let requests = issuer.requests.lock().unwrap();
        assert_eq!(
            *requests,
            vec![TokenRequest {
                endpoint: "mydb.abc.us-west-2.rds.amazonaws.com:5432".to_string(),
                region: "us-west-2".to_string(),
                username: "iam_user".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_refresh_mints_new_token() {
        let source = DynamicRdsSource::new(settings(), Arc::new(RecordingIssuer::default()));
        let ctx = ResolveContext::new();

        let first = source.get_credentials(&ctx).await.unwrap();
        let second = source.refresh_credentials(&ctx).await.unwrap();

        assert_ne!(first.value(), second.value());
    }

    #[tokio::test]
    async fn test_issuer_rejection_is_surfaced() {
        let issuer = Arc::new(RecordingIssuer {
            reject: true,
            ..Default::default()
        });
        let source = DynamicRdsSource::new(settings(), issuer.clone());

        let err = source.get_credentials(&ResolveContext::new()).await.unwrap_err();

        match err {
            CredentialError::SourceUnavailable { source_name, message } => {
                assert_eq!(source_name, "dynamic_rds_postgres");
                assert!(message.contains("AccessDenied"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(issuer.requests.lock().unwrap().len(), 1, "no internal retries");
    }

    #[tokio::test]
    async fn test_missing_host_fails_without_calling_issuer() {
        let issuer = Arc::new(RecordingIssuer::default());
        let mut incomplete = settings();
        incomplete.host.clear();
        let source = DynamicRdsSource::new(incomplete, issuer.clone());

        let err = source.get_credentials(&ResolveContext::new()).await.unwrap_err();

        assert!(matches!(err, CredentialError::SourceUnavailable { .. }));
        assert!(issuer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_context_skips_issuer() {
        let issuer = Arc::new(RecordingIssuer::default());
        let source = DynamicRdsSource::new(settings(), issuer.clone());
        let ctx = ResolveContext::new();
        ctx.cancel();

        let err = source.get_credentials(&ctx).await.unwrap_err();

        assert_eq!(err, CredentialError::Cancelled);
        assert!(issuer.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_hung_issuer_hits_deadline() {
        struct HungIssuer;

        #[async_trait]
        impl AuthTokenIssuer for HungIssuer {
            async fn issue_token(&self, _request: &TokenRequest) -> Result<String, TokenIssueError> {
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
                Ok("late".to_string())
            }
        }

        let source = DynamicRdsSource::new(settings(), Arc::new(HungIssuer));
        let ctx = ResolveContext::with_timeout(std::time::Duration::from_millis(20));

        let err = source.get_credentials(&ctx).await.unwrap_err();

        assert_eq!(err, CredentialError::DeadlineExceeded);
    }
}
