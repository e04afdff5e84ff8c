//! External IAM token signing port

use async_trait::async_trait;

use crate::domain::error::TokenIssueError;

/// Request for a short-lived database authentication token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequest {
    /// `host:port` of the database instance
    pub endpoint: String,
    /// Cloud region the instance lives in
    pub region: String,
    /// Database user the token authenticates as
    pub username: String,
}

/// Port for the external signing service that mints IAM database tokens
///
/// Implementations hold whatever ambient identity they need (instance
/// role, web identity, static keys) and return a signed, time-boxed token
/// string. They must not retry internally; failures are surfaced to the
/// calling source.
#[async_trait]
pub trait AuthTokenIssuer: Send + Sync {
    /// Signs a token for `request`
    async fn issue_token(&self, request: &TokenRequest) -> Result<String, TokenIssueError>;
}
