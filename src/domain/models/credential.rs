//! Resolved credential value produced by a credential source
//!
//! A `Credential` is immutable once built and owned by whoever asked for it.
//! The secret itself lives in a [`SecretValue`] whose `Debug` output never
//! reveals the underlying string.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Well-known metadata keys written by the bundled sources
pub mod metadata_keys {
    /// Database host name
    pub const HOST: &str = "host";
    /// Database port, rendered as a decimal string
    pub const PORT: &str = "port";
    /// Database user
    pub const USERNAME: &str = "username";
    /// Database name
    pub const DATABASE: &str = "database";
    /// Cloud region the token was signed for
    pub const REGION: &str = "region";
    /// `static` or `dynamic`
    pub const TYPE: &str = "type";
    /// Target service, e.g. `rds_postgres`
    pub const SERVICE: &str = "service";
    /// See [`AuthMethod`](super::AuthMethod)
    pub const AUTH_METHOD: &str = "auth_method";
    /// Expiry as an RFC 3339 timestamp
    pub const EXPIRES_AT: &str = "expires_at";
    /// `host:port` the token was issued for
    pub const ENDPOINT: &str = "endpoint";
}

/// Secret material (password, token, ...) with a redacting `Debug`
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    /// Wraps a secret string
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Exposes the secret string
    ///
    /// The returned slice can be copied or logged; keep its use local.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True for an empty secret
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the secret in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretValue([REDACTED, {} bytes])", self.0.len())
    }
}

impl From<&str> for SecretValue {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How a consumer should present the secret when connecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Plain password authentication (implied when no method is recorded)
    Password,
    /// Short-lived IAM authentication token
    IamToken,
}

impl AuthMethod {
    /// Value stored under the `auth_method` metadata key
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::IamToken => "iam_token",
        }
    }
}

/// Reasons a credential handed back by a source cannot be used
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidCredential {
    /// The secret string is empty
    #[error("credential value is empty")]
    EmptyValue,

    /// The expiry is not in the future
    #[error("credential already expired at {}", .0.to_rfc3339())]
    AlreadyExpired(DateTime<Utc>),
}

/// One resolved secret plus the metadata needed to use it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    key: String,
    value: SecretValue,
    expiry: Option<DateTime<Utc>>,
    metadata: HashMap<String, String>,
}

impl Credential {
    /// Creates a credential that never expires and carries no metadata
    pub fn new(key: impl Into<String>, value: impl Into<SecretValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            expiry: None,
            metadata: HashMap::new(),
        }
    }

    /// Sets the point in time after which the value is stale
    #[must_use]
    pub fn with_expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.expiry = Some(expiry);
        self
    }

    /// Adds a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Identifier of the strategy that produced this credential
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The secret material
    pub const fn value(&self) -> &SecretValue {
        &self.value
    }

    /// `None` means the credential never expires
    pub const fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    /// All metadata attributes
    pub const fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    /// Looks up a single metadata attribute
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Auth method recorded by the source, `Password` when absent
    pub fn auth_method(&self) -> AuthMethod {
        match self.metadata_value(metadata_keys::AUTH_METHOD) {
            Some("iam_token") => AuthMethod::IamToken,
            _ => AuthMethod::Password,
        }
    }

    /// True once the expiry has passed
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Same as [`is_expired`](Self::is_expired) evaluated at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| now >= expiry)
    }

    /// True when the credential expires within `window` from now
    ///
    /// Callers use this to re-resolve slightly ahead of the actual expiry.
    pub fn expires_within(&self, window: Duration) -> bool {
        self.expiry
            .is_some_and(|expiry| expiry - Utc::now() <= window)
    }

    /// Remaining validity, `None` for credentials that never expire
    pub fn time_until_expiry(&self) -> Option<Duration> {
        self.expiry.map(|expiry| expiry - Utc::now())
    }

    /// Checks the invariants every successfully resolved credential must hold
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), InvalidCredential> {
        if self.value.is_empty() {
            return Err(InvalidCredential::EmptyValue);
        }
        if let Some(expiry) = self.expiry {
            if expiry <= now {
                return Err(InvalidCredential::AlreadyExpired(expiry));
            }
        }
        Ok(())
    }
}
