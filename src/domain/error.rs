//! Error types for credential resolution

use std::fmt;

use thiserror::Error;

/// A single failed attempt recorded while walking the source list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Name of the source that failed
    pub source_name: String,
    /// Rendered error returned by the source
    pub message: String,
}

impl SourceFailure {
    /// Records `error` as the failure of `source_name`
    pub fn new(source_name: impl Into<String>, error: &CredentialError) -> Self {
        Self {
            source_name: source_name.into(),
            message: error.to_string(),
        }
    }
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source_name, self.message)
    }
}

/// Errors produced while resolving credentials
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// A specific source could not produce a credential
    #[error("credential source '{source_name}' unavailable: {message}")]
    SourceUnavailable {
        /// Name of the failing source
        source_name: String,
        /// What went wrong
        message: String,
    },

    /// The caller cancelled the operation context
    #[error("credential resolution cancelled")]
    Cancelled,

    /// The operation context's deadline elapsed
    #[error("credential resolution deadline exceeded")]
    DeadlineExceeded,

    /// Every configured source failed, or none were configured
    #[error("no valid credential sources found ({} attempted)", .failures.len())]
    NoValidSource {
        /// One entry per attempted source, in attempt order
        failures: Vec<SourceFailure>,
    },
}

impl CredentialError {
    /// Creates a `SourceUnavailable` error
    pub fn source_unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// True for errors raised by the operation context rather than a source
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

/// Errors returned by an external token issuer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenIssueError {
    /// The issuer could not be contacted
    #[error("token issuer unreachable: {0}")]
    Unreachable(String),

    /// The issuer refused to sign the request
    #[error("token request rejected: {0}")]
    Rejected(String),
}
