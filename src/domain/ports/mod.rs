//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that infrastructure adapters implement:
//! - CredentialSource: produces a credential on demand
//! - AuthTokenIssuer: external signing service for IAM tokens
//! - ConfigProvider: key/value fallback for unset connection parameters

pub mod config_provider;
pub mod credential_source;
pub mod token_issuer;

pub use config_provider::{keys as config_keys, ConfigProvider};
pub use credential_source::CredentialSource;
pub use token_issuer::{AuthTokenIssuer, TokenRequest};
