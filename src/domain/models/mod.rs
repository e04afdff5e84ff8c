//! Domain models: credentials, operation context and configuration

pub mod config;
pub mod context;
pub mod credential;

pub use config::{Config, DatabaseConfig, LoggingConfig, ResolverConfig};
pub use context::ResolveContext;
pub use credential::{metadata_keys, AuthMethod, Credential, InvalidCredential, SecretValue};
