//! credmanager - first-valid database credential resolution
//!
//! Resolves database connection credentials from an ordered list of
//! pluggable sources and returns the first one that succeeds. Sources
//! either hand out a fixed password or mint a short-lived IAM token per
//! call; callers refresh simply by resolving again.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): credential model, context, errors and ports
//! - **Service Layer** (`services`): the `CredentialManager`
//! - **Infrastructure Layer** (`infrastructure`): sources, configuration, logging
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use credmanager::{CredentialManager, CredentialSource, ResolveContext, StaticRdsSource};
//!
//! # async fn example() -> Result<(), credmanager::CredentialError> {
//! let sources: Vec<Arc<dyn CredentialSource>> = vec![Arc::new(StaticRdsSource::new(
//!     "localhost", 5432, "app", "password", "app_db",
//! ))];
//! let manager = CredentialManager::new(sources);
//!
//! let ctx = ResolveContext::with_timeout(std::time::Duration::from_secs(5));
//! let credential = manager.get_first_valid(&ctx).await?;
//! assert_eq!(credential.key(), "rds_postgres");
//! # Ok(())
//! # }
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    AuthMethod, Config, Credential, DatabaseConfig, ResolveContext, ResolverConfig, SecretValue,
};
pub use domain::ports::{AuthTokenIssuer, ConfigProvider, CredentialSource, TokenRequest};
pub use domain::{CredentialError, SourceFailure, TokenIssueError};
pub use infrastructure::config::{ConfigError, ConfigLoader, EnvConfigProvider, MapConfigProvider};
pub use infrastructure::sources::{DynamicRdsSource, RdsConnectionSettings, StaticRdsSource};
pub use services::CredentialManager;
