//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading
//! - Environment variable overrides
//! - Configuration validation
//! - `ConfigProvider` adapters for source construction

pub mod loader;
pub mod providers;

pub use loader::{ConfigError, ConfigLoader};
pub use providers::{EnvConfigProvider, MapConfigProvider};
