//! Infrastructure layer
//!
//! Adapters implementing the domain ports:
//! - Credential sources (static password, IAM token)
//! - Configuration loading and fallback providers
//! - Logging setup

pub mod config;
pub mod logging;
pub mod sources;
