//! Domain layer for credmanager
//!
//! This module contains the credential model, the error taxonomy and the
//! ports that credential sources and their collaborators implement.

pub mod error;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use error::{CredentialError, SourceFailure, TokenIssueError};
