//! Service layer: credential resolution orchestration

pub mod credential_manager;

pub use credential_manager::CredentialManager;
