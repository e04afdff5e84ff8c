//! Credential source adapters
//!
//! - `StaticRdsSource`: fixed password, never expires
//! - `DynamicRdsSource`: IAM token minted per call, 15 minute validity
//! - `RdsConnectionSettings`: explicit-or-configured connection target

pub mod dynamic_rds;
pub mod settings;
pub mod static_rds;

pub use dynamic_rds::{DynamicRdsSource, TOKEN_VALIDITY_MINUTES};
pub use settings::{RdsConnectionSettings, DEFAULT_PORT, DEFAULT_REGION};
pub use static_rds::StaticRdsSource;
