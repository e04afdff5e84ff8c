//! Credential source port

use async_trait::async_trait;

use crate::domain::error::CredentialError;
use crate::domain::models::{Credential, ResolveContext};

/// Port for a pluggable strategy that produces database credentials
///
/// Static and dynamic variants sit behind the same contract so the
/// [`CredentialManager`](crate::services::CredentialManager) can chain them
/// (try a minted token first, fall back to a fixed password) without
/// special-casing either.
///
/// # Examples
///
/// ```no_run
/// use credmanager::domain::ports::CredentialSource;
/// use credmanager::domain::models::ResolveContext;
///
/// async fn example(source: &dyn CredentialSource) {
///     let ctx = ResolveContext::with_timeout(std::time::Duration::from_secs(5));
///     match source.get_credentials(&ctx).await {
///         Ok(cred) => println!("{} produced {}", source.name(), cred.key()),
///         Err(err) => eprintln!("{} failed: {err}", source.name()),
///     }
/// }
/// ```
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// Stable identifier used in logs and failure reports
    fn name(&self) -> &str;

    /// Attempt to produce a credential
    ///
    /// Implementations must honour `ctx`: an already cancelled or expired
    /// context yields `Cancelled`/`DeadlineExceeded` instead of blocking.
    /// Repeated calls either mint a new value or return the same fixed
    /// one; they never corrupt external state.
    ///
    /// # Returns
    ///
    /// * `Ok(Credential)` - A freshly built credential owned by the caller
    /// * `Err(CredentialError::SourceUnavailable)` - The source could not produce one
    /// * `Err(CredentialError::Cancelled | DeadlineExceeded)` - The context ended
    async fn get_credentials(&self, ctx: &ResolveContext) -> Result<Credential, CredentialError>;
}
