//! First-valid credential resolution over an ordered list of sources.
//!
//! Sources are tried in declaration order and the first credential that
//! passes validation wins. Per-source failures are logged and collected;
//! cancellation or an elapsed deadline aborts the walk immediately.
//!
//! A single lock spans the whole walk, so concurrent callers queue behind
//! each other and never trigger parallel token minting. Callers that need
//! independent throughput should hold separate managers.

use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::domain::error::{CredentialError, SourceFailure};
use crate::domain::models::{Credential, ResolveContext};
use crate::domain::ports::CredentialSource;

/// Resolves credentials from the first source that succeeds
pub struct CredentialManager {
    sources: Vec<Arc<dyn CredentialSource>>,
    resolve_lock: Mutex<()>,
}

impl CredentialManager {
    /// Creates a manager over `sources`; list order is priority order
    pub fn new(sources: Vec<Arc<dyn CredentialSource>>) -> Self {
        Self {
            sources,
            resolve_lock: Mutex::new(()),
        }
    }

    /// Source names in the order they are tried
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Number of configured sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True when no source is configured; resolution then always fails
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Resolve a credential from the first source that succeeds
    ///
    /// Every call re-resolves from scratch; nothing is cached, so calling
    /// again is how a caller refreshes an expiring token.
    ///
    /// # Errors
    ///
    /// * `Cancelled` / `DeadlineExceeded` - `ctx` ended before or during the
    ///   walk (including while waiting for the lock); remaining sources are
    ///   not tried and no source is invoked if `ctx` was already done
    /// * `NoValidSource` - every source failed or the list is empty; the
    ///   per-source failures are attached in the order they occurred
    #[instrument(skip_all, fields(sources = self.sources.len()))]
    pub async fn get_first_valid(&self, ctx: &ResolveContext) -> Result<Credential, CredentialError> {
        let _guard = ctx
            .run(async { Ok(self.resolve_lock.lock().await) })
            .await?;

        let mut failures = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let name = source.name();

            let error = match ctx.run(source.get_credentials(ctx)).await {
                Ok(credential) => match credential.validate(Utc::now()) {
                    Ok(()) => {
                        debug!(source = name, key = credential.key(), "resolved credential");
                        return Ok(credential);
                    }
                    Err(invalid) => CredentialError::source_unavailable(name, invalid.to_string()),
                },
                Err(err) if err.is_cancellation() => {
                    warn!(source = name, error = %err, "credential resolution interrupted");
                    return Err(err);
                }
                Err(err) => err,
            };

            warn!(source = name, error = %error, "credential source failed");
            failures.push(SourceFailure::new(name, &error));
        }

        Err(CredentialError::NoValidSource { failures })
    }
}

impl fmt::Debug for CredentialManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialManager")
            .field("sources", &self.source_names())
            .finish_non_exhaustive()
    }
}
