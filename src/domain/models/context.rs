//! Cancellation and deadline handle threaded through every resolution call

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::error::CredentialError;

/// Operation context carrying a cancellation token and an optional deadline
///
/// Cloning shares the same token: cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct ResolveContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl ResolveContext {
    /// Context that is never cancelled and has no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose deadline is `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// Context that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Wraps an existing token, e.g. one owned by a shutdown coordinator
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Replaces the deadline, keeping the earlier of the two
    #[must_use]
    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(self.deadline.map_or(deadline, |current| current.min(deadline)));
        self
    }

    /// Derived context: cancelled with its parent, cancellable on its own
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancels this context and every clone and child of it
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once `cancel` has been called here or on a parent
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Deadline, if any
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fails if the context has been cancelled or its deadline has passed
    ///
    /// Cancellation wins over an elapsed deadline.
    pub fn check(&self) -> Result<(), CredentialError> {
        if self.token.is_cancelled() {
            return Err(CredentialError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(CredentialError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Runs `fut` until it completes, the context is cancelled, or the deadline elapses
    pub async fn run<T, F>(&self, fut: F) -> Result<T, CredentialError>
    where
        F: Future<Output = Result<T, CredentialError>>,
    {
        self.check()?;

        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(CredentialError::Cancelled),
            () = expired => Err(CredentialError::DeadlineExceeded),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_passes_check() {
        let ctx = ResolveContext::new();
        assert!(ctx.check().is_ok());
        assert!(ctx.deadline().is_none());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn test_cancelled_context_fails_check() {
        let ctx = ResolveContext::new();
        ctx.cancel();
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.check(), Err(CredentialError::Cancelled));
    }

    #[tokio::test]
    async fn test_elapsed_deadline_fails_check() {
        let ctx = ResolveContext::with_deadline(Instant::now());
        assert_eq!(ctx.check(), Err(CredentialError::DeadlineExceeded));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn test_cancellation_takes_precedence_over_deadline() {
        let ctx = ResolveContext::with_deadline(Instant::now());
        ctx.cancel();
        assert_eq!(ctx.check(), Err(CredentialError::Cancelled));
    }

    #[tokio::test]
    async fn test_child_follows_parent_cancellation() {
        let parent = ResolveContext::with_timeout(Duration::from_secs(30));
        let child = parent.child();
        assert_eq!(child.deadline(), parent.deadline());

        child.cancel();
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert!(other.is_cancelled());
    }

    #[tokio::test]
    async fn test_deadline_at_keeps_earliest() {
        let now = Instant::now();
        let ctx = ResolveContext::with_deadline(now + Duration::from_secs(5))
            .deadline_at(now + Duration::from_secs(60));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_run_returns_future_output() {
        let ctx = ResolveContext::with_timeout(Duration::from_secs(5));
        let value = ctx.run(async { Ok::<_, CredentialError>(7) }).await;
        assert_eq!(value, Ok(7));
    }

    #[tokio::test]
    async fn test_run_interrupts_hung_future_on_deadline() {
        let ctx = ResolveContext::with_timeout(Duration::from_millis(20));
        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, CredentialError>(())
            })
            .await;
        assert_eq!(result, Err(CredentialError::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_run_interrupts_hung_future_on_cancel() {
        let ctx = ResolveContext::new();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = ctx
            .run(std::future::pending::<Result<(), CredentialError>>())
            .await;
        assert_eq!(result, Err(CredentialError::Cancelled));
    }

    #[tokio::test]
    async fn test_run_skips_future_when_already_cancelled() {
        let ctx = ResolveContext::new();
        ctx.cancel();
        let result = ctx.run(never_polled()).await;
        assert_eq!(result, Err(CredentialError::Cancelled));
    }

    async fn never_polled() -> Result<(), CredentialError> {
        panic!("future must not be polled")
    }
}
