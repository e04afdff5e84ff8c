//! Common test utilities for integration tests
//!
//! Provides spy credential sources and fake token issuers shared across
//! integration test files.

#![allow(dead_code)]

use async_trait::async_trait;
use credmanager::{
    AuthTokenIssuer, Credential, CredentialError, CredentialSource, ResolveContext,
    TokenIssueError, TokenRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

/// Shared, ordered record of source activity
pub type CallLog = Arc<StdMutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(StdMutex::new(Vec::new()))
}

pub fn entries(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

enum Outcome {
    Succeed(String),
    Fail,
}

/// Credential source that records every invocation
pub struct SpySource {
    name: String,
    outcome: Outcome,
    delay: Option<Duration>,
    log: Option<CallLog>,
    calls: AtomicUsize,
}

impl SpySource {
    pub fn succeeding(name: &str, value: &str) -> Self {
        Self::with_outcome(name, Outcome::Succeed(value.to_string()))
    }

    pub fn failing(name: &str) -> Self {
        Self::with_outcome(name, Outcome::Fail)
    }

    fn with_outcome(name: &str, outcome: Outcome) -> Self {
        Self {
            name: name.to_string(),
            outcome,
            delay: None,
            log: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep for `delay` inside every call (respecting the context)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Append `<name>:start` / `<name>:end` to `log` on every call
    pub fn logging_to(mut self, log: &CallLog) -> Self {
        self.log = Some(Arc::clone(log));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self, event: &str) {
        if let Some(log) = &self.log {
            log.lock().unwrap().push(format!("{}:{event}", self.name));
        }
    }
}

#[async_trait]
impl CredentialSource for SpySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_credentials(&self, ctx: &ResolveContext) -> Result<Credential, CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.record("start");

        if let Some(delay) = self.delay {
            ctx.run(async {
                tokio::time::sleep(delay).await;
                Ok(())
            })
            .await?;
        }

        self.record("end");
        match &self.outcome {
            Outcome::Succeed(value) => Ok(Credential::new(self.name.as_str(), value.as_str())),
            Outcome::Fail => Err(CredentialError::source_unavailable(
                self.name.as_str(),
                "simulated outage",
            )),
        }
    }
}

/// Erase spy types into the manager's source list
pub fn as_sources(spies: &[Arc<SpySource>]) -> Vec<Arc<dyn CredentialSource>> {
    spies
        .iter()
        .map(|spy| Arc::clone(spy) as Arc<dyn CredentialSource>)
        .collect()
}

/// Token issuer returning a presigned-looking token per request
#[derive(Default)]
pub struct FakeTokenIssuer {
    issued: AtomicUsize,
}

impl FakeTokenIssuer {
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthTokenIssuer for FakeTokenIssuer {
    async fn issue_token(&self, request: &TokenRequest) -> Result<String, TokenIssueError> {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "{}/?Action=connect&DBUser={}&X-Amz-Date=20240101T000000Z&X-Amz-Expires=900&X-Amz-Signature={n:064x}",
            request.endpoint, request.username
        ))
    }
}

/// Token issuer that can never be reached
pub struct UnreachableTokenIssuer;

#[async_trait]
impl AuthTokenIssuer for UnreachableTokenIssuer {
    async fn issue_token(&self, _request: &TokenRequest) -> Result<String, TokenIssueError> {
        Err(TokenIssueError::Unreachable(
            "no identity credentials available".to_string(),
        ))
    }
}
