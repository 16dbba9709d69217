// ABOUTME: Test utilities for mlrund-server, including a mock identity client.
// ABOUTME: Used in tests to simulate the identity service without real network calls.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use mlrund_core::AuthInfo;

use crate::identity::{IdentityClient, IdentityError};

/// A mock identity client with configurable responses and call counters.
///
/// By default verification fails and no dashboard URL is available, matching
/// a deployment with no identity service. Counters let tests assert that the
/// dashboard lookup happens exactly once (or not at all) per request.
#[derive(Debug, Default)]
pub struct MockIdentityClient {
    verified_session: Option<String>,
    dashboard_url: Option<String>,
    verify_calls: AtomicUsize,
    dashboard_calls: AtomicUsize,
}

impl MockIdentityClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `verify_session` succeed, returning auth info carrying `session`.
    pub fn with_verified_session(mut self, session: &str) -> Self {
        self.verified_session = Some(session.to_string());
        self
    }

    /// Make `resolve_dashboard_url` return the given base URL.
    pub fn with_dashboard_url(mut self, url: &str) -> Self {
        self.dashboard_url = Some(url.to_string());
        self
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn dashboard_calls(&self) -> usize {
        self.dashboard_calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.verify_calls.store(0, Ordering::SeqCst);
        self.dashboard_calls.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityClient for MockIdentityClient {
    async fn verify_session(&self, _session: &str) -> Result<AuthInfo, IdentityError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        match &self.verified_session {
            Some(session) => Ok(AuthInfo::from_session(session)),
            None => Err(IdentityError::Unauthorized(401)),
        }
    }

    async fn resolve_dashboard_url(
        &self,
        _auth_info: &AuthInfo,
    ) -> Result<Option<String>, IdentityError> {
        self.dashboard_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.dashboard_url.clone())
    }
}
