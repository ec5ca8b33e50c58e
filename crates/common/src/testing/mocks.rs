//! Mock implementations of the auth traits
//!
//! `MockOAuthClient` issues tokens without network calls and counts every
//! grant it serves, so tests can assert how often the session went back to
//! the token endpoint.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{OAuthClientError, OAuthClientTrait, TokenSet};

/// Mock OAuth client that simulates the platform's grants.
///
/// Every issued access token is unique (`<grant>_token_<n>`). Lifetimes
/// default to one hour and can be changed per grant type, e.g. to hand out
/// an already-expired client-credentials token.
#[derive(Clone, Debug)]
pub struct MockOAuthClient {
    client_credentials_calls: Arc<AtomicUsize>,
    exchange_calls: Arc<AtomicUsize>,
    refresh_calls: Arc<AtomicUsize>,
    issued: Arc<AtomicUsize>,
    initial_expires_in: Arc<AtomicI64>,
    refreshed_expires_in: Arc<AtomicI64>,
    issue_refresh_token: Arc<AtomicBool>,
    should_fail: Arc<AtomicBool>,
    latency_ms: Arc<AtomicU64>,
    redirect_uri: Option<String>,
    last_refresh_token: Arc<Mutex<Option<String>>>,
}

impl MockOAuthClient {
    /// Create a new mock OAuth client with default state.
    pub fn new() -> Self {
        Self {
            client_credentials_calls: Arc::new(AtomicUsize::new(0)),
            exchange_calls: Arc::new(AtomicUsize::new(0)),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
            issued: Arc::new(AtomicUsize::new(0)),
            initial_expires_in: Arc::new(AtomicI64::new(3600)),
            refreshed_expires_in: Arc::new(AtomicI64::new(3600)),
            issue_refresh_token: Arc::new(AtomicBool::new(true)),
            should_fail: Arc::new(AtomicBool::new(false)),
            latency_ms: Arc::new(AtomicU64::new(0)),
            redirect_uri: None,
            last_refresh_token: Arc::new(Mutex::new(None)),
        }
    }

    /// Enable the authorization-code flow with this redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Lifetime of tokens from the client-credentials and code grants.
    pub fn set_initial_expires_in(&self, seconds: i64) {
        self.initial_expires_in.store(seconds, Ordering::SeqCst);
    }

    /// Lifetime of tokens from the refresh grant.
    pub fn set_refreshed_expires_in(&self, seconds: i64) {
        self.refreshed_expires_in.store(seconds, Ordering::SeqCst);
    }

    /// Whether issued tokens carry a refresh token.
    pub fn set_issue_refresh_token(&self, issue: bool) {
        self.issue_refresh_token.store(issue, Ordering::SeqCst);
    }

    /// Force every grant to fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Delay every grant, to widen race windows in concurrency tests.
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(millis, Ordering::SeqCst);
    }

    #[must_use]
    pub fn client_credentials_calls(&self) -> usize {
        self.client_credentials_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    /// Refresh token presented on the most recent refresh grant.
    #[must_use]
    pub fn last_refresh_token(&self) -> Option<String> {
        self.last_refresh_token.lock().unwrap().clone()
    }

    async fn issue(
        &self,
        grant: &str,
        expires_in: &AtomicI64,
    ) -> Result<TokenSet, OAuthClientError> {
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        if self.should_fail.load(Ordering::SeqCst) {
            return Err(OAuthClientError::HttpStatus {
                status: 401,
                body: "mock grant failure".to_string(),
            });
        }

        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let refresh_token = self
            .issue_refresh_token
            .load(Ordering::SeqCst)
            .then(|| format!("{grant}_refresh_{n}"));

        Ok(TokenSet::new(
            format!("{grant}_token_{n}"),
            refresh_token,
            expires_in.load(Ordering::SeqCst),
            None,
        ))
    }
}

impl Default for MockOAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OAuthClientTrait for MockOAuthClient {
    async fn generate_authorization_url(&self) -> Result<(String, String), OAuthClientError> {
        Ok((
            "https://platform.mock/oauth2/authorize?client_id=test".to_string(),
            "mock_state_123".to_string(),
        ))
    }

    async fn exchange_code_for_tokens(
        &self,
        code: &str,
        state: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        if state != "mock_state_123" {
            return Err(OAuthClientError::StateMismatch);
        }
        self.exchange_code(code).await
    }

    async fn exchange_code(&self, _code: &str) -> Result<TokenSet, OAuthClientError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        self.issue("code", &self.initial_expires_in).await
    }

    async fn client_credentials_token(&self) -> Result<TokenSet, OAuthClientError> {
        self.client_credentials_calls.fetch_add(1, Ordering::SeqCst);
        self.issue("cc", &self.initial_expires_in).await
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_refresh_token.lock().unwrap() = Some(refresh_token.to_string());
        self.issue("refreshed", &self.refreshed_expires_in).await
    }

    fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }
}
