//! Token manager with refresh-on-expiry
//!
//! Owns the session's bearer token:
//! - initial acquisition (client credentials, authorization code, or a
//!   caller-supplied token)
//! - expiry checks with an optional early-refresh threshold
//! - refresh serialized behind a lock so concurrent callers trigger one
//!   refresh between them
//! - notification of a registered [`TokenRefreshHandler`]

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::client::OAuthClientError;
use super::traits::{OAuthClientTrait, TokenRefreshHandler};
use super::types::TokenSet;

/// Error type for token manager operations
#[derive(Debug)]
pub enum TokenManagerError {
    /// OAuth operation failed
    OAuthError(OAuthClientError),

    /// No tokens available (not authenticated)
    NotAuthenticated,

    /// Token is expired and automatic refresh is disabled
    TokenExpired,
}

impl std::fmt::Display for TokenManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuthError(e) => write!(f, "OAuth error: {e}"),
            Self::NotAuthenticated => write!(f, "Not authenticated (no tokens)"),
            Self::TokenExpired => write!(f, "Access token expired and auto refresh is disabled"),
        }
    }
}

impl std::error::Error for TokenManagerError {}

impl From<OAuthClientError> for TokenManagerError {
    fn from(err: OAuthClientError) -> Self {
        Self::OAuthError(err)
    }
}

/// Token manager with refresh-on-expiry
///
/// Cheap to share behind `Arc`: the token sits in an async `RwLock`, and a
/// separate `Mutex` serializes refreshes.
pub struct TokenManager<C: OAuthClientTrait + 'static> {
    oauth_client: Arc<C>,
    current_tokens: Arc<RwLock<Option<TokenSet>>>,
    refresh_lock: Mutex<()>,
    refresh_threshold_seconds: i64,
    auto_refresh: bool,
    refresh_handler: Option<Arc<dyn TokenRefreshHandler>>,
}

impl<C: OAuthClientTrait + 'static> TokenManager<C> {
    /// Create a new token manager
    ///
    /// # Arguments
    /// * `oauth_client` - OAuth client used for every grant
    /// * `refresh_threshold_seconds` - Treat tokens as expired this many
    ///   seconds early (0 refreshes exactly at expiry)
    #[must_use]
    pub fn new(oauth_client: C, refresh_threshold_seconds: i64) -> Self {
        Self {
            oauth_client: Arc::new(oauth_client),
            current_tokens: Arc::new(RwLock::new(None)),
            refresh_lock: Mutex::new(()),
            refresh_threshold_seconds,
            auto_refresh: true,
            refresh_handler: None,
        }
    }

    /// Enable or disable re-authentication when the stored token is stale
    #[must_use]
    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh = enabled;
        self
    }

    /// Register the handler notified with every newly obtained token
    #[must_use]
    pub fn with_refresh_handler(mut self, handler: Arc<dyn TokenRefreshHandler>) -> Self {
        self.refresh_handler = Some(handler);
        self
    }

    /// Underlying OAuth client
    #[must_use]
    pub fn oauth_client(&self) -> &C {
        &self.oauth_client
    }

    /// Install a token without notifying the refresh handler
    ///
    /// Used for tokens the caller already holds.
    pub async fn store_tokens(&self, tokens: TokenSet) {
        *self.current_tokens.write().await = Some(tokens);
        debug!("token installed");
    }

    /// Obtain an application token with the client-credentials grant
    ///
    /// # Errors
    /// Returns error if the token endpoint rejects the credentials
    pub async fn fetch_client_credentials(&self) -> Result<TokenSet, TokenManagerError> {
        let tokens = self.oauth_client.client_credentials_token().await?;
        info!(expires_in = tokens.expires_in, "obtained client-credentials token");
        self.install(tokens.clone()).await;
        Ok(tokens)
    }

    /// Validate `state` against the pending authorization and exchange the
    /// code
    ///
    /// # Errors
    /// Returns `OAuthError(StateMismatch)` before any token exchange when the
    /// state does not match
    pub async fn complete_authorization(
        &self,
        code: &str,
        state: &str,
    ) -> Result<TokenSet, TokenManagerError> {
        let tokens = self.oauth_client.exchange_code_for_tokens(code, state).await?;
        info!(expires_in = tokens.expires_in, "authorization code exchanged");
        self.install(tokens.clone()).await;
        Ok(tokens)
    }

    /// Exchange an authorization code whose state was already checked
    ///
    /// # Errors
    /// Returns error if the token endpoint rejects the code
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, TokenManagerError> {
        let tokens = self.oauth_client.exchange_code(code).await?;
        info!(expires_in = tokens.expires_in, "authorization code exchanged");
        self.install(tokens.clone()).await;
        Ok(tokens)
    }

    /// Get a valid access token, refreshing first when it has expired
    ///
    /// Concurrent callers that all see an expired token wait on one refresh
    /// and then share its result.
    ///
    /// # Errors
    /// - `NotAuthenticated` when no token has been obtained yet
    /// - `TokenExpired` when the token expired and auto refresh is off
    /// - `OAuthError` when the refresh itself fails
    pub async fn get_access_token(&self) -> Result<String, TokenManagerError> {
        if let Some(token) = self.fresh_access_token().await? {
            return Ok(token);
        }

        if !self.auto_refresh {
            return Err(TokenManagerError::TokenExpired);
        }

        let _guard = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited on the lock
        if let Some(token) = self.fresh_access_token().await? {
            return Ok(token);
        }

        let tokens = self.refresh_locked().await?;
        Ok(tokens.access_token)
    }

    /// Force a refresh regardless of expiry
    ///
    /// Uses the refresh-token grant when the current token carries a refresh
    /// token, otherwise re-runs the client-credentials grant.
    ///
    /// # Errors
    /// Returns `NotAuthenticated` for an authorization-code session that has
    /// no token yet, or any error from the grant
    pub async fn refresh_tokens(&self) -> Result<TokenSet, TokenManagerError> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    /// Current token set (without refreshing)
    pub async fn get_tokens(&self) -> Option<TokenSet> {
        self.current_tokens.read().await.clone()
    }

    /// Check if a token has been obtained
    pub async fn is_authenticated(&self) -> bool {
        self.current_tokens.read().await.is_some()
    }

    /// `true` when the current token is past expiry (less the threshold)
    ///
    /// A session without a token is not considered expired.
    pub async fn is_expired(&self) -> bool {
        let tokens = self.current_tokens.read().await;
        tokens.as_ref().is_some_and(|t| t.expires_within(self.refresh_threshold_seconds))
    }

    /// Drop the current token
    pub async fn clear_tokens(&self) {
        *self.current_tokens.write().await = None;
        info!("tokens cleared");
    }

    /// Get the refresh threshold in seconds
    #[must_use]
    pub fn refresh_threshold(&self) -> i64 {
        self.refresh_threshold_seconds
    }

    /// Whether stale tokens are renewed before use
    #[must_use]
    pub fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    async fn fresh_access_token(&self) -> Result<Option<String>, TokenManagerError> {
        let tokens = self.current_tokens.read().await;
        match tokens.as_ref() {
            None => Err(TokenManagerError::NotAuthenticated),
            Some(t) if t.expires_within(self.refresh_threshold_seconds) => Ok(None),
            Some(t) => Ok(Some(t.access_token.clone())),
        }
    }

    /// Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> Result<TokenSet, TokenManagerError> {
        let current = self.current_tokens.read().await.clone();

        let result = match current.as_ref().and_then(|t| t.refresh_token.as_deref()) {
            Some(refresh_token) => {
                debug!("refreshing with refresh-token grant");
                self.oauth_client.refresh_access_token(refresh_token).await
            }
            None if current.is_none() && self.oauth_client.redirect_uri().is_some() => {
                return Err(TokenManagerError::NotAuthenticated);
            }
            None => {
                debug!("refreshing with client-credentials grant");
                self.oauth_client.client_credentials_token().await
            }
        };

        let mut tokens = match result {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(error = %e, "token refresh failed");
                return Err(e.into());
            }
        };

        // Refresh grants may omit the refresh token; keep the one we had
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = current.and_then(|t| t.refresh_token);
        }

        info!(expires_in = tokens.expires_in, "access token refreshed");
        self.install(tokens.clone()).await;
        Ok(tokens)
    }

    async fn install(&self, tokens: TokenSet) {
        *self.current_tokens.write().await = Some(tokens.clone());
        if let Some(handler) = &self.refresh_handler {
            handler.on_token_refresh(&tokens);
        }
    }
}
