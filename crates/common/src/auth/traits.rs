//! Traits for OAuth operations and token change notification
//!
//! `OAuthClientTrait` abstracts the token endpoint so the token manager can
//! be driven by a mock in tests. `TokenRefreshHandler` is the hook callers
//! use to persist freshly issued tokens.

use async_trait::async_trait;

use super::client::OAuthClientError;
use super::types::TokenSet;

/// Trait for OAuth client operations
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Build the authorization URL for the authorization-code flow
    ///
    /// # Returns
    /// Tuple of (authorization_url, state). The state is remembered so the
    /// matching code can be validated later.
    ///
    /// # Errors
    /// Returns `ConfigError` when no redirect URI is configured
    async fn generate_authorization_url(&self) -> Result<(String, String), OAuthClientError>;

    /// Exchange an authorization code for tokens after validating `state`
    /// against the one issued by [`generate_authorization_url`]
    ///
    /// # Errors
    /// Returns `StateMismatch` without contacting the token endpoint when the
    /// states differ or no authorization is pending
    ///
    /// [`generate_authorization_url`]: OAuthClientTrait::generate_authorization_url
    async fn exchange_code_for_tokens(
        &self,
        code: &str,
        state: &str,
    ) -> Result<TokenSet, OAuthClientError>;

    /// Exchange an authorization code for tokens with no state check
    ///
    /// # Errors
    /// Returns error if the token endpoint rejects the code
    async fn exchange_code(&self, code: &str) -> Result<TokenSet, OAuthClientError>;

    /// Obtain an application token with the client-credentials grant
    ///
    /// # Errors
    /// Returns error if the token endpoint rejects the credentials
    async fn client_credentials_token(&self) -> Result<TokenSet, OAuthClientError>;

    /// Refresh an access token with the refresh-token grant
    ///
    /// # Errors
    /// Returns error if the refresh token is invalid or revoked
    async fn refresh_access_token(&self, refresh_token: &str)
        -> Result<TokenSet, OAuthClientError>;

    /// Configured redirect URI, if the authorization-code flow is enabled
    fn redirect_uri(&self) -> Option<&str>;
}

/// Receives every token the session obtains
///
/// Implemented for any `Fn(&TokenSet) + Send + Sync`, so a closure works.
pub trait TokenRefreshHandler: Send + Sync {
    fn on_token_refresh(&self, tokens: &TokenSet);
}

impl<F> TokenRefreshHandler for F
where
    F: Fn(&TokenSet) + Send + Sync,
{
    fn on_token_refresh(&self, tokens: &TokenSet) {
        self(tokens);
    }
}
