//! OAuth 2.0 client for the platform's token endpoint
//!
//! Handles the three grants the platform issues tokens for:
//! - client credentials (application access)
//! - authorization code (user access, with CSRF state check)
//! - refresh token

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::state::{generate_state, validate_state};
use super::traits::OAuthClientTrait;
use super::types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed before a response arrived
    RequestFailed(reqwest::Error),

    /// Token endpoint answered with an RFC 6749 error body
    OAuthError(OAuthError),

    /// Token endpoint answered with a non-success status and an
    /// unrecognized body
    HttpStatus { status: u16, body: String },

    /// Returned state does not match the issued one (possible CSRF)
    ///
    /// Carries neither value so the state never reaches logs or responses.
    StateMismatch,

    /// Failed to parse response
    ParseError(String),

    /// No refresh token available
    NoRefreshToken,

    /// Invalid configuration
    ConfigError(String),
}

impl OAuthClientError {
    /// HTTP status returned by the token endpoint, when there was one
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::OAuthError(e) => write!(f, "OAuth error: {e}"),
            Self::HttpStatus { status, body } => {
                write!(f, "token endpoint returned {status}: {body}")
            }
            Self::StateMismatch => {
                write!(f, "State mismatch (CSRF): returned state does not match the issued state")
            }
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
            Self::NoRefreshToken => write!(f, "No refresh token available"),
            Self::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// OAuth 2.0 client authenticating with HTTP Basic client credentials
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
    pending_state: Arc<Mutex<Option<String>>>,
}

impl OAuthClient {
    /// Create a new OAuth client with its own HTTP client
    ///
    /// # Errors
    /// Returns `ConfigError` if the HTTP client cannot be built
    pub fn new(config: OAuthConfig) -> Result<Self, OAuthClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                OAuthClientError::ConfigError(format!("failed to build HTTP client: {e}"))
            })?;
        Ok(Self::with_http_client(config, client))
    }

    /// Create a client that shares an existing `reqwest::Client`
    #[must_use]
    pub fn with_http_client(config: OAuthConfig, client: Client) -> Self {
        Self { config, client, pending_state: Arc::new(Mutex::new(None)) }
    }

    /// Build the authorization URL and remember its state
    ///
    /// Query parameters: `response_type=code`, `client_id`, `redirect_uri`,
    /// `scope` (when scopes are configured) and `state`. Calling this again
    /// replaces the pending state.
    ///
    /// # Errors
    /// Returns `ConfigError` when no redirect URI is configured
    pub async fn generate_authorization_url(&self) -> Result<(String, String), OAuthClientError> {
        let redirect_uri = self.config.redirect_uri.as_deref().ok_or_else(|| {
            OAuthClientError::ConfigError(
                "redirect_uri is required for the authorization-code flow".to_string(),
            )
        })?;

        let state = generate_state();
        *self.pending_state.lock().await = Some(state.clone());

        let mut params = vec![
            ("response_type", "code".to_string()),
            ("client_id", self.config.client_id.clone()),
            ("redirect_uri", redirect_uri.to_string()),
        ];
        if !self.config.scopes.is_empty() {
            params.push(("scope", self.config.scope_string()));
        }
        params.push(("state", state.clone()));

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}?{}", self.config.authorization_endpoint, query_string);
        debug!(endpoint = %self.config.authorization_endpoint, "authorization url generated");

        Ok((url, state))
    }

    /// Validate `state` against the pending authorization, then exchange
    /// the code
    ///
    /// The pending state is consumed whether or not it matches, so a second
    /// attempt needs a new authorization URL.
    ///
    /// # Errors
    /// Returns `StateMismatch` without any network call when no authorization
    /// is pending or the states differ
    pub async fn exchange_code_for_tokens(
        &self,
        code: &str,
        state: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        let expected = self.pending_state.lock().await.take().unwrap_or_default();

        if expected.is_empty() || !validate_state(&expected, state) {
            warn!("authorization state mismatch, refusing code exchange");
            return Err(OAuthClientError::StateMismatch);
        }

        self.exchange_code(code).await
    }

    /// Exchange an authorization code for tokens
    ///
    /// # Errors
    /// Returns error if the token endpoint rejects the code
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet, OAuthClientError> {
        let mut form = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
        ];
        if let Some(redirect_uri) = &self.config.redirect_uri {
            form.push(("redirect_uri", redirect_uri.clone()));
        }

        self.request_token(&form).await
    }

    /// Obtain an application token with the client-credentials grant
    ///
    /// # Errors
    /// Returns error if the token endpoint rejects the credentials
    pub async fn client_credentials_token(&self) -> Result<TokenSet, OAuthClientError> {
        self.request_token(&[("grant_type", "client_credentials".to_string())]).await
    }

    /// Refresh access token using refresh token
    ///
    /// # Errors
    /// Returns `NoRefreshToken` for an empty token, otherwise any error the
    /// token endpoint reports
    pub async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        if refresh_token.is_empty() {
            return Err(OAuthClientError::NoRefreshToken);
        }

        self.request_token(&[
            ("grant_type", "refresh_token".to_string()),
            ("refresh_token", refresh_token.to_string()),
        ])
        .await
    }

    /// Get the configured redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> Option<&str> {
        self.config.redirect_uri.as_deref()
    }

    /// Get a reference to the OAuth configuration
    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    async fn request_token(&self, form: &[(&str, String)]) -> Result<TokenSet, OAuthClientError> {
        let grant = form.first().map_or("", |(_, v)| v.as_str());
        debug!(grant, endpoint = %self.config.token_endpoint, "requesting token");

        let response = self
            .client
            .post(&self.config.token_endpoint)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .timeout(self.config.timeout)
            .form(form)
            .send()
            .await?;

        parse_token_response(response).await
    }
}

async fn parse_token_response(response: Response) -> Result<TokenSet, OAuthClientError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!(status = status.as_u16(), "token endpoint rejected request");
        return Err(match serde_json::from_str::<OAuthError>(&body) {
            Ok(error) => OAuthClientError::OAuthError(error),
            Err(_) => OAuthClientError::HttpStatus { status: status.as_u16(), body },
        });
    }

    let token_response: TokenResponse =
        serde_json::from_str(&body).map_err(|e| OAuthClientError::ParseError(e.to_string()))?;

    Ok(token_response.into())
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    async fn generate_authorization_url(&self) -> Result<(String, String), OAuthClientError> {
        self.generate_authorization_url().await
    }

    async fn exchange_code_for_tokens(
        &self,
        code: &str,
        state: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        self.exchange_code_for_tokens(code, state).await
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet, OAuthClientError> {
        self.exchange_code(code).await
    }

    async fn client_credentials_token(&self) -> Result<TokenSet, OAuthClientError> {
        self.client_credentials_token().await
    }

    async fn refresh_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        self.refresh_access_token(refresh_token).await
    }

    fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri()
    }
}
