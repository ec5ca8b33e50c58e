//! OAuth 2.0 types and structures
//!
//! Defines the bearer token, the token endpoint response and the OAuth
//! endpoint configuration used by the PokitDok session layer.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// OAuth 2.0 bearer token with expiry metadata
///
/// - Optional refresh token (client-credentials grants don't issue one)
/// - Both `expires_in` (duration) and `expires_at` (timestamp); the timestamp
///   is authoritative once the token has been issued
/// - Serializable so callers can persist it from a refresh handler and
///   supply it again on the next connect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Access token sent as `Authorization: Bearer <token>`
    pub access_token: String,

    /// Token type (always "Bearer" for the platform)
    pub token_type: String,

    /// Access token lifetime in seconds, as issued
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC)
    pub expires_at: DateTime<Utc>,

    /// Refresh token for obtaining new access tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Granted scopes (space-separated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    /// Create a new `TokenSet` expiring `expires_in` seconds from now
    ///
    /// A zero or negative `expires_in` yields a token that is already
    /// expired.
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at: offset_from_now(expires_in),
            refresh_token,
            scope,
        }
    }

    /// `true` once the current time has reached `expires_at`
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Check if the access token is expired or will expire within the given
    /// threshold
    #[must_use]
    pub fn expires_within(&self, threshold_seconds: i64) -> bool {
        offset_from_now(threshold_seconds) >= self.expires_at
    }

    /// Seconds until expiry (negative once expired)
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }

    /// `Authorization` header value for this token
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// `now + seconds`, saturating at the bounds of `DateTime<Utc>`
fn offset_from_now(seconds: i64) -> DateTime<Utc> {
    let now = Utc::now();
    TimeDelta::try_seconds(seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .unwrap_or(if seconds > 0 { DateTime::<Utc>::MAX_UTC } else { DateTime::<Utc>::MIN_UTC })
}

/// OAuth token response from the platform's token endpoint (RFC 6749 §5.1)
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        let mut tokens = Self::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            response.scope,
        );
        tokens.token_type = response.token_type;
        tokens
    }
}

/// OAuth endpoint configuration for the platform
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret (sent with HTTP Basic authentication)
    pub client_secret: String,

    /// Full URL of the authorization endpoint
    pub authorization_endpoint: String,

    /// Full URL of the token endpoint
    pub token_endpoint: String,

    /// Redirect URI for the authorization-code flow
    pub redirect_uri: Option<String>,

    /// OAuth scopes to request
    pub scopes: Vec<String>,

    /// Timeout applied to token endpoint calls
    pub timeout: Duration,
}

impl OAuthConfig {
    /// Create a new OAuth configuration without authorization-code settings
    #[must_use]
    pub fn new(
        client_id: String,
        client_secret: String,
        authorization_endpoint: String,
        token_endpoint: String,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            authorization_endpoint,
            token_endpoint,
            redirect_uri: None,
            scopes: Vec::new(),
            timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: Option<String>) -> Self {
        self.redirect_uri = redirect_uri;
        self
    }

    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get scopes as space-separated string
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

/// OAuth error response from the token endpoint
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2).
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
