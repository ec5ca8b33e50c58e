//! Client configuration structures

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{
    API_PATH_PREFIX, AUTHORIZE_PATH, DEFAULT_API_VERSION, DEFAULT_BASE_URL,
    DEFAULT_REFRESH_THRESHOLD_SECS, DEFAULT_TIMEOUT_SECS, MAX_REFRESH_THRESHOLD_SECS, TOKEN_PATH,
};
use crate::errors::{PokitDokError, Result};

/// Settings for a PokitDok client session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// OAuth2 client id issued by the platform
    pub client_id: String,

    /// OAuth2 client secret issued by the platform
    pub client_secret: String,

    /// Scheme + host of the platform (no trailing slash required)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Versioned API path segment, e.g. `v4`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Redirect URI registered for the authorization-code flow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,

    /// Scopes requested in the authorization-code flow
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Refresh expired tokens transparently before a request
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,

    /// Treat tokens as expired this many seconds early
    #[serde(default = "default_refresh_threshold")]
    pub refresh_threshold_seconds: i64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

const fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_auto_refresh() -> bool {
    true
}

const fn default_refresh_threshold() -> i64 {
    DEFAULT_REFRESH_THRESHOLD_SECS
}

impl ClientConfig {
    /// Create a configuration with platform defaults for everything except
    /// the credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: default_base_url(),
            api_version: default_api_version(),
            redirect_uri: None,
            scopes: Vec::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            auto_refresh: true,
            refresh_threshold_seconds: DEFAULT_REFRESH_THRESHOLD_SECS,
        }
    }

    /// Override the platform base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the API version segment.
    #[must_use]
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Configure the authorization-code flow.
    #[must_use]
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Scopes requested during authorization.
    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_auto_refresh(mut self, enabled: bool) -> Self {
        self.auto_refresh = enabled;
        self
    }

    #[must_use]
    pub fn with_refresh_threshold_seconds(mut self, seconds: i64) -> Self {
        self.refresh_threshold_seconds = seconds;
        self
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Prefix for every resource path, e.g. `https://host/api/v4`.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        format!(
            "{}{}/{}",
            self.normalized_base_url(),
            API_PATH_PREFIX,
            self.api_version.trim_matches('/')
        )
    }

    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}{}", self.normalized_base_url(), TOKEN_PATH)
    }

    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!("{}{}", self.normalized_base_url(), AUTHORIZE_PATH)
    }

    /// Check the configuration before any network activity.
    ///
    /// # Errors
    /// Returns `PokitDokError::Config` when credentials are empty, the base
    /// URL is not an absolute http(s) URL, the API version is empty, the
    /// timeout is zero or the refresh threshold is outside
    /// `0..=MAX_REFRESH_THRESHOLD_SECS`.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(PokitDokError::Config("client_id must not be empty".into()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(PokitDokError::Config("client_secret must not be empty".into()));
        }

        let parsed = Url::parse(&self.base_url).map_err(|e| {
            PokitDokError::Config(format!("invalid base_url {}: {e}", self.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PokitDokError::Config(format!(
                "base_url must use http or https, got {}",
                parsed.scheme()
            )));
        }

        if self.api_version.trim_matches('/').is_empty() {
            return Err(PokitDokError::Config("api_version must not be empty".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(PokitDokError::Config("timeout_seconds must be greater than zero".into()));
        }
        if !(0..=MAX_REFRESH_THRESHOLD_SECS).contains(&self.refresh_threshold_seconds) {
            return Err(PokitDokError::Config(format!(
                "refresh_threshold_seconds must be within 0..={MAX_REFRESH_THRESHOLD_SECS}, got {}",
                self.refresh_threshold_seconds
            )));
        }

        if let Some(redirect_uri) = &self.redirect_uri {
            Url::parse(redirect_uri).map_err(|e| {
                PokitDokError::Config(format!("invalid redirect_uri {redirect_uri}: {e}"))
            })?;
        }

        Ok(())
    }
}
