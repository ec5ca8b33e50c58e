use std::time::Duration;

use pokitdok_domain::constants::{user_agent, DEFAULT_TIMEOUT_SECS};
use pokitdok_domain::PokitDokError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// Thin wrapper over `reqwest::Client` with timeout and user agent applied.
///
/// Every request is sent exactly once.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, PokitDokError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Underlying reqwest client, for sharing with the OAuth layer.
    pub fn inner(&self) -> &ReqwestClient {
        &self.client
    }

    /// Per-request timeout applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute the provided request builder.
    ///
    /// Any HTTP status counts as success here; only failures without a
    /// response become errors.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, PokitDokError> {
        let request = builder.build().map_err(|err| PokitDokError::from(InfraError::from(err)))?;

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(%method, %url, %status, "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(PokitDokError::from(InfraError::from(err)))
            }
        }
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the default `pokitdok-rust/<version>` user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request.
    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `Config` if reqwest rejects the settings (e.g. TLS backend init).
    pub fn build(self) -> Result<HttpClient, PokitDokError> {
        let agent = self.user_agent.unwrap_or_else(user_agent);
        let mut builder = ReqwestClient::builder().timeout(self.timeout).user_agent(agent);

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| {
            PokitDokError::Config(format!("failed to build HTTP client: {err}"))
        })?;

        Ok(HttpClient { client, timeout: self.timeout })
    }
}
