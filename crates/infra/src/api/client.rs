//! PokitDok API client
//!
//! Owns the OAuth2 session and dispatches every platform request: obtains a
//! valid bearer token (refreshing when expired), sends the call, records the
//! HTTP status and parses the `{meta, data}` envelope. Non-2xx responses are
//! returned as envelopes, not errors.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pokitdok_common::auth::{
    validate_state, OAuthClient, OAuthClientError, OAuthConfig, TokenManager,
    TokenRefreshHandler, TokenSet,
};
use pokitdok_domain::constants::{X12_CONTENT_TYPE, X12_FORM_FIELD};
use pokitdok_domain::{ClientConfig, Envelope, Params, PokitDokError, Result, X12File};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Request payload after shaping
enum Body {
    Empty,
    Json(Value),
    Multipart(Form),
}

/// Authenticated session against the PokitDok Platform API
///
/// Shareable behind `Arc`: the token manager serializes refreshes and the
/// last status code is an atomic.
pub struct PokitDokClient {
    config: ClientConfig,
    http: HttpClient,
    tokens: TokenManager<OAuthClient>,
    api_base_url: String,
    last_status: AtomicU16,
}

impl std::fmt::Debug for PokitDokClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PokitDokClient")
            .field("client_id", &self.config.client_id)
            .field("api_base_url", &self.api_base_url)
            .field("status_code", &self.status_code())
            .finish_non_exhaustive()
    }
}

impl PokitDokClient {
    /// Create a builder for fluent configuration
    pub fn builder(config: ClientConfig) -> PokitDokClientBuilder {
        PokitDokClientBuilder::new(config)
    }

    /// Connect with the client-credentials grant
    ///
    /// `base_url` defaults to the public platform.
    ///
    /// # Errors
    ///
    /// Returns `Auth` if the platform rejects the credentials, `Network` if
    /// it cannot be reached, `Config` for invalid settings
    pub async fn connect(
        client_id: &str,
        client_secret: &str,
        base_url: Option<&str>,
    ) -> Result<Self> {
        let mut config = ClientConfig::new(client_id, client_secret);
        if let Some(base_url) = base_url {
            config = config.with_base_url(base_url);
        }
        Self::builder(config).build().await
    }

    /// Connect using a loaded configuration and no pre-existing token
    ///
    /// # Errors
    ///
    /// Same as [`connect`](Self::connect)
    pub async fn from_config(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build().await
    }

    /// Configuration this session was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Prefix of every resource URL, e.g. `https://host/api/v4`
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// HTTP status of the most recent API response, if any
    pub fn status_code(&self) -> Option<u16> {
        match self.last_status.load(Ordering::SeqCst) {
            0 => None,
            status => Some(status),
        }
    }

    /// Current token (without refreshing)
    pub async fn token(&self) -> Option<TokenSet> {
        self.tokens.get_tokens().await
    }

    /// `true` once the current token has reached its expiry
    pub async fn is_expired(&self) -> bool {
        self.tokens.is_expired().await
    }

    /// Force a token refresh
    ///
    /// # Errors
    ///
    /// Returns `Auth` when the platform rejects the refresh
    pub async fn refresh(&self) -> Result<TokenSet> {
        self.tokens.refresh_tokens().await.map_err(|e| InfraError::from(e).into())
    }

    /// Authorization URL for the authorization-code flow
    ///
    /// Returns `(url, state)`. The caller must keep `state` to compare with
    /// the one that comes back on the redirect.
    ///
    /// # Errors
    ///
    /// Returns `Config` when no redirect URI is configured
    pub async fn authorization_url(&self) -> Result<(String, String)> {
        self.tokens
            .oauth_client()
            .generate_authorization_url()
            .await
            .map_err(|e| InfraError::from(e).into())
    }

    /// Finish the authorization-code flow started by
    /// [`authorization_url`](Self::authorization_url) on this session
    ///
    /// # Errors
    ///
    /// Returns `Auth` without contacting the token endpoint when `state`
    /// does not match
    #[instrument(skip_all)]
    pub async fn complete_authorization(&self, code: &str, state: &str) -> Result<TokenSet> {
        self.tokens
            .complete_authorization(code, state)
            .await
            .map_err(|e| InfraError::from(e).into())
    }

    /// Finish the authorization-code flow with a state the caller stored
    ///
    /// For servers that build a fresh client per request and keep the
    /// issued state in their own session store.
    ///
    /// # Errors
    ///
    /// Returns `Auth` without contacting the token endpoint when the states
    /// differ
    #[instrument(skip_all)]
    pub async fn complete_authorization_with_state(
        &self,
        code: &str,
        received_state: &str,
        expected_state: &str,
    ) -> Result<TokenSet> {
        check_state(expected_state, received_state)?;
        self.tokens.exchange_code(code).await.map_err(|e| InfraError::from(e).into())
    }

    /// Send a request and return the parsed envelope
    ///
    /// `data` is sent as a JSON body; `params` as the query string. Any HTTP
    /// status yields `Ok`; check [`status_code`](Self::status_code) and
    /// [`Envelope::errors`].
    ///
    /// # Errors
    ///
    /// - `Auth` when no valid token can be obtained
    /// - `Network` when no response arrives
    /// - `InvalidResponse` when the body is not JSON
    /// - `InvalidInput` when `data` cannot be serialized
    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        data: Option<&T>,
        params: Option<&Params>,
    ) -> Result<Envelope>
    where
        T: Serialize + ?Sized,
    {
        let body = match data {
            Some(data) => Body::Json(serde_json::to_value(data)?),
            None => Body::Empty,
        };
        self.dispatch(method, path, body, params).await
    }

    /// GET with query parameters
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request)
    pub async fn get(&self, path: &str, params: &Params) -> Result<Envelope> {
        self.dispatch(Method::GET, path, Body::Empty, Some(params)).await
    }

    /// POST with a JSON body
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request)
    pub async fn post<T>(&self, path: &str, body: &T) -> Result<Envelope>
    where
        T: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body), None).await
    }

    /// PUT with a JSON body
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request)
    pub async fn put<T>(&self, path: &str, body: &T) -> Result<Envelope>
    where
        T: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body), None).await
    }

    /// DELETE without a body
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request)
    pub async fn delete(&self, path: &str) -> Result<Envelope> {
        self.dispatch(Method::DELETE, path, Body::Empty, None).await
    }

    /// POST a multipart form: `fields` as text parts plus the X12 payload as
    /// the `file` part
    ///
    /// # Errors
    ///
    /// See [`request`](Self::request)
    pub async fn post_multipart(
        &self,
        path: &str,
        fields: &Params,
        file: X12File,
    ) -> Result<Envelope> {
        let mut form = Form::new();
        for (key, value) in fields.as_pairs() {
            form = form.text(key.to_string(), value.to_string());
        }

        let (file_name, content) = file.into_parts();
        let part = Part::bytes(content)
            .file_name(file_name)
            .mime_str(X12_CONTENT_TYPE)
            .map_err(|e| PokitDokError::InvalidInput(format!("invalid upload content type: {e}")))?;
        form = form.part(X12_FORM_FIELD, part);

        self.dispatch(Method::POST, path, Body::Multipart(form), None).await
    }

    #[instrument(skip_all, fields(method = %method, path = %path))]
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Body,
        params: Option<&Params>,
    ) -> Result<Envelope> {
        let token = self
            .tokens
            .get_access_token()
            .await
            .map_err(|e| PokitDokError::from(InfraError::from(e)))?;

        let url = format!("{}{}", self.api_base_url, path);
        debug!(url = %url, "API request");

        let mut builder = self
            .http
            .request(method, &url)
            .bearer_auth(token)
            .header(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(params) = params.filter(|p| !p.is_empty()) {
            builder = builder.query(&params.as_pairs());
        }

        builder = match body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(&value),
            Body::Multipart(form) => builder.multipart(form),
        };

        let response = self.http.send(builder).await?;
        let status = response.status();
        self.last_status.store(status.as_u16(), Ordering::SeqCst);

        let bytes = response.bytes().await.map_err(|e| PokitDokError::from(InfraError::from(e)))?;
        let envelope = parse_envelope(&bytes, status.as_u16())?;

        if status.is_success() {
            debug!(status = status.as_u16(), "API request completed");
        } else {
            warn!(
                status = status.as_u16(),
                has_errors = envelope.has_errors(),
                "API returned non-success status"
            );
        }

        Ok(envelope)
    }
}

fn parse_envelope(bytes: &[u8], status: u16) -> Result<Envelope> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Envelope::default());
    }

    let document: Value = serde_json::from_slice(bytes).map_err(|e| {
        PokitDokError::InvalidResponse(format!("HTTP {status} body is not JSON: {e}"))
    })?;

    if !document.is_object() {
        return Ok(Envelope::from_data(document));
    }
    serde_json::from_value(document).map_err(|e| {
        PokitDokError::InvalidResponse(format!("HTTP {status} body is not a JSON envelope: {e}"))
    })
}

fn check_state(expected: &str, received: &str) -> Result<()> {
    if expected.is_empty() || !validate_state(expected, received) {
        warn!("authorization state mismatch, refusing code exchange");
        return Err(InfraError::from(OAuthClientError::StateMismatch).into());
    }
    Ok(())
}

/// Builder for [`PokitDokClient`]
///
/// Decides how the initial token is obtained:
/// 1. a supplied [`token`](Self::token) is reused as is
/// 2. a supplied [`authorization_code`](Self::authorization_code) is
///    exchanged (after the optional state check)
/// 3. with a redirect URI configured, nothing is fetched until the
///    authorization-code flow completes
/// 4. otherwise the client-credentials grant runs
pub struct PokitDokClientBuilder {
    config: ClientConfig,
    token: Option<TokenSet>,
    code: Option<String>,
    state_check: Option<(String, String)>,
    refresh_handler: Option<Arc<dyn TokenRefreshHandler>>,
}

impl PokitDokClientBuilder {
    /// Builder over `config`; nothing is fetched until [`build`](Self::build).
    pub fn new(config: ClientConfig) -> Self {
        Self { config, token: None, code: None, state_check: None, refresh_handler: None }
    }

    /// Reuse a previously persisted token
    pub fn token(mut self, token: TokenSet) -> Self {
        self.token = Some(token);
        self
    }

    /// Exchange this authorization code when connecting
    pub fn authorization_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Require `received` to match `expected` before exchanging the code
    pub fn expected_state(
        mut self,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        self.state_check = Some((expected.into(), received.into()));
        self
    }

    /// Notified with every token the session obtains
    pub fn refresh_handler(mut self, handler: Arc<dyn TokenRefreshHandler>) -> Self {
        self.refresh_handler = Some(handler);
        self
    }

    /// Build the client and obtain its initial token
    ///
    /// # Errors
    ///
    /// Returns `Config` for invalid settings, `Auth` when a grant is
    /// rejected or the state check fails, `Network` when the token endpoint
    /// cannot be reached
    pub async fn build(self) -> Result<PokitDokClient> {
        let config = self.config;
        config.validate()?;

        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        let oauth_config = OAuthConfig::new(
            config.client_id.clone(),
            config.client_secret.clone(),
            config.authorize_url(),
            config.token_url(),
        )
        .with_redirect_uri(config.redirect_uri.clone())
        .with_scopes(config.scopes.clone())
        .with_timeout(http.timeout());
        let oauth = OAuthClient::with_http_client(oauth_config, http.inner().clone());

        let mut tokens = TokenManager::new(oauth, config.refresh_threshold_seconds)
            .with_auto_refresh(config.auto_refresh);
        if let Some(handler) = self.refresh_handler {
            tokens = tokens.with_refresh_handler(handler);
        }

        let client = PokitDokClient {
            api_base_url: config.api_base_url(),
            config,
            http,
            tokens,
            last_status: AtomicU16::new(0),
        };

        match (self.token, self.code) {
            (Some(token), _) => {
                debug!("using supplied token");
                client.tokens.store_tokens(token).await;
            }
            (None, Some(code)) => {
                if let Some((expected, received)) = &self.state_check {
                    check_state(expected, received)?;
                }
                client.tokens.exchange_code(&code).await.map_err(InfraError::from)?;
            }
            (None, None) if client.config.redirect_uri.is_some() => {
                info!("authorization-code session created; awaiting authorization");
            }
            (None, None) => {
                client.tokens.fetch_client_credentials().await.map_err(InfraError::from)?;
            }
        }

        info!(api = %client.api_base_url, "connected to PokitDok platform");
        Ok(client)
    }
}
