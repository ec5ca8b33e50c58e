//! Platform constants
//!
//! Centralized location for the endpoint layout and defaults of the PokitDok
//! Platform API.

// Remote platform layout
pub const DEFAULT_BASE_URL: &str = "https://platform.pokitdok.com";
pub const DEFAULT_API_VERSION: &str = "v4";
pub const API_PATH_PREFIX: &str = "/api";
pub const TOKEN_PATH: &str = "/oauth2/token";
pub const AUTHORIZE_PATH: &str = "/oauth2/authorize";

// Client defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;
pub const DEFAULT_REFRESH_THRESHOLD_SECS: i64 = 0;
/// Upper bound for the early-refresh threshold (one day)
pub const MAX_REFRESH_THRESHOLD_SECS: i64 = 86_400;
pub const USER_AGENT_PREFIX: &str = "pokitdok-rust";

// Uploads
pub const X12_CONTENT_TYPE: &str = "application/EDI-X12";
pub const X12_FORM_FIELD: &str = "file";
pub const DEFAULT_X12_FILE_NAME: &str = "payload.x12";

/// `User-Agent` header value sent with every request.
#[must_use]
pub fn user_agent() -> String {
    format!("{USER_AGENT_PREFIX}/{}", env!("CARGO_PKG_VERSION"))
}
