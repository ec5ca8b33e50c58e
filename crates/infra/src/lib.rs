//! # PokitDok Infrastructure
//!
//! I/O side of the PokitDok Platform API client.
//!
//! This crate contains:
//! - The session and request dispatcher ([`PokitDokClient`])
//! - One method per platform endpoint
//! - The HTTP transport
//! - Configuration loading from environment and files
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - OAuth2 grants and token lifecycle come from `pokitdok-common`
//! - Errors, configuration and wire types come from `pokitdok-domain`
//!
//! ## Example
//!
//! ```no_run
//! use pokitdok_infra::PokitDokClient;
//! use serde_json::json;
//!
//! # async fn run() -> pokitdok_domain::Result<()> {
//! let client = PokitDokClient::connect("client_id", "client_secret", None).await?;
//! let envelope = client
//!     .eligibility(&json!({
//!         "member": {"id": "W000000000", "first_name": "Jane", "last_name": "Doe"},
//!         "trading_partner_id": "MOCKPAYER"
//!     }))
//!     .await?;
//! println!("{} {:?}", client.status_code().unwrap_or_default(), envelope.data);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{load_x12_file, PokitDokClient, PokitDokClientBuilder};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::init_tracing;
pub use pokitdok_common::auth::{TokenRefreshHandler, TokenSet};
pub use pokitdok_domain::{ClientConfig, Envelope, Params, PokitDokError, X12File};
