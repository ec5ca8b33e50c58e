//! OAuth 2.0 session infrastructure for the PokitDok platform
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  TokenManager   │  token lifecycle, refresh-on-expiry, refresh handler
//! └────────┬────────┘
//!          │
//!          └──► OAuthClient   (token endpoint grants + authorization URL)
//!                    │
//!                    └──► state   (anti-CSRF state generation/validation)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use pokitdok_common::auth::{OAuthClient, OAuthConfig, TokenManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OAuthConfig::new(
//!         "client_id".to_string(),
//!         "client_secret".to_string(),
//!         "https://platform.pokitdok.com/oauth2/authorize".to_string(),
//!         "https://platform.pokitdok.com/oauth2/token".to_string(),
//!     );
//!
//!     let manager = TokenManager::new(OAuthClient::new(config)?, 0);
//!     manager.fetch_client_credentials().await?;
//!
//!     // Refreshes first if the token has expired
//!     let _access_token = manager.get_access_token().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod state;
pub mod token_manager;
pub mod traits;
pub mod types;

pub use client::{OAuthClient, OAuthClientError};
pub use state::{generate_state, validate_state};
pub use token_manager::{TokenManager, TokenManagerError};
pub use traits::{OAuthClientTrait, TokenRefreshHandler};
pub use types::{OAuthConfig, OAuthError, TokenResponse, TokenSet};
