//! Common building blocks shared across the PokitDok client crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `platform`: OAuth2 session infrastructure (token types, OAuth client,
//!   token manager with refresh-on-expiry, anti-CSRF state helpers)
//! - `test-utils`: mock implementations for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "platform")))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{
    OAuthClient, OAuthClientError, OAuthConfig, TokenManager, TokenManagerError,
    TokenRefreshHandler, TokenSet,
};
