//! Testing utilities and helpers
//!
//! - **[`mocks`]**: Mock implementations of the auth traits
//!
//! ## Usage
//!
//! ```rust
//! use pokitdok_common::testing::MockOAuthClient;
//!
//! let client = MockOAuthClient::new();
//! client.set_initial_expires_in(-10);
//! assert_eq!(client.refresh_calls(), 0);
//! ```

pub mod mocks;

pub use mocks::MockOAuthClient;
