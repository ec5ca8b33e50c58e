//! PokitDok Platform API client
//!
//! [`PokitDokClient`] owns the OAuth2 session and dispatches requests.
//! Resource methods (eligibility, claims, scheduling, ...) are defined in
//! [`resources`] as further `impl PokitDokClient` blocks.
//!
//! # Errors
//!
//! Only authentication, transport and malformed-body failures are `Err`.
//! Platform-side problems (validation errors, unknown ids) come back as an
//! [`Envelope`](pokitdok_domain::Envelope) with a non-2xx
//! [`status_code`](PokitDokClient::status_code).

pub mod client;
pub mod resources;
pub mod upload;

pub use client::{PokitDokClient, PokitDokClientBuilder};
pub use upload::load_x12_file;
