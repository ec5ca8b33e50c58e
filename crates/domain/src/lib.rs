//! # PokitDok Domain
//!
//! Domain types shared by the PokitDok Platform API client crates.
//!
//! This crate contains:
//! - The client error type and `Result` alias
//! - Client configuration structures
//! - Wire-level types (response envelope, query parameters, X12 payloads)
//! - Platform constants (default base URL, endpoint paths)
//!
//! ## Architecture
//! - No dependencies on other PokitDok crates
//! - No I/O; pure data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
