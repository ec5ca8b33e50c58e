//! Error types used throughout the client

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the PokitDok client
///
/// Only authentication and transport-level problems surface here. Platform
/// application errors (4xx/5xx responses carrying `data.errors`) are returned
/// to the caller inside the response envelope instead.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum PokitDokError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PokitDokError {
    /// Stable label suitable for structured logging fields.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Network(_) => "network",
            Self::InvalidResponse(_) => "invalid_response",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the failure happened before a response was received.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<serde_json::Error> for PokitDokError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("JSON serialization failed: {err}"))
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, PokitDokError>;
