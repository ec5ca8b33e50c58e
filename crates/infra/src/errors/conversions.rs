//! Conversions from external infrastructure errors into domain errors.

use pokitdok_common::auth::{OAuthClientError, TokenManagerError};
use pokitdok_domain::PokitDokError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub PokitDokError);

impl From<InfraError> for PokitDokError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<PokitDokError> for InfraError {
    fn from(value: PokitDokError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoPokitDokError {
    fn into_pokitdok(self) -> PokitDokError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → PokitDokError */
/* -------------------------------------------------------------------------- */

impl IntoPokitDokError for HttpError {
    fn into_pokitdok(self) -> PokitDokError {
        if self.is_timeout() {
            return PokitDokError::Network(format!("HTTP request timed out: {self}"));
        }

        if self.is_connect() {
            return PokitDokError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return PokitDokError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return PokitDokError::InvalidResponse(format!("failed to read response body: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => PokitDokError::Auth(message),
                _ => PokitDokError::Network(message),
            };
        }

        PokitDokError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_pokitdok())
    }
}

/* -------------------------------------------------------------------------- */
/* auth errors → PokitDokError */
/* -------------------------------------------------------------------------- */

impl IntoPokitDokError for OAuthClientError {
    fn into_pokitdok(self) -> PokitDokError {
        match self {
            // No response from the token endpoint is a transport failure
            OAuthClientError::RequestFailed(err) if err.status().is_none() => {
                err.into_pokitdok()
            }
            OAuthClientError::ConfigError(message) => PokitDokError::Config(message),
            other => PokitDokError::Auth(other.to_string()),
        }
    }
}

impl From<OAuthClientError> for InfraError {
    fn from(value: OAuthClientError) -> Self {
        InfraError(value.into_pokitdok())
    }
}

impl IntoPokitDokError for TokenManagerError {
    fn into_pokitdok(self) -> PokitDokError {
        match self {
            TokenManagerError::OAuthError(err) => err.into_pokitdok(),
            other => PokitDokError::Auth(other.to_string()),
        }
    }
}

impl From<TokenManagerError> for InfraError {
    fn from(value: TokenManagerError) -> Self {
        InfraError(value.into_pokitdok())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → PokitDokError */
/* -------------------------------------------------------------------------- */

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(PokitDokError::Io(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
