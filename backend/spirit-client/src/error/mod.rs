pub mod config;
pub mod spiritual;
pub mod token_store;

pub use config::ConfigError;
pub use spiritual::{ErrorContext, ErrorKind, Severity, SpiritualError};
pub use token_store::TokenStoreError;

use common::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Static configuration problem. Never retried.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A request failed and was classified.
    #[error(transparent)]
    Spiritual(#[from] SpiritualError),

    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),

    #[error("HTTP Client Error: {message} {location}")]
    HttpClient {
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON Error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid Header Error: {message} {location}")]
    InvalidHeader {
        message: String,
        location: ErrorLocation,
    },
}

impl ClientError {
    /// Whether a retry could change the outcome.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Spiritual(error) => error.retryable,
            _ => false,
        }
    }

    pub fn as_spiritual(&self) -> Option<&SpiritualError> {
        match self {
            ClientError::Spiritual(error) => Some(error),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        ClientError::Json {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(error: reqwest::Error) -> Self {
        ClientError::HttpClient {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
