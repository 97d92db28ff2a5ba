use common::ErrorLocation;
use spirit_client::ClientError;
use spirit_client::error::{ConfigError, TokenStoreError};

use std::panic::Location;

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by CLI commands.
///
/// Library errors are flattened to their message so the whole value stays
/// serializable for JSON output, with the location of the conversion kept.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum DashboardError {
    /// Error from this binary
    #[error("Dashboard Error: {message} {location}")]
    Dashboard {
        message: String,
        location: ErrorLocation,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Config Error: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    /// A request to a backend service failed
    #[error("Client Error: {message} {location}")]
    Client {
        message: String,
        /// Classified kind, when the failure reached a backend.
        kind: Option<String>,
        location: ErrorLocation,
    },

    /// The auth token could not be read or written
    #[error("Token Error: {message} {location}")]
    Token {
        message: String,
        location: ErrorLocation,
    },
}

impl From<ClientError> for DashboardError {
    #[track_caller]
    fn from(error: ClientError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match error {
            ClientError::Config(config) => DashboardError::Config {
                message: config.to_string(),
                location,
            },
            ClientError::TokenStore(token) => DashboardError::Token {
                message: token.to_string(),
                location,
            },
            ClientError::Spiritual(spiritual) => DashboardError::Client {
                message: format!("{} ({})", spiritual.message, spiritual.guidance),
                kind: Some(spiritual.kind.to_string()),
                location,
            },
            other => DashboardError::Client {
                message: other.to_string(),
                kind: None,
                location,
            },
        }
    }
}

impl From<ConfigError> for DashboardError {
    #[track_caller]
    fn from(error: ConfigError) -> Self {
        DashboardError::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<TokenStoreError> for DashboardError {
    #[track_caller]
    fn from(error: TokenStoreError) -> Self {
        DashboardError::Token {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    #[track_caller]
    fn from(error: serde_json::Error) -> Self {
        DashboardError::Dashboard {
            message: format!("JSON output failed: {error}"),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}
