use common::ErrorLocation;

use std::panic::Location;
use std::path::PathBuf;

use models::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config Read Error: {path}: {source} {location}")]
    ReadError {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Parse Error: {path}: {reason} {location}")]
    ParseError {
        location: ErrorLocation,
        path: PathBuf,
        reason: String,
    },

    #[error("Config Directory Not Found Error: {reason} {location}")]
    DirectoryNotFound {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Config Validation Error: {reason} {location}")]
    ValidationError {
        location: ErrorLocation,
        reason: String,
    },

    #[error("Unknown Service Error: {name} {location}")]
    UnknownService {
        location: ErrorLocation,
        name: String,
    },

    #[error("URL Parse Error: {reason} {location}")]
    UrlParse {
        location: ErrorLocation,
        reason: String,
    },
}

impl From<url::ParseError> for ConfigError {
    #[track_caller]
    fn from(error: url::ParseError) -> Self {
        ConfigError::UrlParse {
            location: ErrorLocation::from(Location::caller()),
            reason: error.to_string(),
        }
    }
}

impl From<ModelError> for ConfigError {
    fn from(error: ModelError) -> Self {
        match error {
            ModelError::UnknownService { name, location } => {
                ConfigError::UnknownService { location, name }
            }
            ModelError::Validation { message, location } => ConfigError::ValidationError {
                location,
                reason: message,
            },
        }
    }
}
