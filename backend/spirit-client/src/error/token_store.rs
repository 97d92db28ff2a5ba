use common::{ErrorLocation, RedactError};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Token Store IO Error: {path}: {source} {location}")]
    Io {
        location: ErrorLocation,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Token Store Location Error: {message} {location}")]
    Location {
        message: String,
        location: ErrorLocation,
    },

    #[error(transparent)]
    Invalid(#[from] RedactError),
}
