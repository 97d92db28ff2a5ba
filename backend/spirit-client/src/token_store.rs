//! Persisted bearer token.
//!
//! The dashboard stores at most one token. When none is stored, requests go
//! out without an `Authorization` header.

use crate::error::token_store::TokenStoreError;

use common::{ErrorLocation, RedactedToken};

use std::io::ErrorKind as IoErrorKind;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, info};

pub const AUTH_TOKEN_KEY: &str = "spiritual_auth_token";

pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<RedactedToken>, TokenStoreError>;
    fn save(&self, token: &RedactedToken) -> Result<(), TokenStoreError>;
    /// Removing an absent token is not an error.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Token kept in `{dir}/spiritual_auth_token`.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(AUTH_TOKEN_KEY),
        }
    }

    /// Store under the platform data directory.
    #[track_caller]
    pub fn in_data_dir() -> Result<Self, TokenStoreError> {
        let dir = dirs::data_dir().ok_or_else(|| TokenStoreError::Location {
            message: "platform data directory is not available".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;
        Ok(Self::new(&dir.join(crate::config::CONFIG_DIR_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[track_caller]
    fn io_error(&self, path: &Path, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            location: ErrorLocation::from(Location::caller()),
            path: path.to_path_buf(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<RedactedToken>, TokenStoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(&self.path, e)),
        };

        if contents.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(RedactedToken::new(contents)?))
    }

    /// Temp file + rename so a crash never leaves a half-written token.
    fn save(&self, token: &RedactedToken) -> Result<(), TokenStoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(dir, e))?;
        }

        let temp_path = self.path.with_extension("tmp");
        std::fs::write(&temp_path, token.expose()).map_err(|e| self.io_error(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(&self.path, e))?;

        info!("Auth token saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Auth token cleared");
                Ok(())
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                debug!("No auth token to clear");
                Ok(())
            }
            Err(e) => Err(self.io_error(&self.path, e)),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<RedactedToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: RedactedToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<RedactedToken>, TokenStoreError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &RedactedToken) -> Result<(), TokenStoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Ok(())
    }
}
