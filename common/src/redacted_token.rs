//! Auth token handling with redacted Debug output.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

const BEARER_PREFIX: &str = "Bearer ";

/// A bearer token that never exposes its value in logs or debug output.
#[derive(Clone)]
pub struct RedactedToken {
    inner: String,
}

impl RedactedToken {
    /// Wrap a token, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`RedactError::Empty`] if nothing remains after trimming.
    #[track_caller]
    pub fn new(token: impl Into<String>) -> Result<Self, RedactError> {
        let mut raw = token.into();
        let trimmed = raw.trim().to_string();
        raw.zeroize();

        if trimmed.is_empty() {
            return Err(RedactError::Empty {
                message: String::from("Auth token cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self { inner: trimmed })
    }

    /// Get the actual token value.
    ///
    /// # Security Note
    /// Only call this when actually sending or persisting the token.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Value for the `Authorization` header.
    pub fn bearer_header_value(&self) -> String {
        format!("{BEARER_PREFIX}{}", self.inner)
    }

    /// Token length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedToken([REDACTED])")
    }
}

impl fmt::Display for RedactedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED TOKEN]")
    }
}

impl Drop for RedactedToken {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Prevent accidental serialization
impl serde::Serialize for RedactedToken {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from("RedactedToken cannot be serialized - use expose() explicitly"),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}
