//! Classified request failures.
//!
//! A [`SpiritualError`] is produced once, at the client boundary, by
//! [`crate::ErrorClassifier`]. Callers branch on `kind` and `retryable`;
//! `severity` only orders user-facing messaging.

use crate::classifier::guidance;

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::time::{Duration, SystemTime};

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Authentication,
    Validation,
    ServiceUnavailable,
    Timeout,
    RateLimit,
    Unknown,
}

impl ErrorKind {
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::Network
                | ErrorKind::ServiceUnavailable
                | ErrorKind::Timeout
                | ErrorKind::RateLimit
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Validation => "validation",
            ErrorKind::ServiceUnavailable => "service_unavailable",
            ErrorKind::Timeout => "timeout",
            ErrorKind::RateLimit => "rate_limit",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Minor issue, the dashboard continues normally.
    Low,
    /// Some functionality affected.
    Medium,
    /// Major functionality broken.
    High,
    /// Dashboard unusable.
    Critical,
}

impl Display for Severity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        formatter.write_str(label)
    }
}

/// Free-form diagnostic fields attached to a classified error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorContext(BTreeMap<String, String>);

impl ErrorContext {
    pub const COMPONENT: &'static str = "component";
    pub const OPERATION: &'static str = "operation";
    pub const SERVICE: &'static str = "service";
    pub const ENDPOINT: &'static str = "endpoint";
    pub const URL: &'static str = "url";
    pub const ATTEMPT: &'static str = "attempt";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.0.insert(key.into(), value.to_string());
        self
    }

    pub fn with_component(self, component: impl ToString) -> Self {
        self.with(Self::COMPONENT, component)
    }

    pub fn with_operation(self, operation: impl ToString) -> Self {
        self.with(Self::OPERATION, operation)
    }

    pub fn with_attempt(self, attempt: u32) -> Self {
        self.with(Self::ATTEMPT, attempt)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn operation(&self) -> Option<&str> {
        self.get(Self::OPERATION)
    }

    pub fn attempt(&self) -> Option<u32> {
        self.get(Self::ATTEMPT).and_then(|raw| raw.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Error, Serialize)]
#[error("Spiritual Error ({kind}/{severity}): {message} {location}")]
pub struct SpiritualError {
    pub message: String,
    pub kind: ErrorKind,
    pub severity: Severity,
    pub retryable: bool,
    /// Server-side hint that overrides the computed backoff.
    pub retry_after: Option<Duration>,
    pub context: ErrorContext,
    pub created_at: SystemTime,
    /// User-facing phrase. Randomized per instance.
    pub guidance: &'static str,
    pub location: ErrorLocation,
}

impl SpiritualError {
    pub fn new(
        message: impl Into<String>,
        kind: ErrorKind,
        severity: Severity,
        context: ErrorContext,
        location: ErrorLocation,
    ) -> Self {
        Self {
            message: message.into(),
            kind,
            severity,
            retryable: kind.is_retryable(),
            retry_after: None,
            context,
            created_at: SystemTime::now(),
            guidance: guidance::phrase_for(kind),
            location,
        }
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    pub fn operation(&self) -> Option<&str> {
        self.context.operation()
    }
}
