//! Failure classification.
//!
//! Raw failures come from two places: the transport (`reqwest`) and
//! non-2xx responses. Both are reduced to a [`RawFailure`] and then mapped
//! by an ordered rule set to a [`SpiritualError`].

pub mod guidance;
pub mod handler;

pub use handler::{ErrorDisposition, ErrorHandler};

use crate::error::{ErrorContext, ErrorKind, Severity, SpiritualError};

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;
use std::sync::OnceLock;
use std::time::Duration;

use log::trace;
use regex::Regex;

/// Suggested wait after a 429.
pub const RATE_LIMIT_RETRY_AFTER: Duration = Duration::from_secs(60);

const STATUS_PATTERN: &str = r"\b([1-5]\d{2})\b";
const TIMEOUT_MARKERS: [&str; 2] = ["timeout", "timed out"];
const UNKNOWN_FAILURE_MESSAGE: &str = "Unknown spiritual disturbance occurred";

static STATUS_REGEX: OnceLock<Regex> = OnceLock::new();

fn status_regex() -> &'static Regex {
    STATUS_REGEX.get_or_init(|| Regex::new(STATUS_PATTERN).expect("valid regex pattern"))
}

/// An unclassified failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    /// Connection refused, DNS failure, reset, TLS failure.
    Transport { message: String },
    /// Per-request deadline elapsed or the call was cancelled.
    Timeout { message: String },
    /// The server answered with a non-2xx status.
    Http {
        status: HttpStatusCode,
        message: String,
    },
    /// Anything else (decode failures, caller-provided messages).
    Other { message: String },
}

impl RawFailure {
    pub fn message(&self) -> &str {
        match self {
            RawFailure::Transport { message }
            | RawFailure::Timeout { message }
            | RawFailure::Http { message, .. }
            | RawFailure::Other { message } => message,
        }
    }

    /// Typed status if present, otherwise the first status-like number in the message.
    pub fn status(&self) -> Option<HttpStatusCode> {
        self.statuses().into_iter().next()
    }

    /// Typed status if present, otherwise every status-like number in the
    /// message, in order of appearance.
    pub fn statuses(&self) -> Vec<HttpStatusCode> {
        match self {
            RawFailure::Http { status, .. } => vec![*status],
            other => status_regex()
                .captures_iter(other.message())
                .filter_map(|caps| caps.get(1))
                .filter_map(|m| m.as_str().parse::<u16>().ok())
                .map(HttpStatusCode)
                .collect(),
        }
    }

    /// Message-based timeout detection. A typed HTTP failure is classified by
    /// its status alone, so `HTTP 504: Gateway Timeout` is not a timeout.
    fn mentions_timeout(&self) -> bool {
        if matches!(self, RawFailure::Http { .. }) {
            return false;
        }
        let lowered = self.message().to_ascii_lowercase();
        TIMEOUT_MARKERS.iter().any(|marker| lowered.contains(marker))
    }
}

impl From<reqwest::Error> for RawFailure {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();

        if error.is_timeout() {
            RawFailure::Timeout { message }
        } else if let Some(status) = error.status() {
            RawFailure::Http {
                status: HttpStatusCode(status.as_u16()),
                message,
            }
        } else if error.is_decode() || error.is_body() {
            RawFailure::Other { message }
        } else {
            RawFailure::Transport { message }
        }
    }
}

/// Maps raw failures to typed errors. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a failure. Rules are checked in order; the first match wins.
    ///
    /// `kind`, `severity` and `retryable` depend only on `raw`, so classifying
    /// the same failure twice yields the same structured fields.
    #[track_caller]
    pub fn classify(&self, raw: &RawFailure, context: ErrorContext) -> SpiritualError {
        let (kind, severity) = Self::kind_and_severity(raw);
        trace!("Classified failure as {kind}/{severity}: {}", raw.message());

        let message = if raw.message().is_empty() {
            UNKNOWN_FAILURE_MESSAGE.to_string()
        } else {
            raw.message().to_string()
        };

        let error = SpiritualError::new(
            message,
            kind,
            severity,
            context,
            ErrorLocation::from(Location::caller()),
        );

        match kind {
            ErrorKind::RateLimit => error.with_retry_after(RATE_LIMIT_RETRY_AFTER),
            _ => error,
        }
    }

    pub fn kind_and_severity(raw: &RawFailure) -> (ErrorKind, Severity) {
        if matches!(raw, RawFailure::Transport { .. }) {
            return (ErrorKind::Network, Severity::High);
        }

        if matches!(raw, RawFailure::Timeout { .. }) || raw.mentions_timeout() {
            return (ErrorKind::Timeout, Severity::Medium);
        }

        // Rules are checked in order against every status found, so
        // `upstream 500 after 503` still matches the 503 rule.
        let statuses = raw.statuses();
        let any = |rule: fn(&HttpStatusCode) -> bool| statuses.iter().any(rule);

        if any(HttpStatusCode::is_auth_failure) {
            (ErrorKind::Authentication, Severity::High)
        } else if any(HttpStatusCode::is_validation_failure) {
            (ErrorKind::Validation, Severity::Low)
        } else if any(HttpStatusCode::is_rate_limited) {
            (ErrorKind::RateLimit, Severity::Medium)
        } else if any(HttpStatusCode::is_service_unavailable) {
            (ErrorKind::ServiceUnavailable, Severity::High)
        } else {
            (ErrorKind::Unknown, Severity::Medium)
        }
    }
}
