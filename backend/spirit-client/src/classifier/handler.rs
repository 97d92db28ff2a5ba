use crate::classifier::{ErrorClassifier, RawFailure};
use crate::error::{ErrorContext, Severity, SpiritualError};
use crate::fallback::FallbackCatalog;
use crate::retry::RetryPolicy;

use std::time::Duration;

use log::{debug, error, warn};
use serde_json::Value;

/// Everything a caller needs to decide what to do with a failure.
#[derive(Debug, Clone)]
pub struct ErrorDisposition {
    pub error: SpiritualError,
    /// How long to wait before the next attempt, if the caller retries.
    pub retry_delay: Duration,
    /// Canned payload for `context.operation`, if the catalog has one.
    pub fallback: Option<Value>,
}

impl ErrorDisposition {
    pub fn retryable(&self) -> bool {
        self.error.retryable
    }

    pub fn fallback_available(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Classification + fallback lookup + retry delay in one place.
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler {
    classifier: ErrorClassifier,
    catalog: FallbackCatalog,
    policy: RetryPolicy,
}

impl ErrorHandler {
    pub fn new(catalog: FallbackCatalog, policy: RetryPolicy) -> Self {
        Self {
            classifier: ErrorClassifier::new(),
            catalog,
            policy,
        }
    }

    pub fn classifier(&self) -> &ErrorClassifier {
        &self.classifier
    }

    pub fn catalog(&self) -> &FallbackCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Classify `raw` and build its disposition.
    #[track_caller]
    pub fn handle(&self, raw: &RawFailure, context: ErrorContext) -> ErrorDisposition {
        let error = self.classifier.classify(raw, context);
        self.dispose(error)
    }

    /// Build a disposition for an already classified error.
    pub fn dispose(&self, error: SpiritualError) -> ErrorDisposition {
        let attempt = error.context.attempt().unwrap_or(1);
        let retry_delay = self.retry_delay(&error, attempt);
        let fallback = error
            .operation()
            .and_then(|operation| self.catalog.lookup(operation));

        log_error(&error, fallback.is_some());

        ErrorDisposition {
            error,
            retry_delay,
            fallback,
        }
    }

    /// Server hint when present, otherwise the policy's backoff for `attempt`.
    pub fn retry_delay(&self, error: &SpiritualError, attempt: u32) -> Duration {
        error
            .retry_after
            .unwrap_or_else(|| self.policy.delay_for_attempt(attempt))
    }
}

fn log_error(error: &SpiritualError, fallback_available: bool) {
    let component = error.context.get(ErrorContext::COMPONENT).unwrap_or("unknown");
    let operation = error.operation().unwrap_or("unknown");

    match error.severity {
        Severity::High | Severity::Critical => error!(
            "{component}/{operation} failed ({}/{}): {} - {}",
            error.kind, error.severity, error.message, error.guidance
        ),
        Severity::Low | Severity::Medium => warn!(
            "{component}/{operation} failed ({}/{}): {} - {}",
            error.kind, error.severity, error.message, error.guidance
        ),
    }

    debug!(
        "Error details: retryable={}, fallback_available={fallback_available}, context={:?}",
        error.retryable, error.context
    );
}
