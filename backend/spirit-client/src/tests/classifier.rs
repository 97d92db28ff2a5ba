use crate::classifier::guidance::phrases_for;
use crate::classifier::{ErrorClassifier, ErrorHandler, RATE_LIMIT_RETRY_AFTER, RawFailure};
use crate::error::{ErrorContext, ErrorKind, Severity};
use crate::fallback::FallbackCatalog;
use crate::retry::{FixedJitter, RetryPolicy};

use common::HttpStatusCode;

use std::time::Duration;

fn http(status: u16) -> RawFailure {
    RawFailure::Http {
        status: HttpStatusCode(status),
        message: format!("HTTP {status}: status"),
    }
}

fn other(message: &str) -> RawFailure {
    RawFailure::Other {
        message: message.to_string(),
    }
}

/// **VALUE**: Verifies every rule of the ordered classification table.
///
/// **WHY THIS MATTERS**: Retry and fallback decisions hang off `kind`; a
/// misclassified 503 is never retried.
///
/// **BUG THIS CATCHES**: Would catch a status mapped to the wrong kind or severity.
#[test]
fn given_each_failure_class_when_classifying_then_matches_table() {
    let cases = [
        (
            RawFailure::Transport {
                message: "connection refused".to_string(),
            },
            ErrorKind::Network,
            Severity::High,
        ),
        (
            RawFailure::Timeout {
                message: "deadline".to_string(),
            },
            ErrorKind::Timeout,
            Severity::Medium,
        ),
        (http(401), ErrorKind::Authentication, Severity::High),
        (http(403), ErrorKind::Authentication, Severity::High),
        (http(400), ErrorKind::Validation, Severity::Low),
        (http(422), ErrorKind::Validation, Severity::Low),
        (http(429), ErrorKind::RateLimit, Severity::Medium),
        (http(502), ErrorKind::ServiceUnavailable, Severity::High),
        (http(503), ErrorKind::ServiceUnavailable, Severity::High),
        (http(500), ErrorKind::Unknown, Severity::Medium),
        (http(404), ErrorKind::Unknown, Severity::Medium),
    ];

    for (raw, kind, severity) in cases {
        assert_eq!(
            ErrorClassifier::kind_and_severity(&raw),
            (kind, severity),
            "{raw:?}"
        );
    }
}

/// **VALUE**: Verifies a typed HTTP failure is classified by its status, not its text.
///
/// **WHY THIS MATTERS**: The client builds messages like `HTTP 504: Gateway Timeout`
/// from the canonical reason; reading "timeout" out of them would make 504 and
/// 408 retryable and retry them against the backend.
///
/// **BUG THIS CATCHES**: Would catch the message timeout check being applied to
/// `RawFailure::Http`.
#[test]
fn given_http_failure_mentioning_timeout_when_classifying_then_status_decides() {
    // GIVEN
    let gateway_timeout = RawFailure::Http {
        status: HttpStatusCode(504),
        message: "HTTP 504: Gateway Timeout".to_string(),
    };
    let request_timeout = RawFailure::Http {
        status: HttpStatusCode(408),
        message: "HTTP 408: Request Timeout".to_string(),
    };
    let unavailable = RawFailure::Http {
        status: HttpStatusCode(503),
        message: "upstream request timeout".to_string(),
    };
    let classifier = ErrorClassifier::new();

    // WHEN
    let gateway_timeout = classifier.classify(&gateway_timeout, ErrorContext::new());
    let request_timeout = classifier.classify(&request_timeout, ErrorContext::new());
    let unavailable = classifier.classify(&unavailable, ErrorContext::new());

    // THEN
    assert_eq!(gateway_timeout.kind, ErrorKind::Unknown);
    assert!(!gateway_timeout.retryable);
    assert_eq!(request_timeout.kind, ErrorKind::Unknown);
    assert!(!request_timeout.retryable);
    assert_eq!(unavailable.kind, ErrorKind::ServiceUnavailable);
    assert_eq!(unavailable.severity, Severity::High);
}

/// **VALUE**: Verifies untyped failures still detect timeouts from their text.
#[test]
fn given_untyped_message_mentioning_timeout_when_classifying_then_timeout() {
    assert_eq!(
        ErrorClassifier::kind_and_severity(&other("operation timeout after 30000ms")).0,
        ErrorKind::Timeout
    );
    assert_eq!(
        ErrorClassifier::kind_and_severity(&other("HTTP 503 timed out")).0,
        ErrorKind::Timeout
    );
}

/// **VALUE**: Verifies every status in a message is checked, in rule order.
///
/// **WHY THIS MATTERS**: Proxies wrap upstream errors, so the code that matters
/// is not always the first number in the message.
///
/// **BUG THIS CATCHES**: Would catch only the first status-like number being used.
#[test]
fn given_message_with_several_statuses_when_classifying_then_any_match_counts() {
    // GIVEN
    let wrapped = other("upstream 500 after 503");
    let mixed = other("retry 503 then got 401");

    // WHEN / THEN
    assert_eq!(
        wrapped.statuses(),
        vec![HttpStatusCode(500), HttpStatusCode(503)]
    );
    assert_eq!(
        ErrorClassifier::kind_and_severity(&wrapped).0,
        ErrorKind::ServiceUnavailable
    );
    // Authentication precedes service_unavailable in the rule order.
    assert_eq!(
        ErrorClassifier::kind_and_severity(&mixed).0,
        ErrorKind::Authentication
    );
}

/// **VALUE**: Verifies status codes are recovered from message text.
///
/// **WHY THIS MATTERS**: Failures raised by callers often only carry a message
/// such as `HTTP 503: Service Unavailable`.
///
/// **BUG THIS CATCHES**: Would catch the regex fallback being dropped.
#[test]
fn given_untyped_message_with_status_when_classifying_then_extracts_status() {
    assert_eq!(
        ErrorClassifier::kind_and_severity(&other("HTTP 503: Service Unavailable")).0,
        ErrorKind::ServiceUnavailable
    );
    assert_eq!(
        ErrorClassifier::kind_and_severity(&other("request failed with 401")).0,
        ErrorKind::Authentication
    );
    assert_eq!(
        ErrorClassifier::kind_and_severity(&other("port 80503 closed")).0,
        ErrorKind::Unknown
    );
    assert_eq!(
        ErrorClassifier::kind_and_severity(&other("")).0,
        ErrorKind::Unknown
    );
}

/// **VALUE**: Verifies classification is idempotent on structured fields.
///
/// **BUG THIS CATCHES**: Would catch severity or retryability leaking randomness
/// from the guidance phrase selection.
#[test]
fn given_same_failure_when_classified_twice_then_same_structured_fields() {
    let classifier = ErrorClassifier::new();

    for raw in [http(429), http(503), http(400), other("timed out")] {
        let first = classifier.classify(&raw, ErrorContext::new());
        let second = classifier.classify(&raw, ErrorContext::new());

        assert_eq!(first.kind, second.kind);
        assert_eq!(first.severity, second.severity);
        assert_eq!(first.retryable, second.retryable);
        assert_eq!(first.retry_after, second.retry_after);
        assert_eq!(first.message, second.message);
    }
}

/// **VALUE**: Verifies retryability depends only on kind.
///
/// **WHY THIS MATTERS**: Severity orders messaging; it must never gate retries.
///
/// **BUG THIS CATCHES**: Would catch a high-severity network error being
/// treated as fatal.
#[test]
fn given_each_kind_when_checking_retryable_then_matches_kind_set() {
    assert!(ErrorKind::Network.is_retryable());
    assert!(ErrorKind::ServiceUnavailable.is_retryable());
    assert!(ErrorKind::Timeout.is_retryable());
    assert!(ErrorKind::RateLimit.is_retryable());
    assert!(!ErrorKind::Authentication.is_retryable());
    assert!(!ErrorKind::Validation.is_retryable());
    assert!(!ErrorKind::Unknown.is_retryable());
}

/// **VALUE**: Verifies rate limits carry the 60 second hint and nothing else does.
#[test]
fn given_rate_limit_when_classifying_then_sets_retry_after() {
    let classifier = ErrorClassifier::new();

    let limited = classifier.classify(&http(429), ErrorContext::new());
    let unavailable = classifier.classify(&http(503), ErrorContext::new());

    assert_eq!(limited.retry_after, Some(RATE_LIMIT_RETRY_AFTER));
    assert_eq!(unavailable.retry_after, None);
}

/// **VALUE**: Verifies guidance comes from the phrase set for the kind.
#[test]
fn given_classified_error_when_reading_guidance_then_phrase_matches_kind() {
    let error = ErrorClassifier::new().classify(&http(503), ErrorContext::new());

    assert!(phrases_for(ErrorKind::ServiceUnavailable).contains(&error.guidance));
}

/// **VALUE**: Verifies the handler attaches the fallback for the context's operation.
///
/// **WHY THIS MATTERS**: The dashboard substitutes canned content on failure;
/// the lookup must key on the operation, not the endpoint.
///
/// **BUG THIS CATCHES**: Would catch an alias that no longer resolves.
#[test]
fn given_operation_with_fallback_when_handling_then_fallback_attached() {
    // GIVEN
    let handler = ErrorHandler::new(
        FallbackCatalog::new(),
        RetryPolicy::default().with_jitter(FixedJitter(0.0)),
    );
    let context = ErrorContext::new()
        .with_component("TarotPanel")
        .with_operation("fetchTarotReading")
        .with_attempt(2);

    // WHEN
    let disposition = handler.handle(&http(503), context);

    // THEN
    assert!(disposition.retryable());
    assert!(disposition.fallback_available());
    assert_eq!(disposition.retry_delay, Duration::from_millis(2_000));
    assert_eq!(disposition.error.context.get(ErrorContext::COMPONENT), Some("TarotPanel"));
}

/// **VALUE**: Verifies an unknown operation yields no fallback and the rate
/// limit hint overrides the backoff.
#[test]
fn given_unknown_operation_and_rate_limit_when_handling_then_no_fallback_and_hint_delay() {
    let handler = ErrorHandler::default();
    let context = ErrorContext::new().with_operation("somethingElse");

    let disposition = handler.handle(&http(429), context);

    assert!(!disposition.fallback_available());
    assert_eq!(disposition.retry_delay, RATE_LIMIT_RETRY_AFTER);
}
