// Unit tests for error module

use crate::error::DashboardError;

use spirit_client::error::ConfigError;
use spirit_client::{ClientError, ErrorClassifier, ErrorContext, RawFailure};

use common::{ErrorLocation, HttpStatusCode};

use std::panic::Location;

/// **VALUE**: Tests that errors serialize for JSON output.
///
/// **WHY THIS MATTERS**: Failures are printed as JSON on stderr; a non-serializable
/// error would fall back to an opaque string.
///
/// **BUG THIS CATCHES**: Would catch a non-serializable field added to a variant.
#[test]
fn given_dashboard_error_when_serialized_then_succeeds() {
    // GIVEN
    let err = DashboardError::Token {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN
    let json = serde_json::to_string(&err).unwrap();

    // THEN
    assert!(json.contains("Token"), "JSON should contain variant name");
    assert!(json.contains("Test"), "JSON should contain message");
}

/// **VALUE**: Verifies classified failures keep their kind through conversion.
#[test]
fn given_classified_client_error_when_converted_then_kind_kept() {
    // GIVEN
    let raw = RawFailure::Http {
        status: HttpStatusCode(503),
        message: "HTTP 503: Service Unavailable".to_string(),
    };
    let client_error =
        ClientError::Spiritual(ErrorClassifier::new().classify(&raw, ErrorContext::new()));

    // WHEN
    let err = DashboardError::from(client_error);

    // THEN
    match err {
        DashboardError::Client { kind, message, .. } => {
            assert_eq!(kind.as_deref(), Some("service_unavailable"));
            assert!(message.contains("HTTP 503"));
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

/// **VALUE**: Verifies configuration failures map to the Config variant.
#[test]
fn given_config_client_error_when_converted_then_config_variant() {
    let client_error = ClientError::Config(ConfigError::UnknownService {
        location: ErrorLocation::from(Location::caller()),
        name: "NOPE".to_string(),
    });

    let err = DashboardError::from(client_error);

    assert!(matches!(err, DashboardError::Config { ref message, .. } if message.contains("NOPE")));
}
