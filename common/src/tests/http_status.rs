use crate::HttpStatusCode;

/// **VALUE**: Verifies the status families the classifier branches on.
///
/// **WHY THIS MATTERS**: The error classifier maps these predicates directly to
/// error kinds; a wrong predicate silently changes retry eligibility.
///
/// **BUG THIS CATCHES**: Would catch 504 sneaking into the unavailable set or
/// 403 falling out of the auth set.
#[test]
fn given_status_codes_when_categorized_then_match_classifier_families() {
    assert!(HttpStatusCode(401).is_auth_failure());
    assert!(HttpStatusCode(403).is_auth_failure());
    assert!(HttpStatusCode(400).is_validation_failure());
    assert!(HttpStatusCode(422).is_validation_failure());
    assert!(HttpStatusCode(429).is_rate_limited());
    assert!(HttpStatusCode(502).is_service_unavailable());
    assert!(HttpStatusCode(503).is_service_unavailable());
    assert!(!HttpStatusCode(504).is_service_unavailable());
    assert!(!HttpStatusCode(404).is_validation_failure());
}

#[test]
fn given_boundary_codes_when_checking_ranges_then_ranges_are_half_open() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(299).is_success());
    assert!(!HttpStatusCode(300).is_success());
    assert!(HttpStatusCode(499).is_client_error());
    assert!(!HttpStatusCode(500).is_client_error());
    assert!(HttpStatusCode(599).is_server_error());
    assert_eq!(HttpStatusCode::from(418).to_string(), "418");
}
