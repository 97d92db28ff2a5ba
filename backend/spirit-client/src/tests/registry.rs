use crate::config::DashboardConfig;
use crate::error::ConfigError;
use crate::registry::{CONTEXT_HEADER, SERVICE_HEADER, ServiceRegistry, endpoint_path};

use models::ServiceId;

fn local() -> ServiceRegistry {
    ServiceRegistry::with_defaults("localhost").unwrap()
}

/// **VALUE**: Verifies named endpoints resolve through the per-service table.
#[test]
fn given_named_endpoints_when_resolving_then_uses_table() {
    let registry = local();

    assert_eq!(
        registry.resolve("TAROT_SERVICE", "reading", &[]).unwrap().as_str(),
        "http://localhost:7870/reading"
    );
    assert_eq!(
        registry.resolve("ASTROLOGY_SERVICE", "birthChart", &[]).unwrap().as_str(),
        "http://localhost:7871/birth_chart"
    );
    assert_eq!(
        registry.resolve("GATEWAY_SERVICE", "models", &[]).unwrap().as_str(),
        "http://localhost:8091/api/models/available"
    );
    assert_eq!(
        registry.resolve("GATEWAY_SERVICE", "health", &[]).unwrap().as_str(),
        "http://localhost:8091/api/health"
    );
    assert_eq!(
        registry.resolve("book-chat-api", "stats", &[]).unwrap().as_str(),
        "http://localhost:8002/stats"
    );
}

/// **VALUE**: Verifies unknown endpoint keys are used as literal paths.
///
/// **BUG THIS CATCHES**: Would catch a missing leading slash producing
/// `http://localhost:7870reading/save`.
#[test]
fn given_unknown_endpoint_when_resolving_then_used_as_path() {
    let registry = local();

    assert_eq!(
        registry.resolve("TAROT_SERVICE", "/reading/save", &[]).unwrap().as_str(),
        "http://localhost:7870/reading/save"
    );
    assert_eq!(
        registry.resolve("TAROT_SERVICE", "decks", &[]).unwrap().as_str(),
        "http://localhost:7870/decks"
    );
    assert_eq!(endpoint_path(ServiceId::Tarot, "cards"), "/cards");
}

/// **VALUE**: Verifies query parameters are encoded and `None` values skipped.
#[test]
fn given_query_params_when_resolving_then_appended_and_encoded() {
    let url = local()
        .resolve(
            "BOOK_CHAT_SERVICE",
            "books",
            &[("category", Some("mystic texts")), ("page", None), ("limit", Some("5"))],
        )
        .unwrap();

    assert_eq!(
        url.as_str(),
        "http://localhost:8002/books?category=mystic+texts&limit=5"
    );
}

/// **VALUE**: Verifies unknown services are configuration errors.
///
/// **WHY THIS MATTERS**: The client must not classify or retry a typo.
#[test]
fn given_unknown_service_when_resolving_then_config_error() {
    let result = local().resolve("ORACLE_SERVICE", "reading", &[]);

    assert!(matches!(
        result,
        Err(ConfigError::UnknownService { ref name, .. }) if name == "ORACLE_SERVICE"
    ));
}

/// **VALUE**: Verifies websocket URLs swap the scheme.
#[test]
fn given_http_and_https_bases_when_resolving_websocket_then_ws_and_wss() {
    let mut config = DashboardConfig::default();
    config.services.insert(
        "GATEWAY_SERVICE".to_string(),
        crate::config::ServiceOverride {
            url: Some("https://gateway.example.com".to_string()),
            timeout_ms: None,
        },
    );
    let registry = ServiceRegistry::from_config(&config).unwrap();

    assert_eq!(
        registry.resolve_websocket("SPIRITUAL_API", None).unwrap().as_str(),
        "ws://localhost:8001/ws"
    );
    assert_eq!(
        registry
            .resolve_websocket("GATEWAY_SERVICE", Some("stream"))
            .unwrap()
            .as_str(),
        "wss://gateway.example.com/stream"
    );
}

/// **VALUE**: Verifies remote origins produce host-qualified defaults.
///
/// **WHY THIS MATTERS**: When the dashboard is served from another machine,
/// `localhost` would point at the viewer's own box.
#[test]
fn given_remote_origin_when_building_defaults_then_uses_origin_host() {
    let registry = ServiceRegistry::with_defaults("dashboard.lan").unwrap();

    let tarot = registry.descriptor(ServiceId::Tarot).unwrap();
    assert_eq!(tarot.base_url, "http://dashboard.lan:7870");

    let local = ServiceRegistry::with_defaults("127.0.0.1").unwrap();
    assert_eq!(
        local.descriptor(ServiceId::Tarot).unwrap().base_url,
        "http://localhost:7870"
    );
}

/// **VALUE**: Verifies every service has its default port and timeout.
#[test]
fn given_defaults_when_listing_services_then_five_with_expected_values() {
    let registry = local();
    let services: Vec<_> = registry.services().collect();

    assert_eq!(services.len(), 5);
    let astrology = registry.descriptor(ServiceId::Astrology).unwrap();
    assert_eq!(astrology.timeout_ms, 60_000);
    assert_eq!(astrology.health_url(), "http://localhost:7871/health");
}

/// **VALUE**: Verifies the identification headers per service.
///
/// **WHY THIS MATTERS**: Backends route and log on `X-Service`; the book chat
/// service and the gateway expect tags that differ from their slugs.
///
/// **BUG THIS CATCHES**: Would catch the slug being sent in place of the tag.
#[test]
fn given_service_when_building_headers_then_tag_and_context() {
    // GIVEN / WHEN
    let tarot = ServiceRegistry::service_headers(ServiceId::Tarot);
    let book_chat = ServiceRegistry::service_headers(ServiceId::BookChat);
    let gateway = ServiceRegistry::service_headers(ServiceId::Gateway);

    // THEN
    assert_eq!(tarot[0], (SERVICE_HEADER, "tarot-reader"));
    assert_eq!(tarot[1], (CONTEXT_HEADER, "divination"));
    assert_eq!(book_chat[0], (SERVICE_HEADER, "book-chat"));
    assert_eq!(book_chat[1], (CONTEXT_HEADER, "ancient-knowledge"));
    assert_eq!(gateway[0], (SERVICE_HEADER, "dashboard-api"));
    assert_eq!(gateway[1], (CONTEXT_HEADER, "spiritual-dashboard"));
}
