use spirit_dashboard::cli::Command;
use spirit_dashboard::commands::run;
use spirit_dashboard::context::AppContext;
use spirit_dashboard::error::DashboardError;

use spirit_client::config::ServiceOverride;
use spirit_client::{DashboardConfig, FileTokenStore, TokenStore};

use models::ServiceId;

use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Integration tests for CLI commands against mocked services
// ============================================================================

fn context_for(server: &MockServer, token_dir: &TempDir) -> AppContext {
    let mut config = DashboardConfig::default();
    for id in ServiceId::ALL {
        config.services.insert(
            id.key().to_string(),
            ServiceOverride {
                url: Some(server.uri()),
                timeout_ms: Some(2_000),
            },
        );
    }
    AppContext::new(config, Arc::new(FileTokenStore::new(token_dir.path()))).unwrap()
}

/// **VALUE**: Verifies `tarot --fallback` prints the offline reading on 503.
///
/// **WHY THIS MATTERS**: This is what a user sees when the tarot service is down.
#[tokio::test]
async fn given_tarot_down_when_running_tarot_with_fallback_then_offline_output() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reading"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let ctx = context_for(&server, &dir);

    // WHEN
    let output = run(
        Command::Tarot {
            question: "Will it rain?".to_string(),
            spread: "single_card".to_string(),
            deck: "rider_waite".to_string(),
            fallback: true,
        },
        &ctx,
    )
    .await
    .unwrap();

    // THEN
    assert_eq!(output["offline"], true);
    assert_eq!(output["error"]["kind"], "service_unavailable");
    assert_eq!(output["data"]["cards"][0]["card"]["name"], "The Star");
}

/// **VALUE**: Verifies a failure without `--fallback` is an error with its kind.
#[tokio::test]
async fn given_chart_rejected_when_running_without_fallback_then_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/birth_chart"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let ctx = context_for(&server, &dir);

    let result = run(
        Command::Chart {
            date: "1990-08-08".to_string(),
            time: "07:30".to_string(),
            location: "Lisbon".to_string(),
            fallback: false,
        },
        &ctx,
    )
    .await;

    assert!(matches!(
        result,
        Err(DashboardError::Client { kind: Some(ref kind), .. }) if kind == "validation"
    ));
}

/// **VALUE**: Verifies login persists a token that later requests send.
///
/// **BUG THIS CATCHES**: Would catch the bearer interceptor reading a different
/// store than the one `login` writes.
#[tokio::test]
async fn given_login_when_chatting_then_bearer_header_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "peace"})))
        .expect(1)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let ctx = context_for(&server, &dir);

    // WHEN
    let login = run(Command::Login { token: "abc".to_string() }, &ctx).await.unwrap();
    let chat = run(Command::Chat { message: "hello".to_string() }, &ctx).await.unwrap();

    // THEN
    assert_eq!(login["logged_in"], true);
    assert_ne!(login["token"], "abc");
    assert_eq!(chat["response"], "peace");

    run(Command::Logout, &ctx).await.unwrap();
    assert!(ctx.token_store.load().unwrap().is_none());
}

/// **VALUE**: Verifies `urls` lists every service with resolved endpoints.
#[tokio::test]
async fn given_registry_when_running_urls_then_all_services_listed() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let ctx = context_for(&server, &dir);

    let output = run(Command::Urls, &ctx).await.unwrap();

    let services = output.as_object().unwrap();
    assert_eq!(services.len(), 5);
    assert_eq!(
        output["GATEWAY_SERVICE"]["endpoints"]["bookChat"],
        format!("{}/api/book-chat", server.uri())
    );
    assert!(
        output["TAROT_SERVICE"]["websocket_url"]
            .as_str()
            .unwrap()
            .starts_with("ws://")
    );
}

/// **VALUE**: Verifies `monitor --offline` reports every service offline.
#[tokio::test]
async fn given_offline_flag_when_running_monitor_then_all_offline() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let ctx = context_for(&server, &dir);

    let output = run(
        Command::Monitor {
            rounds: 1,
            interval: 0,
            offline: true,
        },
        &ctx,
    )
    .await
    .unwrap();

    assert_eq!(output["online"], false);
    assert_eq!(output["rounds"][0]["healthy"], 0);
    assert!(
        output["services"]
            .as_array()
            .unwrap()
            .iter()
            .all(|record| record["status"] == "offline")
    );
}

/// **VALUE**: Verifies `health` reports per service.
#[tokio::test]
async fn given_healthy_services_when_running_health_then_reports() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let ctx = context_for(&server, &dir);

    let output = run(
        Command::Health {
            service: Some("ASTROLOGY_SERVICE".to_string()),
        },
        &ctx,
    )
    .await
    .unwrap();

    assert_eq!(output[0]["service"], "ASTROLOGY_SERVICE");
    assert_eq!(output[0]["status"], "healthy");
}
