use crate::helpers::{anonymous_client, client_for};

use spirit_client::client::{ApiResponse, ResponseInterceptor};
use spirit_client::fallback::OFFLINE_ID_PREFIX;
use spirit_client::{
    ClientError, ErrorKind, MemoryTokenStore, Recovered, RequestOptions, TokenStore,
};

use common::RedactedToken;
use models::{HealthStatus, TarotReadingRequest};

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn kind_of(error: &ClientError) -> Option<ErrorKind> {
    error.as_spiritual().map(|spiritual| spiritual.kind)
}

// ----------------------------------------------------------------------------
// End-to-end failure handling
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies the full path from a 503 to the offline tarot reading.
///
/// **WHY THIS MATTERS**: This is the dashboard's core resilience promise: a
/// failing tarot service still yields a reading, clearly marked offline.
///
/// **BUG THIS CATCHES**: Would catch misclassification of 503, a fallback keyed
/// on the wrong operation, or the error being swallowed.
#[tokio::test]
async fn given_tarot_503_when_requesting_with_fallback_then_the_star_offline() {
    // GIVEN: Tarot service answering 503
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reading"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;
    let client = anonymous_client(&server);
    let reading = TarotReadingRequest::new("What lies ahead?");

    // WHEN: Plain request
    let error = client.tarot_reading(&reading).await.unwrap_err();

    // THEN: Classified as retryable unavailability
    let spiritual = error.as_spiritual().unwrap();
    assert_eq!(spiritual.kind, ErrorKind::ServiceUnavailable);
    assert!(spiritual.retryable);
    assert_eq!(spiritual.operation(), Some("fetchTarotReading"));

    // WHEN: Request with fallback
    let recovered = client
        .request_with_fallback(
            "TAROT_SERVICE",
            "reading",
            RequestOptions::post_json(&reading).unwrap(),
            "fetchTarotReading",
        )
        .await
        .unwrap();

    // THEN: Offline "The Star" with the error alongside
    let Recovered::Fallback { data, error } = recovered else {
        panic!("expected fallback");
    };
    assert_eq!(error.kind, ErrorKind::ServiceUnavailable);
    assert_eq!(data["cards"][0]["card"]["name"], "The Star");
    assert!(data["reading_id"].as_str().unwrap().starts_with(OFFLINE_ID_PREFIX));
}

/// **VALUE**: Verifies a live success is not replaced by a fallback.
#[tokio::test]
async fn given_healthy_service_when_requesting_with_fallback_then_live() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reading"))
        .and(body_json(json!({
            "question": "Love?",
            "spread_type": "three_card",
            "deck": "rider_waite",
            "include_interpretation": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cards": []})))
        .mount(&server)
        .await;
    let client = anonymous_client(&server);
    let reading = TarotReadingRequest::new("Love?").with_spread("three_card");

    let recovered = client
        .request_with_fallback(
            "TAROT_SERVICE",
            "reading",
            RequestOptions::post_json(&reading).unwrap(),
            "fetchTarotReading",
        )
        .await
        .unwrap();

    assert!(!recovered.is_fallback());
    assert_eq!(recovered.data(), &json!({"cards": []}));
}

/// **VALUE**: Verifies unknown services fail as configuration errors before any I/O.
#[tokio::test]
async fn given_unknown_service_when_requesting_then_config_error() {
    let server = MockServer::start().await;
    let client = anonymous_client(&server);

    let error = client
        .request("ORACLE_SERVICE", "reading", RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(error, ClientError::Config(_)));
    assert!(!error.is_retryable());
}

// ----------------------------------------------------------------------------
// Caching
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies allow-listed GETs are served from cache on repeat.
///
/// **BUG THIS CATCHES**: Would catch the cache lookup running after the send.
#[tokio::test]
async fn given_models_cached_when_requesting_twice_then_one_network_call() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": ["x"]})))
        .expect(1)
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    // WHEN
    let first = client.available_models().await.unwrap();
    let second = client.available_models().await.unwrap();

    // THEN
    assert_eq!(first.data, second.data);
    assert_eq!(client.cache().len(), 1);
}

/// **VALUE**: Verifies non-allow-listed GETs always hit the network.
///
/// **WHY THIS MATTERS**: `/reading/save` returns personal, changing data.
#[tokio::test]
async fn given_reading_save_when_requesting_twice_then_two_network_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reading/save"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"saved": true})))
        .expect(2)
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    for _ in 0..2 {
        client
            .request("TAROT_SERVICE", "/reading/save", RequestOptions::get())
            .await
            .unwrap();
    }

    assert!(client.cache().is_empty());
}

/// **VALUE**: Verifies failures are never cached.
#[tokio::test]
async fn given_failed_health_when_requesting_then_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    for _ in 0..2 {
        let error = client
            .request("SPIRITUAL_API", "health", RequestOptions::get())
            .await
            .unwrap_err();
        assert_eq!(kind_of(&error), Some(ErrorKind::Unknown));
    }
}

// ----------------------------------------------------------------------------
// Headers and interceptors
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies default, service, tracking and auth headers all go out.
///
/// **WHY THIS MATTERS**: Backends route and authorize on these headers.
#[tokio::test]
async fn given_stored_token_when_requesting_then_all_headers_sent() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .and(header("x-client", "spiritual-dashboard"))
        .and(header("x-version", "1.0.0"))
        .and(header("x-service", "tarot-reader"))
        .and(header("x-context", "divination"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header_exists("x-request-id"))
        .and(header_exists("x-request-time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let store = Arc::new(MemoryTokenStore::with_token(
        RedactedToken::new("secret-token").unwrap(),
    ));
    let client = client_for(&server, store);

    // WHEN
    let response = client.tarot_cards().await.unwrap();

    // THEN
    assert!(response.is_success());
}

/// **VALUE**: Verifies request ids follow `req_{millis}_{suffix}`.
#[tokio::test]
async fn given_request_when_sent_then_request_id_format() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    client.book_stats().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let id = requests[0].headers.get("x-request-id").unwrap().to_str().unwrap();
    let parts: Vec<&str> = id.split('_').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "req");
    assert!(parts[1].parse::<u128>().is_ok());
    assert_eq!(parts[2].len(), 9);
    assert!(requests[0].headers.get("authorization").is_none());
}

/// **VALUE**: Verifies planetary positions send the date and time headers.
#[tokio::test]
async fn given_date_and_time_when_fetching_planets_then_headers_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/planets"))
        .and(header("x-date", "2024-03-20"))
        .and(header("x-time", "12:00"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sun": "Aries"})))
        .expect(1)
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    let response = client.planetary_positions("2024-03-20", "12:00").await.unwrap();

    assert_eq!(response.data["sun"], "Aries");
}

struct CountingInterceptor(Arc<AtomicU32>);

impl ResponseInterceptor for CountingInterceptor {
    fn intercept<'a>(
        &'a self,
        response: &'a mut ApiResponse,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            self.0.fetch_add(1, Ordering::SeqCst);
            response.data["intercepted"] = json!(true);
            Ok(())
        })
    }
}

/// **VALUE**: Verifies response interceptors run on success only.
#[tokio::test]
async fn given_response_interceptor_when_success_and_failure_then_runs_on_success_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/books"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"books": []})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    let calls = Arc::new(AtomicU32::new(0));
    let mut client = anonymous_client(&server);
    client.add_response_interceptor(CountingInterceptor(Arc::clone(&calls)));

    let books = client.available_books().await.unwrap();
    let stats = client.book_stats().await.unwrap_err();

    assert_eq!(books.data["intercepted"], true);
    assert_eq!(kind_of(&stats), Some(ErrorKind::Validation));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ----------------------------------------------------------------------------
// Auth, timeouts and bodies
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies a 401 clears the stored token.
///
/// **WHY THIS MATTERS**: A rejected token would otherwise be resent forever.
#[tokio::test]
async fn given_401_when_requesting_then_token_cleared() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let store = Arc::new(MemoryTokenStore::with_token(RedactedToken::new("stale").unwrap()));
    let client = client_for(&server, Arc::clone(&store) as Arc<dyn TokenStore>);

    let error = client
        .spiritual_chat(&models::ChatRequest::new("hello"))
        .await
        .unwrap_err();

    assert_eq!(kind_of(&error), Some(ErrorKind::Authentication));
    assert!(store.load().unwrap().is_none());
}

/// **VALUE**: Verifies the per-request deadline yields a timeout error.
///
/// **BUG THIS CATCHES**: Would catch the caller's timeout override being ignored
/// in favour of the 45 second service default.
#[tokio::test]
async fn given_slow_service_when_deadline_elapses_then_timeout_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spreads"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    let error = client
        .request(
            "TAROT_SERVICE",
            "spreads",
            RequestOptions::get().with_timeout(Duration::from_millis(50)),
        )
        .await
        .unwrap_err();

    assert_eq!(kind_of(&error), Some(ErrorKind::Timeout));
    assert!(error.is_retryable());
}

/// **VALUE**: Verifies non-JSON bodies are returned as strings.
#[tokio::test]
async fn given_text_body_when_requesting_then_string_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/motd"))
        .respond_with(ResponseTemplate::new(200).set_body_string("be still"))
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    let response = client
        .request("SPIRITUAL_API", "motd", RequestOptions::get())
        .await
        .unwrap();

    assert_eq!(response.data, json!("be still"));
    assert_eq!(response.status_code, 200);
}

// ----------------------------------------------------------------------------
// Retry and health
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies retryable failures are attempted exactly `max_attempts` times.
#[tokio::test]
async fn given_persistent_503_when_requesting_with_retry_then_three_calls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    let error = client
        .request_with_retry(
            "BOOK_CHAT_SERVICE",
            "query",
            RequestOptions::post_json(&models::BookQueryRequest::new("peace")).unwrap(),
            "queryBooks",
        )
        .await
        .unwrap_err();

    assert_eq!(kind_of(&error), Some(ErrorKind::ServiceUnavailable));
}

/// **VALUE**: Verifies non-retryable failures are attempted once.
#[tokio::test]
async fn given_422_when_requesting_with_retry_then_single_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/birth_chart"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    let error = client
        .request_with_retry(
            "ASTROLOGY_SERVICE",
            "birthChart",
            RequestOptions::post_json(&json!({})).unwrap(),
            "generateChart",
        )
        .await
        .unwrap_err();

    assert_eq!(kind_of(&error), Some(ErrorKind::Validation));
}

/// **VALUE**: Verifies a 504 is not treated as a client-side timeout.
///
/// **WHY THIS MATTERS**: The failure message carries the canonical reason
/// `Gateway Timeout`; classifying it as a timeout would retry a gateway that
/// already gave up, tripling load on it.
///
/// **BUG THIS CATCHES**: Would catch message text overriding the typed status.
#[tokio::test]
async fn given_504_when_requesting_with_retry_then_unknown_and_single_call() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(504))
        .expect(1)
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    // WHEN
    let error = client
        .request_with_retry("SPIRITUAL_API", "models", RequestOptions::get(), "fetchModels")
        .await
        .unwrap_err();

    // THEN
    let spiritual = error.as_spiritual().unwrap();
    assert_eq!(spiritual.message, "HTTP 504: Gateway Timeout");
    assert_eq!(spiritual.kind, ErrorKind::Unknown);
    assert!(!spiritual.retryable);
}

/// **VALUE**: Verifies health reports cover every service and map failures.
#[tokio::test]
async fn given_mixed_health_when_checking_all_then_one_report_per_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let client = anonymous_client(&server);

    let reports = client.check_service_health(None).await.unwrap();

    assert_eq!(reports.len(), 5);
    let unhealthy: Vec<_> = reports
        .iter()
        .filter(|r| r.status == HealthStatus::Unhealthy)
        .collect();
    assert_eq!(unhealthy.len(), 1);
    assert_eq!(unhealthy[0].service, models::ServiceId::Gateway);
    assert!(unhealthy[0].error.is_some());

    let single = client.check_service_health(Some("tarot-reader")).await.unwrap();
    assert_eq!(single.len(), 1);
    assert_eq!(single[0].status, HealthStatus::Healthy);
}
