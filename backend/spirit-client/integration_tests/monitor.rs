use crate::helpers::registry_for;

use spirit_client::{NetworkEvent, NetworkStatusMonitor};

use models::{HealthStatus, HealthSummary, ServiceId};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Verifies the offline short-circuit sends no requests at all.
///
/// **WHY THIS MATTERS**: Probing without connectivity only burns five-second
/// timeouts per service.
///
/// **BUG THIS CATCHES**: Would catch the online check moving after the request.
#[tokio::test]
async fn given_offline_when_checking_all_then_no_requests_and_all_offline() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let monitor = NetworkStatusMonitor::new(registry_for(&server)).unwrap();
    monitor.set_online(false);

    // WHEN
    let summary = monitor.check_all().await;

    // THEN
    for id in ServiceId::ALL {
        assert_eq!(monitor.status(id), HealthStatus::Offline);
    }
    assert_eq!(summary.total, 5);
    assert_eq!(summary.healthy, 0);
}

/// **VALUE**: Verifies probe outcomes map to healthy, unhealthy and error.
#[tokio::test]
async fn given_mixed_services_when_checking_all_then_summary_counts() {
    // GIVEN: Gateway unhealthy, the rest healthy
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let monitor = NetworkStatusMonitor::new(registry_for(&server)).unwrap();
    let summaries = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&summaries);
    let _subscription = monitor.subscribe(move |event| {
        if let NetworkEvent::HealthCheck(summary) = event {
            sink.lock().unwrap().push(*summary);
        }
    });

    // WHEN
    let summary = monitor.check_all().await;

    // THEN
    assert_eq!(
        summary,
        HealthSummary {
            total: 5,
            healthy: 4,
            unhealthy: 1,
            errors: 0
        }
    );
    assert_eq!(monitor.status(ServiceId::Gateway), HealthStatus::Unhealthy);
    assert_eq!(*summaries.lock().unwrap(), vec![summary]);
}

/// **VALUE**: Verifies a probe past its deadline is recorded as an error.
#[tokio::test]
async fn given_slow_health_when_probing_then_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;
    let monitor = NetworkStatusMonitor::new(registry_for(&server))
        .unwrap()
        .with_probe_timeout(Duration::from_millis(50));

    let healthy = monitor.check_service(ServiceId::Tarot).await;

    assert!(!healthy);
    assert_eq!(monitor.status(ServiceId::Tarot), HealthStatus::Error);
}

/// **VALUE**: Verifies an unreachable service is recorded as an error.
#[tokio::test]
async fn given_unreachable_service_when_probing_then_error() {
    let server = MockServer::start().await;
    let registry = registry_for(&server);
    drop(server);
    let monitor = NetworkStatusMonitor::new(registry).unwrap();

    let healthy = monitor.check_named("SPIRITUAL_API").await.unwrap();

    assert!(!healthy);
    assert_eq!(monitor.status(ServiceId::SpiritualApi), HealthStatus::Error);
}
