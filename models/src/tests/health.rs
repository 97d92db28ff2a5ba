use crate::{HealthStatus, HealthSummary, ServiceHealthRecord, ServiceId};

use std::time::{Duration, SystemTime};

/// **VALUE**: Verifies `last_checked_at` never moves backwards.
///
/// **WHY THIS MATTERS**: Concurrent probes can finish out of order; the UI sorts
/// and ages records by this timestamp.
///
/// **BUG THIS CATCHES**: Would catch `advanced` blindly taking the new timestamp.
#[test]
fn given_older_timestamp_when_advancing_record_then_keeps_latest_time() {
    // GIVEN: A record checked "now"
    let now = SystemTime::now();
    let record = ServiceHealthRecord {
        service: ServiceId::Tarot,
        status: HealthStatus::Healthy,
        last_checked_at: now,
    };

    // WHEN: Advancing with an earlier clock reading
    let earlier = now - Duration::from_secs(5);
    let next = record.advanced(HealthStatus::Error, earlier);

    // THEN: Status changes, timestamp does not regress
    assert_eq!(next.status, HealthStatus::Error);
    assert_eq!(next.last_checked_at, now);
}

#[test]
fn given_mixed_statuses_when_tallying_then_counts_each_bucket() {
    let summary = HealthSummary::tally([
        HealthStatus::Healthy,
        HealthStatus::Healthy,
        HealthStatus::Unhealthy,
        HealthStatus::Offline,
        HealthStatus::Error,
    ]);

    assert_eq!(
        summary,
        HealthSummary {
            total: 5,
            healthy: 2,
            unhealthy: 2,
            errors: 1,
        }
    );
    assert!(!summary.all_healthy());
}

#[test]
fn given_no_statuses_when_tallying_then_not_all_healthy() {
    let summary = HealthSummary::tally(Vec::new());

    assert_eq!(summary.total, 0);
    assert!(!summary.all_healthy());
}

#[test]
fn given_status_when_serialized_then_snake_case() {
    assert_eq!(
        serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
        "\"unhealthy\""
    );
    assert_eq!(HealthStatus::default(), HealthStatus::Unknown);
}
