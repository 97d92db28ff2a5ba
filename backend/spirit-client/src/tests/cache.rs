use crate::cache::{CachePolicy, ResponseCache, is_cache_eligible};
use crate::client::ApiResponse;

use models::ServiceId;

use std::time::{Duration, SystemTime};

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::json;

const MODELS_URL: &str = "http://localhost:8001/models";
const HEALTH_URL: &str = "http://localhost:7870/health";

fn response(data: serde_json::Value) -> ApiResponse {
    ApiResponse {
        data,
        status_code: 200,
        status_text: "OK".to_string(),
        headers: HeaderMap::new(),
        service: ServiceId::SpiritualApi,
        endpoint: "models".to_string(),
        timestamp: SystemTime::now(),
    }
}

/// **VALUE**: Verifies a stored value is returned unchanged within its TTL.
#[tokio::test(start_paused = true)]
async fn given_fresh_entry_when_getting_then_returns_stored_value() {
    // GIVEN
    let cache = ResponseCache::default();
    cache.put(MODELS_URL, response(json!({"models": ["a"]})));

    // WHEN: Just inside the 30 minute models TTL
    tokio::time::advance(Duration::from_secs(29 * 60)).await;
    let hit = cache.get(MODELS_URL);

    // THEN
    assert_eq!(hit.map(|r| r.data), Some(json!({"models": ["a"]})));
}

/// **VALUE**: Verifies expired entries miss and are evicted.
///
/// **WHY THIS MATTERS**: Lazy eviction is the only eviction; a stale entry that
/// is not removed on read would grow the cache forever.
///
/// **BUG THIS CATCHES**: Would catch a read that reports a miss but leaves the entry.
#[tokio::test(start_paused = true)]
async fn given_expired_entry_when_getting_then_miss_and_removed() {
    // GIVEN: Health entries live for one minute
    let cache = ResponseCache::default();
    cache.put(HEALTH_URL, response(json!({"status": "ok"})));
    assert_eq!(cache.len(), 1);

    // WHEN
    tokio::time::advance(Duration::from_secs(60)).await;

    // THEN
    assert!(cache.get(HEALTH_URL).is_none());
    assert!(cache.is_empty());
}

/// **VALUE**: Verifies `put` overwrites and restarts the TTL.
#[tokio::test(start_paused = true)]
async fn given_existing_entry_when_putting_again_then_overwrites() {
    let cache = ResponseCache::default();
    cache.put(HEALTH_URL, response(json!(1)));
    tokio::time::advance(Duration::from_secs(45)).await;

    cache.put(HEALTH_URL, response(json!(2)));
    tokio::time::advance(Duration::from_secs(45)).await;

    assert_eq!(cache.get(HEALTH_URL).map(|r| r.data), Some(json!(2)));
    assert_eq!(cache.len(), 1);
}

/// **VALUE**: Verifies zero-TTL URLs are never stored.
///
/// **BUG THIS CATCHES**: Would catch readings being cached, which would
/// return the same card for every question.
#[test]
fn given_reading_url_when_putting_then_not_stored() {
    let cache = ResponseCache::default();

    cache.put("http://localhost:7870/reading", response(json!({})));

    assert!(cache.is_empty());
}

/// **VALUE**: Verifies the allow-list and method gate.
///
/// **WHY THIS MATTERS**: Caching a POST, or an arbitrary GET like
/// `/reading/save`, would replay side-effecting or personal responses.
///
/// **BUG THIS CATCHES**: Would catch an allow-list that matches too broadly.
#[test]
fn given_urls_when_checking_eligibility_then_only_allow_listed_gets() {
    assert!(is_cache_eligible(&Method::GET, MODELS_URL));
    assert!(is_cache_eligible(&Method::GET, HEALTH_URL));
    assert!(is_cache_eligible(&Method::GET, "http://localhost:7870/spreads"));
    assert!(is_cache_eligible(&Method::GET, "http://localhost:8091/api/models/available"));

    assert!(!is_cache_eligible(&Method::POST, MODELS_URL));
    assert!(!is_cache_eligible(&Method::GET, "http://localhost:7870/reading/save"));
    assert!(!is_cache_eligible(&Method::GET, "http://localhost:8002/books"));
}

/// **VALUE**: Verifies each TTL class.
#[test]
fn given_default_policy_when_looking_up_ttl_then_matches_class() {
    let policy = CachePolicy::default();

    assert_eq!(policy.ttl_for(MODELS_URL), Duration::from_secs(1_800));
    assert_eq!(policy.ttl_for(HEALTH_URL), Duration::from_secs(60));
    assert_eq!(policy.ttl_for("http://h/spreads"), Duration::from_secs(3_600));
    assert_eq!(policy.ttl_for("http://h/books"), Duration::from_secs(900));
    assert_eq!(policy.ttl_for("http://h/birth_chart"), Duration::from_secs(600));
    assert_eq!(policy.ttl_for("http://h/reading"), Duration::ZERO);
    assert_eq!(policy.ttl_for("http://h/stats"), Duration::from_secs(300));
}

/// **VALUE**: Verifies `clear` empties the cache.
#[test]
fn given_entries_when_clearing_then_empty() {
    let cache = ResponseCache::default();
    cache.put(MODELS_URL, response(json!(1)));
    cache.put(HEALTH_URL, response(json!(2)));

    cache.clear();

    assert!(cache.is_empty());
    assert!(cache.get(MODELS_URL).is_none());
}
