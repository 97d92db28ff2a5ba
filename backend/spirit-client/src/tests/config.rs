use crate::config::{
    CONFIG_FILE_NAME, DashboardConfig, ServiceOverride, TIMEOUT_ENV, default_base_url,
};
use crate::error::ConfigError;

use models::ServiceId;

use std::collections::HashMap;
use std::time::Duration;

use serial_test::serial;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

/// **VALUE**: Verifies a missing config file yields defaults.
///
/// **WHY THIS MATTERS**: First launch has no file; the dashboard must still start.
#[test]
fn given_missing_file_when_loading_then_defaults() {
    let dir = TempDir::new().unwrap();

    let config = DashboardConfig::load(dir.path()).unwrap();

    assert_eq!(config, DashboardConfig::default());
    assert_eq!(config.origin_host, "localhost");
}

/// **VALUE**: Verifies the TOML layout is parsed including service overrides.
#[test]
fn given_valid_file_when_loading_then_parses_overrides() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"
origin_host = "dashboard.lan"
request_timeout_ms = 15000

[services.TAROT_SERVICE]
url = "https://tarot.example.com"
timeout_ms = 5000
"#,
    )
    .unwrap();

    // WHEN
    let config = DashboardConfig::load(dir.path()).unwrap();

    // THEN
    assert_eq!(config.origin_host, "dashboard.lan");
    assert_eq!(config.base_url_for(ServiceId::Tarot), "https://tarot.example.com");
    assert_eq!(config.timeout_for(ServiceId::Tarot), Duration::from_millis(5_000));
    assert_eq!(config.timeout_for(ServiceId::Astrology), Duration::from_millis(15_000));
    assert_eq!(config.base_url_for(ServiceId::BookChat), "http://dashboard.lan:8002");
}

/// **VALUE**: Verifies a corrupt file is reported instead of silently ignored.
#[test]
fn given_corrupt_file_when_loading_then_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "origin_host = [").unwrap();

    let result = DashboardConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: Verifies validation rejects unknown service keys and bad URLs.
///
/// **BUG THIS CATCHES**: Would catch a typo like `TAROT` being accepted and
/// then silently ignored.
#[test]
fn given_invalid_overrides_when_validating_then_errors() {
    let mut unknown = DashboardConfig::default();
    unknown
        .services
        .insert("TAROT".to_string(), ServiceOverride::default());
    assert!(matches!(
        unknown.validate(),
        Err(ConfigError::UnknownService { .. })
    ));

    let mut bad_scheme = DashboardConfig::default();
    bad_scheme.services.insert(
        "tarot-reader".to_string(),
        ServiceOverride {
            url: Some("ftp://tarot".to_string()),
            timeout_ms: None,
        },
    );
    assert!(matches!(
        bad_scheme.validate(),
        Err(ConfigError::ValidationError { .. })
    ));

    let zero_timeout = DashboardConfig {
        request_timeout_ms: Some(0),
        ..DashboardConfig::default()
    };
    assert!(zero_timeout.validate().is_err());
}

/// **VALUE**: Verifies environment overrides and their precedence.
///
/// **WHY THIS MATTERS**: Deployments configure services through the environment.
///
/// **BUG THIS CATCHES**: Would catch the gateway reading the wrong variable,
/// or a per-service timeout from the file surviving `API_TIMEOUT_MS`.
#[test]
fn given_env_overrides_when_applying_then_replace_file_values() {
    // GIVEN
    let mut config = DashboardConfig::default();
    config.services.insert(
        "ASTROLOGY_SERVICE".to_string(),
        ServiceOverride {
            url: None,
            timeout_ms: Some(1_000),
        },
    );

    // WHEN
    config.apply_env_from(env(&[
        ("DASHBOARD_ORIGIN_HOST", "10.0.0.5"),
        ("API_BASE_URL", "http://gateway:9000"),
        ("TAROT_SERVICE_URL", ""),
        (TIMEOUT_ENV, "20000"),
    ]));

    // THEN
    assert_eq!(config.base_url_for(ServiceId::Gateway), "http://gateway:9000");
    assert_eq!(config.base_url_for(ServiceId::Tarot), "http://10.0.0.5:7870");
    assert_eq!(config.timeout_for(ServiceId::Tarot), Duration::from_millis(20_000));
    assert_eq!(config.timeout_for(ServiceId::Astrology), Duration::from_millis(20_000));
    assert!(config.validate().is_ok());
}

/// **VALUE**: Verifies an unparsable timeout is ignored.
#[test]
fn given_garbage_timeout_when_applying_env_then_keeps_default() {
    let mut config = DashboardConfig::default();

    config.apply_env_from(env(&[(TIMEOUT_ENV, "soon")]));

    assert_eq!(config.request_timeout_ms, None);
    assert_eq!(config.timeout_for(ServiceId::Gateway), Duration::from_millis(25_000));
}

/// **VALUE**: Verifies the real process environment is read.
#[test]
#[serial]
fn given_process_env_when_applying_then_overrides() {
    // SAFETY: serialized with every other test touching the environment.
    unsafe { std::env::set_var("BOOK_CHAT_URL", "http://books.internal:8002") };

    let mut config = DashboardConfig::default();
    config.apply_env();

    unsafe { std::env::remove_var("BOOK_CHAT_URL") };

    assert_eq!(
        config.base_url_for(ServiceId::BookChat),
        "http://books.internal:8002"
    );
}

/// **VALUE**: Verifies hostname-aware default URLs.
#[test]
fn given_origin_hosts_when_building_default_url_then_localhost_normalized() {
    assert_eq!(default_base_url("localhost", ServiceId::SpiritualApi), "http://localhost:8001");
    assert_eq!(default_base_url("127.0.0.1", ServiceId::SpiritualApi), "http://localhost:8001");
    assert_eq!(default_base_url("", ServiceId::Gateway), "http://localhost:8091");
    assert_eq!(default_base_url("oracle.home", ServiceId::Gateway), "http://oracle.home:8091");
}
