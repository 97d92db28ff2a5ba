use spirit_client::config::ServiceOverride;
use spirit_client::{
    DashboardConfig, FixedJitter, MemoryTokenStore, RetryPolicy, ServiceRegistry,
    SpiritualApiClient, TokenStore,
};

use models::ServiceId;

use std::sync::Arc;
use std::time::Duration;

use wiremock::MockServer;

/// Registry with every service pointed at `server`.
pub fn registry_for(server: &MockServer) -> Arc<ServiceRegistry> {
    let mut config = DashboardConfig::default();
    for id in ServiceId::ALL {
        config.services.insert(
            id.key().to_string(),
            ServiceOverride {
                url: Some(server.uri()),
                timeout_ms: None,
            },
        );
    }
    Arc::new(ServiceRegistry::from_config(&config).unwrap())
}

/// Retry policy fast enough for real sockets.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::default()
        .with_base(Duration::from_millis(1))
        .with_max(Duration::from_millis(5))
        .with_jitter(FixedJitter(0.0))
}

pub fn client_for(server: &MockServer, store: Arc<dyn TokenStore>) -> SpiritualApiClient {
    SpiritualApiClient::new(registry_for(server), store)
        .unwrap()
        .with_retry_policy(fast_policy())
}

pub fn anonymous_client(server: &MockServer) -> SpiritualApiClient {
    client_for(server, Arc::new(MemoryTokenStore::new()))
}
