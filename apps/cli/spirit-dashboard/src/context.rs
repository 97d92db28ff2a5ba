use crate::error::DashboardError;

use spirit_client::{
    DashboardConfig, NetworkStatusMonitor, ServiceRegistry, SpiritualApiClient, TokenStore,
};

use std::sync::Arc;

use log::debug;

/// Everything a command needs, built once per invocation.
pub struct AppContext {
    pub config: DashboardConfig,
    pub registry: Arc<ServiceRegistry>,
    pub client: SpiritualApiClient,
    pub monitor: NetworkStatusMonitor,
    pub token_store: Arc<dyn TokenStore>,
}

impl AppContext {
    pub fn new(
        config: DashboardConfig,
        token_store: Arc<dyn TokenStore>,
    ) -> Result<Self, DashboardError> {
        let registry = Arc::new(ServiceRegistry::from_config(&config)?);
        let client = SpiritualApiClient::new(Arc::clone(&registry), Arc::clone(&token_store))?;
        let monitor = NetworkStatusMonitor::new(Arc::clone(&registry))?;

        debug!(
            "Context ready: {} services, origin {}",
            registry.services().count(),
            config.origin_host
        );

        Ok(Self {
            config,
            registry,
            client,
            monitor,
            token_store,
        })
    }
}
