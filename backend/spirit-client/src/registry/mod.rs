//! Static table of backend services and their endpoints.

pub mod endpoints;

pub use endpoints::endpoint_path;

use crate::config::{DashboardConfig, default_base_url};
use crate::error::config::ConfigError;

use common::ErrorLocation;
use models::{ServiceDescriptor, ServiceDescriptorBuilder, ServiceId};

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::panic::Location;

use log::debug;
use url::Url;

pub const SERVICE_HEADER: &str = "x-service";
pub const CONTEXT_HEADER: &str = "x-context";

const DEFAULT_WEBSOCKET_PATH: &str = "/ws";

/// Immutable after construction; share through `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistry {
    services: BTreeMap<ServiceId, ServiceDescriptor>,
}

impl ServiceRegistry {
    /// Defaults for a dashboard served from `origin_host`.
    pub fn with_defaults(origin_host: &str) -> Result<Self, ConfigError> {
        let descriptors = ServiceId::ALL
            .into_iter()
            .map(|id| {
                ServiceDescriptorBuilder::default()
                    .with_id(id)
                    .with_base_url(default_base_url(origin_host, id))
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_descriptors(descriptors))
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self, ConfigError> {
        let descriptors = ServiceId::ALL
            .into_iter()
            .map(|id| {
                ServiceDescriptorBuilder::default()
                    .with_id(id)
                    .with_base_url(config.base_url_for(id))
                    .with_timeout_ms(config.timeout_for(id).as_millis() as u64)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let registry = Self::from_descriptors(descriptors);
        for descriptor in registry.services() {
            debug!(
                "Registered {} at {} (timeout {} ms)",
                descriptor.id, descriptor.base_url, descriptor.timeout_ms
            );
        }
        Ok(registry)
    }

    /// Later descriptors replace earlier ones with the same id.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ServiceDescriptor>) -> Self {
        Self {
            services: descriptors.into_iter().map(|d| (d.id, d)).collect(),
        }
    }

    pub fn descriptor(&self, id: ServiceId) -> Option<&ServiceDescriptor> {
        self.services.get(&id)
    }

    /// Descriptor by registry key or slug.
    #[track_caller]
    pub fn lookup(&self, service: &str) -> Result<&ServiceDescriptor, ConfigError> {
        let location = ErrorLocation::from(Location::caller());
        let unknown = || ConfigError::UnknownService {
            location,
            name: service.to_string(),
        };

        let id: ServiceId = service.parse().map_err(|_| unknown())?;
        self.services.get(&id).ok_or_else(unknown)
    }

    pub fn services(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.values()
    }

    /// Absolute URL for `endpoint` on `service`, with `query` appended.
    ///
    /// Known endpoint keys map through the per-service table; anything else
    /// is treated as a literal path.
    #[track_caller]
    pub fn resolve(
        &self,
        service: &str,
        endpoint: &str,
        query: &[(&str, Option<&str>)],
    ) -> Result<Url, ConfigError> {
        let descriptor = self.lookup(service)?;
        let path = match endpoint {
            "health" => Cow::Borrowed(descriptor.health_path.as_str()),
            other => endpoint_path(descriptor.id, other),
        };
        let mut url = Url::parse(&format!("{}{path}", descriptor.trimmed_base_url()))?;

        let pairs: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(key, value)| value.map(|value| (*key, value)))
            .collect();

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    /// `ws://` / `wss://` URL for `path` (default `/ws`) on `service`.
    #[track_caller]
    pub fn resolve_websocket(&self, service: &str, path: Option<&str>) -> Result<Url, ConfigError> {
        let descriptor = self.lookup(service)?;
        let base = descriptor.trimmed_base_url();

        let ws_base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            base.to_string()
        };

        let path = normalize_path(path.unwrap_or(DEFAULT_WEBSOCKET_PATH));
        Ok(Url::parse(&format!("{ws_base}{path}"))?)
    }

    /// `X-Service` and `X-Context` for `id`.
    pub fn service_headers(id: ServiceId) -> [(&'static str, &'static str); 2] {
        [(SERVICE_HEADER, id.service_tag()), (CONTEXT_HEADER, id.context())]
    }
}

pub(crate) fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
