use crate::ServiceId;

use std::time::Duration;

use serde::Serialize;

/// Static description of one backend service.
///
/// Built once at startup through [`crate::ServiceDescriptorBuilder`] and
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub id: ServiceId,
    pub name: String,
    pub base_url: String,
    pub health_path: String,
    pub timeout_ms: u64,
}

impl ServiceDescriptor {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Base URL without a trailing slash.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.trimmed_base_url(), self.health_path)
    }
}
