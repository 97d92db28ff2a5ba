use crate::error::model_error::ModelError;
use crate::{ErrorLocation, ServiceDescriptor, ServiceId};

use std::panic::Location;

/// Builder for creating validated ServiceDescriptor instances.
///
/// Unset optional fields fall back to the per-service defaults on
/// [`ServiceId`]; only the id and base URL are required.
#[derive(Debug, Default)]
pub struct ServiceDescriptorBuilder {
    id: Option<ServiceId>,
    name: Option<String>,
    base_url: Option<String>,
    health_path: Option<String>,
    timeout_ms: Option<u64>,
}

impl ServiceDescriptorBuilder {
    pub fn with_id(mut self, id: ServiceId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = Some(path.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Build the ServiceDescriptor with validation.
    #[track_caller]
    pub fn build(self) -> Result<ServiceDescriptor, ModelError> {
        let id = self.id.ok_or_else(|| ModelError::Validation {
            message: String::from("Service id is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let name = self
            .name
            .unwrap_or_else(|| id.display_name().to_string());

        if name.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Service name cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let base_url = self.base_url.ok_or_else(|| ModelError::Validation {
            message: String::from("Base URL is required"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if base_url.is_empty() {
            return Err(ModelError::Validation {
                message: String::from("Base URL cannot be empty"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ModelError::Validation {
                message: format!("Invalid base URL format: {base_url}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let health_path = self
            .health_path
            .unwrap_or_else(|| id.default_health_path().to_string());

        if !health_path.starts_with('/') {
            return Err(ModelError::Validation {
                message: format!("Health path must start with '/': {health_path}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let timeout_ms = self.timeout_ms.unwrap_or(id.default_timeout_ms());

        if timeout_ms == 0 {
            return Err(ModelError::Validation {
                message: String::from("Timeout must be non-zero"),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(ServiceDescriptor {
            id,
            name,
            base_url,
            health_path,
            timeout_ms,
        })
    }
}
