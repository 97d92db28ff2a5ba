//! Dashboard configuration: optional `dashboard.toml`, then environment overrides.

use crate::error::config::ConfigError;

use common::ErrorLocation;
use models::ServiceId;

use std::collections::BTreeMap;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "dashboard.toml";
pub const CONFIG_DIR_NAME: &str = "spiritual-dashboard";

pub const ORIGIN_HOST_ENV: &str = "DASHBOARD_ORIGIN_HOST";
pub const TIMEOUT_ENV: &str = "API_TIMEOUT_MS";

const LOCAL_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

// ============================================
// CONFIG STRUCTS
// ============================================

/// Per-service override from `[services.<ID>]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOverride {
    pub url: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Host the dashboard is served from. Drives the default service URLs.
    #[serde(default = "default_origin_host")]
    pub origin_host: String,

    /// Applies to every service without its own `timeout_ms`.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,

    /// Keyed by registry key (`TAROT_SERVICE`) or slug (`tarot-reader`).
    #[serde(default)]
    pub services: BTreeMap<String, ServiceOverride>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            origin_host: default_origin_host(),
            request_timeout_ms: None,
            services: BTreeMap::new(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_origin_host() -> String {
    "localhost".to_string()
}

/// Default directory holding `dashboard.toml`.
#[track_caller]
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| ConfigError::DirectoryNotFound {
            location: ErrorLocation::from(Location::caller()),
            reason: "platform config directory is not available".to_string(),
        })
}

/// `http://localhost:<port>` for local origins, `http://<host>:<port>` otherwise.
pub fn default_base_url(origin_host: &str, service: ServiceId) -> String {
    let host = origin_host.trim();
    let host = if host.is_empty() || LOCAL_HOSTS.contains(&host) {
        "localhost"
    } else {
        host
    };
    format!("http://{host}:{}", service.default_port())
}

// ============================================
// IMPLEMENTATION
// ============================================

impl DashboardConfig {
    /// Load config from `{config_dir}/dashboard.toml`.
    ///
    /// Returns defaults if the file is missing, and an error if it exists but
    /// cannot be read, parsed or validated.
    #[track_caller]
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {e}");
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: DashboardConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// File (if any), then `.env`, then process environment.
    #[track_caller]
    pub fn load_layered(config_dir: &Path) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let mut config = Self::load(config_dir)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Empty values are ignored; an
    /// unparsable timeout is logged and ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(host) = lookup(ORIGIN_HOST_ENV) {
            self.origin_host = host.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(timeout_ms) => {
                    // The variable overrides every service timeout, file overrides included.
                    self.request_timeout_ms = Some(timeout_ms);
                    for service_override in self.services.values_mut() {
                        service_override.timeout_ms = None;
                    }
                }
                Err(e) => warn!("Ignoring {TIMEOUT_ENV}={raw}: {e}"),
            }
        }

        for service in ServiceId::ALL {
            if let Some(url) = lookup(service.url_env_var()) {
                self.override_for_mut(service).url = Some(url.trim().to_string());
            }
        }
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a service key is unknown, a URL is not
    /// http(s), or a timeout is zero.
    #[track_caller]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.origin_host.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "origin_host cannot be empty".to_string(),
            });
        }

        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "request_timeout_ms must be non-zero".to_string(),
            });
        }

        for (key, service_override) in &self.services {
            let service: ServiceId = key.parse()?;

            if let Some(url) = &service_override.url {
                let parsed = url::Url::parse(url)?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(ConfigError::ValidationError {
                        location: ErrorLocation::from(Location::caller()),
                        reason: format!("{service} url must be http or https: {url}"),
                    });
                }
            }

            if service_override.timeout_ms == Some(0) {
                return Err(ConfigError::ValidationError {
                    location: ErrorLocation::from(Location::caller()),
                    reason: format!("{service} timeout_ms must be non-zero"),
                });
            }
        }

        Ok(())
    }

    /// Override entry for `service`, matching either key form.
    pub fn override_for(&self, service: ServiceId) -> Option<&ServiceOverride> {
        self.services
            .get(service.key())
            .or_else(|| self.services.get(service.slug()))
    }

    fn override_for_mut(&mut self, service: ServiceId) -> &mut ServiceOverride {
        let key = if self.services.contains_key(service.slug()) {
            service.slug()
        } else {
            service.key()
        };
        self.services.entry(key.to_string()).or_default()
    }

    pub fn base_url_for(&self, service: ServiceId) -> String {
        self.override_for(service)
            .and_then(|o| o.url.clone())
            .unwrap_or_else(|| default_base_url(&self.origin_host, service))
    }

    /// Service override, then the global timeout, then the service default.
    /// After [`Self::apply_env`] with `API_TIMEOUT_MS` set, the global timeout wins.
    pub fn timeout_for(&self, service: ServiceId) -> Duration {
        let timeout_ms = self
            .override_for(service)
            .and_then(|o| o.timeout_ms)
            .or(self.request_timeout_ms)
            .unwrap_or(service.default_timeout_ms());
        Duration::from_millis(timeout_ms)
    }
}
