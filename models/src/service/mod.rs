pub mod builder;
pub mod descriptor;

use crate::{ErrorLocation, ModelError};

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the backend services the dashboard talks to.
///
/// The string form (`TAROT_SERVICE`, ...) is the registry key used by callers
/// and configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ServiceId {
    #[serde(rename = "SPIRITUAL_API")]
    SpiritualApi,
    #[serde(rename = "TAROT_SERVICE")]
    Tarot,
    #[serde(rename = "ASTROLOGY_SERVICE")]
    Astrology,
    #[serde(rename = "BOOK_CHAT_SERVICE")]
    BookChat,
    #[serde(rename = "GATEWAY_SERVICE")]
    Gateway,
}

impl ServiceId {
    pub const ALL: [ServiceId; 5] = [
        ServiceId::SpiritualApi,
        ServiceId::Tarot,
        ServiceId::Astrology,
        ServiceId::BookChat,
        ServiceId::Gateway,
    ];

    /// Registry key.
    pub const fn key(self) -> &'static str {
        match self {
            ServiceId::SpiritualApi => "SPIRITUAL_API",
            ServiceId::Tarot => "TAROT_SERVICE",
            ServiceId::Astrology => "ASTROLOGY_SERVICE",
            ServiceId::BookChat => "BOOK_CHAT_SERVICE",
            ServiceId::Gateway => "GATEWAY_SERVICE",
        }
    }

    /// Short service name, accepted wherever a registry key is.
    pub const fn slug(self) -> &'static str {
        match self {
            ServiceId::SpiritualApi => "spiritual-api",
            ServiceId::Tarot => "tarot-reader",
            ServiceId::Astrology => "astrology-calculator",
            ServiceId::BookChat => "book-chat-api",
            ServiceId::Gateway => "spiritual-gateway",
        }
    }

    /// Human readable name.
    pub const fn display_name(self) -> &'static str {
        match self {
            ServiceId::SpiritualApi => "Spiritual API",
            ServiceId::Tarot => "Tarot Reader",
            ServiceId::Astrology => "Astrology Calculator",
            ServiceId::BookChat => "Book Chat API",
            ServiceId::Gateway => "Spiritual Gateway",
        }
    }

    /// Value of the `X-Service` header. Differs from the slug for the book
    /// chat service and the gateway.
    pub const fn service_tag(self) -> &'static str {
        match self {
            ServiceId::SpiritualApi => "spiritual-api",
            ServiceId::Tarot => "tarot-reader",
            ServiceId::Astrology => "astrology-calculator",
            ServiceId::BookChat => "book-chat",
            ServiceId::Gateway => "dashboard-api",
        }
    }

    /// Value for the `X-Context` header.
    pub const fn context(self) -> &'static str {
        match self {
            ServiceId::SpiritualApi => "spiritual-guidance",
            ServiceId::Tarot => "divination",
            ServiceId::Astrology => "celestial-wisdom",
            ServiceId::BookChat => "ancient-knowledge",
            ServiceId::Gateway => "spiritual-dashboard",
        }
    }

    pub const fn default_port(self) -> u16 {
        match self {
            ServiceId::SpiritualApi => 8001,
            ServiceId::Tarot => 7870,
            ServiceId::Astrology => 7871,
            ServiceId::BookChat => 8002,
            ServiceId::Gateway => 8091,
        }
    }

    pub const fn default_health_path(self) -> &'static str {
        match self {
            ServiceId::Gateway => "/api/health",
            _ => "/health",
        }
    }

    pub const fn default_timeout_ms(self) -> u64 {
        match self {
            ServiceId::SpiritualApi => 30_000,
            ServiceId::Tarot => 45_000,
            ServiceId::Astrology => 60_000,
            ServiceId::BookChat => 30_000,
            ServiceId::Gateway => 25_000,
        }
    }

    /// Environment variable overriding this service's base URL.
    pub const fn url_env_var(self) -> &'static str {
        match self {
            ServiceId::SpiritualApi => "SPIRITUAL_API_URL",
            ServiceId::Tarot => "TAROT_SERVICE_URL",
            ServiceId::Astrology => "ASTROLOGY_SERVICE_URL",
            ServiceId::BookChat => "BOOK_CHAT_URL",
            ServiceId::Gateway => "API_BASE_URL",
        }
    }
}

impl Display for ServiceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        formatter.write_str(self.key())
    }
}

impl FromStr for ServiceId {
    type Err = ModelError;

    /// Accepts the registry key or the slug.
    #[track_caller]
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ServiceId::ALL
            .into_iter()
            .find(|id| id.key() == name || id.slug() == name)
            .ok_or_else(|| ModelError::UnknownService {
                name: name.to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
