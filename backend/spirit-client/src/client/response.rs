use crate::error::{ClientError, SpiritualError};

use common::ErrorLocation;
use models::ServiceId;

use std::panic::Location;
use std::time::{Duration, SystemTime};

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

/// A completed HTTP exchange with its decoded body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse {
    pub data: Value,
    pub status_code: u16,
    pub status_text: String,
    #[serde(skip)]
    pub headers: HeaderMap,
    pub service: ServiceId,
    pub endpoint: String,
    pub timestamp: SystemTime,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Deserialize the body into `T`.
    #[track_caller]
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Either a live response or a canned payload standing in for one.
#[derive(Debug, Clone)]
pub enum Recovered {
    Live(ApiResponse),
    /// The request failed; `error` says why `data` is a fallback.
    Fallback { data: Value, error: SpiritualError },
}

impl Recovered {
    pub fn data(&self) -> &Value {
        match self {
            Recovered::Live(response) => &response.data,
            Recovered::Fallback { data, .. } => data,
        }
    }

    pub fn into_data(self) -> Value {
        match self {
            Recovered::Live(response) => response.data,
            Recovered::Fallback { data, .. } => data,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Recovered::Fallback { .. })
    }

    pub fn error(&self) -> Option<&SpiritualError> {
        match self {
            Recovered::Live(_) => None,
            Recovered::Fallback { error, .. } => Some(error),
        }
    }
}

/// Caller-supplied parts of a request.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
    pub query: Vec<(String, Option<String>)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
            query: Vec::new(),
        }
    }

    pub fn post_json<T: Serialize>(body: &T) -> Result<Self, ClientError> {
        Ok(Self {
            method: Method::POST,
            body: Some(serde_json::to_value(body)?),
            ..Self::get()
        })
    }

    /// Add a header, rejecting names or values that are not valid HTTP.
    #[track_caller]
    pub fn try_header(mut self, name: &str, value: &str) -> Result<Self, ClientError> {
        let location = ErrorLocation::from(Location::caller());
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ClientError::InvalidHeader {
                message: format!("{name}: {e}"),
                location,
            }
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
            message: format!("{name}: {e}"),
            location,
        })?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Append a query parameter. `None` values are dropped at resolve time.
    pub fn with_query(mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        self.query.push((key.into(), value.map(Into::into)));
        self
    }
}

/// Fully resolved request as seen by request interceptors.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    pub service: ServiceId,
    pub endpoint: String,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Outcome of one service's health request.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealthReport {
    pub service: ServiceId,
    pub status: models::HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
