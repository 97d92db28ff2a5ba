//! HTTP status code utilities for error classification and retry logic.

/// HTTP status code for error categorization.
///
/// Stored directly rather than parsed from error messages whenever the
/// response is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 4xx client errors.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx server errors.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    /// 401 or 403.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.0, 401 | 403)
    }

    /// 400 or 422, the codes the backends use for rejected payloads.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self.0, 400 | 422)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.0 == 429
    }

    /// 502 or 503. A 504 is deliberately not included.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(self.0, 502 | 503)
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
