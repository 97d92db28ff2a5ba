//! Request and response hooks run by [`super::SpiritualApiClient`].
//!
//! Interceptors run one at a time in insertion order. Request interceptors
//! may rewrite the outgoing request; response interceptors only see
//! successful responses.

use super::response::{ApiResponse, OutgoingRequest};
use crate::error::ClientError;
use crate::token_store::TokenStore;

use common::ErrorLocation;

use std::panic::Location;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures_util::future::BoxFuture;
use humantime::format_rfc3339_millis;
use log::debug;
use reqwest::header::{AUTHORIZATION, HeaderValue};

pub const REQUEST_ID_HEADER: &str = "x-request-id";
pub const REQUEST_TIME_HEADER: &str = "x-request-time";

const REQUEST_ID_SUFFIX_LEN: usize = 9;

pub trait RequestInterceptor: Send + Sync {
    fn intercept<'a>(
        &'a self,
        request: &'a mut OutgoingRequest,
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}

pub trait ResponseInterceptor: Send + Sync {
    fn intercept<'a>(
        &'a self,
        response: &'a mut ApiResponse,
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}

/// `req_{unix millis}_{9 random chars}`.
pub fn new_request_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(REQUEST_ID_SUFFIX_LEN)
        .collect();
    format!("req_{millis}_{suffix}")
}

#[track_caller]
fn header_value(name: &str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
        message: format!("{name}: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Stamps `X-Request-ID` and `X-Request-Time`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTracking;

impl RequestInterceptor for RequestTracking {
    fn intercept<'a>(
        &'a self,
        request: &'a mut OutgoingRequest,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let id = new_request_id();
            let time = format_rfc3339_millis(SystemTime::now()).to_string();
            request
                .headers
                .insert(REQUEST_ID_HEADER, header_value(REQUEST_ID_HEADER, &id)?);
            request
                .headers
                .insert(REQUEST_TIME_HEADER, header_value(REQUEST_TIME_HEADER, &time)?);
            Ok(())
        })
    }
}

/// Adds `Authorization: Bearer …` when the store holds a token.
#[derive(Clone)]
pub struct BearerAuth {
    store: Arc<dyn TokenStore>,
}

impl BearerAuth {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

impl RequestInterceptor for BearerAuth {
    fn intercept<'a>(
        &'a self,
        request: &'a mut OutgoingRequest,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            if let Some(token) = self.store.load()? {
                let mut value = header_value(AUTHORIZATION.as_str(), &token.bearer_header_value())?;
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Ok(())
        })
    }
}

/// Debug-logs each successful response.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseLogging;

impl ResponseInterceptor for ResponseLogging {
    fn intercept<'a>(
        &'a self,
        response: &'a mut ApiResponse,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            debug!(
                "Dashboard API success: {}/{} status={} at {}",
                response.service,
                response.endpoint,
                response.status_code,
                format_rfc3339_millis(response.timestamp)
            );
            Ok(())
        })
    }
}
