//! The unified request layer.
//!
//! Every call goes through [`SpiritualApiClient::request`]: resolve, build
//! headers, run request interceptors, consult the cache, send with a
//! deadline, classify failures, cache, run response interceptors.

pub mod interceptor;
pub mod response;

pub use interceptor::{
    BearerAuth, RequestInterceptor, RequestTracking, ResponseInterceptor, ResponseLogging,
};
pub use response::{ApiResponse, OutgoingRequest, Recovered, RequestOptions, ServiceHealthReport};

use crate::cache::{ResponseCache, is_cache_eligible};
use crate::classifier::{ErrorHandler, RawFailure};
use crate::error::{ClientError, ErrorContext};
use crate::fallback::FallbackCatalog;
use crate::registry::ServiceRegistry;
use crate::retry::{RetryPolicy, with_retry};
use crate::token_store::TokenStore;
use crate::{CLIENT_NAME, CLIENT_VERSION, USER_AGENT};

use common::HttpStatusCode;
use models::{
    BirthData, BookQueryRequest, ChatRequest, CompatibilityRequest, HealthStatus, ServiceId,
    TarotReadingRequest,
};

use std::sync::Arc;
use std::time::SystemTime;

use futures_util::future::join_all;
use log::{debug, warn};
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

const COMPONENT: &str = "SpiritualApiClient";
const JSON_CONTENT_TYPE: &str = "application/json";

const CLIENT_HEADER: HeaderName = HeaderName::from_static("x-client");
const VERSION_HEADER: HeaderName = HeaderName::from_static("x-version");
const DATE_HEADER: &str = "x-date";
const TIME_HEADER: &str = "x-time";

/// Operation names carried in error context; the fallback catalog keys on them.
pub mod operation {
    pub const REQUEST: &str = "request";
    pub const SPIRITUAL_CHAT: &str = "spiritualChat";
    pub const FETCH_MODELS: &str = "fetchModels";
    pub const FETCH_TAROT_READING: &str = "fetchTarotReading";
    pub const GENERATE_CHART: &str = "generateChart";
    pub const QUERY_BOOKS: &str = "queryBooks";
    pub const HEALTH_CHECK: &str = "healthCheck";
}

#[derive(Clone)]
pub struct SpiritualApiClient {
    http: Client,
    registry: Arc<ServiceRegistry>,
    cache: Arc<ResponseCache>,
    token_store: Arc<dyn TokenStore>,
    handler: ErrorHandler,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl SpiritualApiClient {
    /// Client with the default interceptors: request tracking, bearer auth
    /// from `token_store`, and response logging.
    pub fn new(
        registry: Arc<ServiceRegistry>,
        token_store: Arc<dyn TokenStore>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            registry,
            cache: Arc::new(ResponseCache::default()),
            handler: ErrorHandler::default(),
            request_interceptors: vec![
                Arc::new(RequestTracking),
                Arc::new(BearerAuth::new(Arc::clone(&token_store))),
            ],
            response_interceptors: vec![Arc::new(ResponseLogging)],
            token_store,
        })
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.handler = ErrorHandler::new(FallbackCatalog::new(), policy);
        self
    }

    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn add_request_interceptor(&mut self, interceptor: impl RequestInterceptor + 'static) {
        self.request_interceptors.push(Arc::new(interceptor));
    }

    pub fn add_response_interceptor(&mut self, interceptor: impl ResponseInterceptor + 'static) {
        self.response_interceptors.push(Arc::new(interceptor));
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.token_store
    }

    pub fn handler(&self) -> &ErrorHandler {
        &self.handler
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Single attempt against `endpoint` on `service`.
    pub async fn request(
        &self,
        service: &str,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ClientError> {
        self.request_as(service, endpoint, options, operation::REQUEST)
            .await
    }

    /// [`Self::request`] tagged with `operation` in any resulting error.
    pub async fn request_as(
        &self,
        service: &str,
        endpoint: &str,
        options: RequestOptions,
        operation: &str,
    ) -> Result<ApiResponse, ClientError> {
        let descriptor = self.registry.lookup(service)?;
        let id = descriptor.id;

        let query: Vec<(&str, Option<&str>)> = options
            .query
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
            .collect();
        let url = self.registry.resolve(service, endpoint, &query)?;
        let cache_key = url.to_string();

        let mut headers = default_headers(id);
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }

        let mut outgoing = OutgoingRequest {
            service: id,
            endpoint: endpoint.to_string(),
            method: options.method,
            url,
            headers,
            body: options.body,
            timeout: options.timeout.unwrap_or(descriptor.timeout()),
        };

        for interceptor in &self.request_interceptors {
            interceptor.intercept(&mut outgoing).await?;
        }

        let cacheable = is_cache_eligible(&outgoing.method, &cache_key);
        if cacheable {
            if let Some(hit) = self.cache.get(&cache_key) {
                return Ok(hit);
            }
        }

        debug!("{} {} ({id}/{endpoint})", outgoing.method, outgoing.url);

        let mut response = match self.send(&outgoing).await {
            Ok(response) => response,
            Err(raw) => {
                let context = ErrorContext::new()
                    .with_component(COMPONENT)
                    .with_operation(operation)
                    .with(ErrorContext::SERVICE, id)
                    .with(ErrorContext::ENDPOINT, endpoint)
                    .with(ErrorContext::URL, &cache_key);
                return Err(self.fail(&raw, context));
            }
        };

        if cacheable {
            self.cache.put(&cache_key, response.clone());
        }

        for interceptor in &self.response_interceptors {
            interceptor.intercept(&mut response).await?;
        }

        Ok(response)
    }

    /// [`Self::request_as`] under the client's retry policy.
    pub async fn request_with_retry(
        &self,
        service: &str,
        endpoint: &str,
        options: RequestOptions,
        operation: &str,
    ) -> Result<ApiResponse, ClientError> {
        let context = ErrorContext::new()
            .with_component(COMPONENT)
            .with_operation(operation);

        with_retry(self.handler.policy(), context, || {
            self.request_as(service, endpoint, options.clone(), operation)
        })
        .await
    }

    /// Live response, or the canned payload for `operation` when the request
    /// fails and a payload exists. The failure is returned alongside.
    pub async fn request_with_fallback(
        &self,
        service: &str,
        endpoint: &str,
        options: RequestOptions,
        operation: &str,
    ) -> Result<Recovered, ClientError> {
        match self.request_as(service, endpoint, options, operation).await {
            Ok(response) => Ok(Recovered::Live(response)),
            Err(ClientError::Spiritual(error)) => match self.handler.catalog().lookup(operation) {
                Some(data) => {
                    warn!("{operation}: serving offline fallback ({})", error.kind);
                    Ok(Recovered::Fallback { data, error })
                }
                None => Err(ClientError::Spiritual(error)),
            },
            Err(other) => Err(other),
        }
    }

    async fn send(&self, request: &OutgoingRequest) -> Result<ApiResponse, RawFailure> {
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, headers, body))
        };

        // Elapsing drops `exchange`, which cancels the in-flight call.
        let (status, headers, body) = match tokio::time::timeout(request.timeout, exchange).await {
            Ok(result) => result.map_err(RawFailure::from)?,
            Err(_) => {
                return Err(RawFailure::Timeout {
                    message: format!("Request timeout after {} ms", request.timeout.as_millis()),
                });
            }
        };

        let status_text = status.canonical_reason().unwrap_or_default().to_string();

        if !status.is_success() {
            return Err(RawFailure::Http {
                status: HttpStatusCode(status.as_u16()),
                message: format!("HTTP {}: {status_text}", status.as_u16()),
            });
        }

        let is_json = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.contains(JSON_CONTENT_TYPE));

        let data = if !is_json {
            Value::String(body)
        } else if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).map_err(|e| RawFailure::Other {
                message: format!("Invalid JSON body: {e}"),
            })?
        };

        Ok(ApiResponse {
            data,
            status_code: status.as_u16(),
            status_text,
            headers,
            service: request.service,
            endpoint: request.endpoint.clone(),
            timestamp: SystemTime::now(),
        })
    }

    #[track_caller]
    fn fail(&self, raw: &RawFailure, context: ErrorContext) -> ClientError {
        if matches!(raw, RawFailure::Http { status, .. } if status.as_u16() == 401) {
            match self.token_store.clear() {
                Ok(()) => warn!("Received 401, cleared stored auth token"),
                Err(e) => warn!("Received 401, failed to clear auth token: {e}"),
            }
        }

        ClientError::Spiritual(self.handler.handle(raw, context).error)
    }

    // ============================================
    // SERVICE CONVENIENCE METHODS
    // ============================================

    pub async fn spiritual_chat(&self, chat: &ChatRequest) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::post_json(chat)?;
        self.request_as(ServiceId::SpiritualApi.key(), "chat", options, operation::SPIRITUAL_CHAT)
            .await
    }

    pub async fn available_models(&self) -> Result<ApiResponse, ClientError> {
        self.request_as(
            ServiceId::SpiritualApi.key(),
            "models",
            RequestOptions::get(),
            operation::FETCH_MODELS,
        )
        .await
    }

    pub async fn tarot_reading(
        &self,
        reading: &TarotReadingRequest,
    ) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::post_json(reading)?;
        self.request_as(
            ServiceId::Tarot.key(),
            "reading",
            options,
            operation::FETCH_TAROT_READING,
        )
        .await
    }

    pub async fn tarot_spreads(&self) -> Result<ApiResponse, ClientError> {
        self.request(ServiceId::Tarot.key(), "spreads", RequestOptions::get())
            .await
    }

    pub async fn tarot_cards(&self) -> Result<ApiResponse, ClientError> {
        self.request(ServiceId::Tarot.key(), "cards", RequestOptions::get())
            .await
    }

    pub async fn birth_chart(&self, birth: &BirthData) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::post_json(birth)?;
        self.request_as(
            ServiceId::Astrology.key(),
            "birthChart",
            options,
            operation::GENERATE_CHART,
        )
        .await
    }

    pub async fn compatibility(
        &self,
        request: &CompatibilityRequest,
    ) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::post_json(request)?;
        self.request(ServiceId::Astrology.key(), "compatibility", options)
            .await
    }

    pub async fn planetary_positions(
        &self,
        date: &str,
        time: &str,
    ) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::get()
            .try_header(DATE_HEADER, date)?
            .try_header(TIME_HEADER, time)?;
        self.request(ServiceId::Astrology.key(), "planets", options)
            .await
    }

    pub async fn query_books(&self, query: &BookQueryRequest) -> Result<ApiResponse, ClientError> {
        let options = RequestOptions::post_json(query)?;
        self.request_as(
            ServiceId::BookChat.key(),
            "query",
            options,
            operation::QUERY_BOOKS,
        )
        .await
    }

    pub async fn book_stats(&self) -> Result<ApiResponse, ClientError> {
        self.request(ServiceId::BookChat.key(), "stats", RequestOptions::get())
            .await
    }

    pub async fn available_books(&self) -> Result<ApiResponse, ClientError> {
        self.request(ServiceId::BookChat.key(), "books", RequestOptions::get())
            .await
    }

    /// Health of one service, or of every service concurrently.
    ///
    /// Request failures become `unhealthy` reports; only an unknown service
    /// name is an error.
    pub async fn check_service_health(
        &self,
        service: Option<&str>,
    ) -> Result<Vec<ServiceHealthReport>, ClientError> {
        let ids: Vec<ServiceId> = match service {
            Some(name) => vec![self.registry.lookup(name)?.id],
            None => self.registry.services().map(|d| d.id).collect(),
        };

        let probes = ids.into_iter().map(|id| async move {
            let result = self
                .request_as(id.key(), "health", RequestOptions::get(), operation::HEALTH_CHECK)
                .await;
            match result {
                Ok(response) => ServiceHealthReport {
                    service: id,
                    status: HealthStatus::Healthy,
                    data: Some(response.data),
                    error: None,
                },
                Err(e) => ServiceHealthReport {
                    service: id,
                    status: HealthStatus::Unhealthy,
                    data: None,
                    error: Some(
                        e.as_spiritual()
                            .map(|spiritual| spiritual.message.clone())
                            .unwrap_or_else(|| e.to_string()),
                    ),
                },
            }
        });

        Ok(join_all(probes).await)
    }
}

pub(crate) fn default_headers(id: ServiceId) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(CLIENT_HEADER, HeaderValue::from_static(CLIENT_NAME));
    headers.insert(VERSION_HEADER, HeaderValue::from_static(CLIENT_VERSION));
    for (name, value) in ServiceRegistry::service_headers(id) {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}
