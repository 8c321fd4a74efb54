//! # HTTP Client
//!
//! The shared HTTP client every API wrapper goes through.
//!
//! It owns a pooled `reqwest::Client` configured with the backend base URL,
//! a request timeout and JSON content negotiation, and adds three things on
//! top:
//!
//! - **Bearer auth**: the current session token (if any) is read from a
//!   [`TokenSlot`] on every request
//! - **Logging**: request, response and error lines (see
//!   [`super::log_format`]) at debug/error level, inside a span carrying a
//!   per-request id
//! - **Retries**: idempotent requests run under [`super::retry::with_retry`]

use futures::future::{AbortHandle, AbortRegistration, Abortable};
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared::ErrorResponse;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use super::log_format::{format_error_log, format_request_log, format_response_log, is_response_successful};
use super::retry::{with_retry, RetryConfig};
use crate::config::ClientConfig;
use crate::core::error::{ClientError, Result};

/// Shared, swappable bearer token.
///
/// The session store writes it on login/logout; the HTTP client reads it on
/// every request. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct TokenSlot(Arc<RwLock<Option<String>>>);

impl TokenSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let slot = Self::new();
        slot.set(Some(token.into()));
        slot
    }

    pub fn get(&self) -> Option<String> {
        self.0.read().clone()
    }

    pub fn set(&self, token: Option<String>) {
        *self.0.write() = token;
    }

    pub fn clear(&self) {
        self.set(None);
    }
}

/// A request against the backend, independent of any `reqwest` builder so it
/// can be replayed on retry.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the base URL (`/requests/3`), or an absolute URL
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append the fields of a serializable struct as query parameters.
    ///
    /// `null` fields are skipped, arrays repeat the key, nested objects are
    /// sent as JSON text.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self> {
        match serde_json::to_value(params)? {
            Value::Null => {}
            Value::Object(map) => {
                for (key, value) in map {
                    push_query_value(&mut self.query, &key, value);
                }
            }
            other => {
                return Err(ClientError::Request(format!(
                    "query parameters must serialize to an object, got {}",
                    other
                )))
            }
        }
        Ok(self)
    }

    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

fn push_query_value(query: &mut Vec<(String, String)>, key: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::String(s) => query.push((key.to_string(), s)),
        Value::Array(items) => {
            for item in items {
                push_query_value(query, key, item);
            }
        }
        other => query.push((key.to_string(), other.to_string())),
    }
}

/// Decoded response with its status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub data: T,
}

/// Cancels a request started with [`HttpClient::send_cancellable`].
#[derive(Debug, Clone)]
pub struct CancelHandle(AbortHandle);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_aborted()
    }
}

/// Create a cancel handle and the registration to pass to
/// [`HttpClient::send_cancellable`].
pub fn create_cancel_handle() -> (CancelHandle, AbortRegistration) {
    let (handle, registration) = AbortHandle::new_pair();
    (CancelHandle(handle), registration)
}

/// HTTP client for the marketplace backend.
///
/// Cheap to clone; clones share the connection pool and the token slot.
#[derive(Debug, Clone)]
pub struct HttpClient {
    pub(crate) client: Client,
    base_url: String,
    retry: RetryConfig,
    token: TokenSlot,
}

/// Build a standalone client for `base_url` with default retries and no
/// session token.
pub fn create_http_client(base_url: &str, timeout: Duration) -> Result<HttpClient> {
    HttpClient::new(base_url, timeout, RetryConfig::default(), TokenSlot::new())
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration, retry: RetryConfig, token: TokenSlot) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
            token,
        })
    }

    pub fn from_config(config: &ClientConfig, token: TokenSlot) -> Result<Self> {
        Self::new(&config.api_base_url, config.timeout, config.retry.clone(), token)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    pub fn token_slot(&self) -> &TokenSlot {
        &self.token
    }

    /// Resolve a path against the base URL. Absolute URLs pass through.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Send with the client's own retry policy.
    pub async fn send<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<ApiResponse<T>> {
        self.request_with_retry(request, &self.retry).await
    }

    /// Send and keep only the decoded body.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(&request).await.map(|response| response.data)
    }

    /// Send under an explicit retry policy.
    pub async fn request_with_retry<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        retry: &RetryConfig,
    ) -> Result<ApiResponse<T>> {
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::debug_span!(
            "http_request",
            request_id = %request_id,
            method = %request.method,
            path = %request.path
        );

        with_retry(retry, &request.method, &request.path, |attempt| {
            self.send_once(request, attempt)
        })
        .instrument(span)
        .await
    }

    /// Send, resolving to [`ClientError::Cancelled`] if the handle paired with
    /// `registration` is cancelled first.
    pub async fn send_cancellable<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        registration: AbortRegistration,
    ) -> Result<ApiResponse<T>> {
        match Abortable::new(self.send(request), registration).await {
            Ok(result) => result,
            Err(_aborted) => {
                tracing::debug!(method = %request.method, path = %request.path, "Request cancelled");
                Err(ClientError::Cancelled)
            }
        }
    }

    /// One attempt, no retries.
    pub async fn send_once<T: DeserializeOwned>(&self, request: &ApiRequest, attempt: u32) -> Result<ApiResponse<T>> {
        let url = self.url(&request.path);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = self.token.get() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let http_request = builder.build().map_err(|e| {
            tracing::error!("Request error: {}", format_error_log(Some(&request.method), &url, None, &e.to_string(), None));
            ClientError::Request(e.to_string())
        })?;

        tracing::debug!(
            attempt = attempt,
            "Request: {}",
            format_request_log(
                Some(http_request.method()),
                http_request.url().as_str(),
                http_request.headers(),
                request.body.as_ref()
            )
        );

        let start = Instant::now();
        let response = self.client.execute(http_request).await.map_err(|e| {
            let err = ClientError::from(e);
            tracing::error!(
                attempt = attempt,
                duration_ms = start.elapsed().as_millis() as u64,
                "Response error: {}",
                format_error_log(Some(&request.method), &url, None, &err.to_string(), None)
            );
            err
        })?;

        self.finish_response(&request.method, &url, response, attempt, start).await
    }

    /// Read the body and turn the response into data or a typed error.
    pub(crate) async fn finish_response<T: DeserializeOwned>(
        &self,
        method: &Method,
        url: &str,
        response: reqwest::Response,
        attempt: u32,
        start: Instant,
    ) -> Result<ApiResponse<T>> {
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response body: {}", e)))?;
        let duration_ms = start.elapsed().as_millis() as u64;
        let json: Option<Value> = if bytes.is_empty() {
            None
        } else {
            serde_json::from_slice(&bytes).ok()
        };

        if is_response_successful(status) {
            tracing::debug!(
                status = status,
                attempt = attempt,
                duration_ms = duration_ms,
                "Response: {}",
                format_response_log(Some(method), url, status, json.as_ref())
            );
            let data = decode_body::<T>(&bytes).map_err(|e| {
                tracing::error!(error = %e, url = %url, "Response parse error");
                e
            })?;
            Ok(ApiResponse { status, data })
        } else {
            let message = json
                .as_ref()
                .and_then(|body| serde_json::from_value::<ErrorResponse>(body.clone()).ok())
                .and_then(|body| body.message);
            tracing::error!(
                status = status,
                attempt = attempt,
                duration_ms = duration_ms,
                "Response error: {}",
                format_error_log(Some(method), url, Some(status), message.as_deref().unwrap_or(""), json.as_ref())
            );
            let err = ClientError::Http {
                status,
                message,
                body: json,
            };
            Err(err)
        }
    }
}

/// Decode a response body. Empty bodies decode as `null`, then as `{}`, so
/// both `()`/`Option<T>` and all-default structs accept "204 No Content".
pub(crate) fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_slice(b"null")
            .or_else(|_| serde_json::from_slice(b"{}"))
            .map_err(|e| ClientError::Decode(format!("empty response body: {}", e)));
    }
    serde_json::from_slice(bytes).map_err(ClientError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{MessageResponse, RequestQuery, SortOrder};

    #[test]
    fn test_url_joining() {
        let client = create_http_client("http://127.0.0.1:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:5000/api");
        assert_eq!(client.url("/users/me"), "http://127.0.0.1:5000/api/users/me");
        assert_eq!(client.url("users/me"), "http://127.0.0.1:5000/api/users/me");
        assert_eq!(client.url("https://api.ipify.org"), "https://api.ipify.org");
    }

    #[test]
    fn test_query_flattening() {
        let query = RequestQuery::default()
            .page(2, 10)
            .sorted_by("price", SortOrder::Asc);
        let request = ApiRequest::get("/requests").query(&query).unwrap();
        assert_eq!(
            request.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("pageSize".to_string(), "10".to_string()),
                ("sortBy".to_string(), "price".to_string()),
                ("sortOrder".to_string(), "asc".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_arrays_repeat_key_and_none_is_skipped() {
        let request = ApiRequest::get("/x")
            .query(&serde_json::json!({"tags": ["a", "b"], "skip": null}))
            .unwrap()
            .query(&Option::<RequestQuery>::None)
            .unwrap();
        assert_eq!(
            request.query,
            vec![("tags".to_string(), "a".to_string()), ("tags".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn test_query_rejects_scalars() {
        assert!(matches!(ApiRequest::get("/x").query(&5), Err(ClientError::Request(_))));
    }

    #[test]
    fn test_decode_empty_body() {
        let unit: () = decode_body(b"").unwrap();
        assert_eq!(unit, ());
        let message: MessageResponse = decode_body(b"  ").unwrap();
        assert_eq!(message.message, "");
        assert!(matches!(decode_body::<u32>(b"not json"), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_token_slot_is_shared_between_clones() {
        let slot = TokenSlot::new();
        let clone = slot.clone();
        slot.set(Some("abc".into()));
        assert_eq!(clone.get().as_deref(), Some("abc"));
        clone.clear();
        assert!(slot.get().is_none());
    }

    #[test]
    fn test_cancel_handle_flags() {
        let (handle, _registration) = create_cancel_handle();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());
    }
}
