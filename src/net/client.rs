//! HTTP client wrapper for the Zao backends.
//!
//! One instance per backend (app API, weather, news), each with its own
//! base URL and a fixed request timeout. Every failure is normalized
//! into a [`DataError::Remote`] whose [`ErrorKind`] is assigned here,
//! so downstream policy code branches on the kind instead of matching
//! message text. No retries at this layer; offline fallback lives in
//! the use cases.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{DataError, ErrorKind};

/// Thin reqwest wrapper bound to one backend.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteClient {
    /// Creates a client for a backend base URL with a per-request
    /// timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DataError::remote(
                    ErrorKind::Unknown,
                    format!("Failed to build HTTP client: {}", e),
                )
            })?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { http, base_url })
    }

    /// Returns the backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET a path, returning the unwrapped response payload.
    pub async fn get(&self, path: &str) -> Result<Value, DataError> {
        self.execute(self.http.get(self.url(path)), path).await
    }

    /// GET a path with query parameters.
    pub async fn get_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, DataError> {
        self.execute(self.http.get(self.url(path)).query(query), path)
            .await
    }

    /// POST a JSON body, returning the unwrapped response payload.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, DataError> {
        self.execute(self.http.post(self.url(path)).json(body), path)
            .await
    }

    /// Reachability probe used before sync replays. Any HTTP response,
    /// including an error status, counts as reachable.
    pub async fn is_reachable(&self) -> bool {
        self.http.get(self.url("/")).send().await.is_ok()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<Value, DataError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let (kind, message) = if e.is_timeout() {
                    (ErrorKind::Timeout, format!("Request to {} timed out", path))
                } else {
                    (ErrorKind::Network, format!("Network error: {}", e))
                };
                tracing::warn!(path, %message, "request failed");
                return Err(DataError::remote(kind, message));
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(path, status = %status, body = %body, "request failed");
            return Err(DataError::remote(
                classify_status(status),
                error_message(status, &body),
            ));
        }

        tracing::debug!(path, status = %status, "request completed");

        if body.is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(path, error = %e, "malformed response body");
            DataError::remote(ErrorKind::Unknown, "Malformed response from server")
        })?;

        Ok(unwrap_envelope(value))
    }
}

/// Maps an HTTP status to a failure kind at the point of origin.
fn classify_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::REQUEST_TIMEOUT => ErrorKind::Timeout,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            ErrorKind::Gateway
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Unauthorized,
        _ => ErrorKind::Unknown,
    }
}

/// Picks the user-facing message: server-provided `message` field
/// first, then the HTTP status line.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }
    status.to_string()
}

/// Strips the `{"data": ...}` envelope when the backend used one.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
