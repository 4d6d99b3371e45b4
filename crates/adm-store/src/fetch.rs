//! Normalizing HTTP wrapper around the record store.
//!
//! Every exchange, successful or not, is folded into a [`FetchResult`] so the
//! callers only ever branch on `success`. Transport failures and non-JSON
//! answers come back as `success: false` with `status: 0`.

use std::time::Duration;

use reqwest::{
    Client, Method, StatusCode,
    header::{ACCEPT_LANGUAGE, CONTENT_TYPE},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Header carrying the caller's IANA time zone
pub const TIMEZONE_HEADER: &str = "X-timezone-region";

/// Normalized outcome of a single store request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    pub data: Option<Value>,
    pub error: Option<String>,
    pub success: bool,
    pub status: u16,
    pub status_text: String,
}

impl FetchResult {
    /// Result for a request that produced no usable JSON answer.
    pub fn failure(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            data: None,
            error: Some(message.clone()),
            success: false,
            status: 0,
            status_text: message,
        }
    }

    /// Classify a raw response.
    ///
    /// The body must be declared as `application/json`. Objects carrying an
    /// `isSuccess` flag are treated as an envelope (`{data, error, isSuccess}`)
    /// and succeed when either the flag or the HTTP status says so; any other
    /// JSON body is returned whole and succeeds on a 2xx status.
    pub fn from_response(status: StatusCode, content_type: Option<&str>, body: &[u8]) -> Self {
        let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            return Self::failure(format!(
                "Expected JSON response but got {}",
                content_type.unwrap_or("null")
            ));
        }

        let json: Value = match serde_json::from_slice(body) {
            Ok(json) => json,
            Err(e) => return Self::failure(e.to_string()),
        };

        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let ok = status.is_success();

        match json {
            Value::Object(mut envelope) if envelope.contains_key("isSuccess") => {
                let flagged = envelope
                    .get("isSuccess")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let error = match envelope.remove("error") {
                    Some(Value::String(message)) => Some(message),
                    Some(Value::Null) | None => None,
                    Some(other) => Some(other.to_string()),
                };

                Self {
                    data: envelope.remove("data").filter(|d| !d.is_null()),
                    error,
                    success: flagged || ok,
                    status: status.as_u16(),
                    status_text,
                }
            }
            Value::Array(_) | Value::Object(_) => Self {
                data: Some(json),
                error: None,
                success: ok,
                status: status.as_u16(),
                status_text,
            },
            _ => Self {
                data: None,
                error: None,
                success: ok,
                status: status.as_u16(),
                status_text,
            },
        }
    }

    /// Turn the normalized result into a `Result`, keeping the payload on success.
    pub fn into_result(self) -> Result<Option<Value>, StoreError> {
        if self.success {
            return Ok(self.data);
        }

        if self.status == 0 {
            let message = self.error.unwrap_or(self.status_text);
            return Err(StoreError::Transport(message));
        }

        Err(StoreError::Status {
            status: self.status,
            status_text: self.status_text,
        })
    }
}

/// HTTP client bound to one record store
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: Client,
    base_url: String,
    timezone: String,
}

impl StoreClient {
    pub fn new(base_url: &str, timeout: Duration, timezone: &str) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timezone: timezone.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request and normalize the answer.
    ///
    /// A body is only attached to POST, PUT and PATCH requests; those default
    /// to an empty JSON object when `body` is `None`.
    pub async fn fetch(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> FetchResult {
        let url = self.url(path);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT_LANGUAGE, "en")
            .header(TIMEZONE_HEADER, &self.timezone);

        if !query.is_empty() {
            request = request.query(query);
        }

        if method == Method::POST || method == Method::PUT || method == Method::PATCH {
            let payload = body
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new()));
            request = request.body(payload.to_string());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, %url, "Store request failed: {e}");
                return FetchResult::failure(e.to_string());
            }
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let result = match response.bytes().await {
            Ok(body) => FetchResult::from_response(status, content_type.as_deref(), &body),
            Err(e) => FetchResult::failure(e.to_string()),
        };

        tracing::debug!(
            %method,
            %url,
            status = result.status,
            success = result.success,
            "Store request completed"
        );

        result
    }
}
