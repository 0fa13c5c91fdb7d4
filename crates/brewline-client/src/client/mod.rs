//! HTTP client for the Brewline REST API.
//!
//! Wraps `reqwest` with bearer-token injection, optional request tracing
//! headers, `{code, message, data}` envelope unwrapping and typed errors.
//! Every call is attempted once and bounded by the configured timeout.

mod auth;
mod catalog;
mod orders;
mod recommend;
mod stores;

use std::sync::Arc;
use std::time::Duration;

use brewline_core::AppConfig;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth_hook::AuthHook;
use crate::error::ApiError;
use crate::types::Records;

pub(crate) const REQUEST_ID_HEADER: &str = "X-Request-Id";
pub(crate) const TIMESTAMP_HEADER: &str = "X-Timestamp";

/// Client for the Brewline REST API.
///
/// Cheap to clone; clones share the connection pool and the auth hook.
/// Use [`ApiClient::from_config`] in applications and [`ApiClient::new`] to
/// point at a mock server in tests.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    auth: Option<Arc<dyn AuthHook>>,
    send_trace_headers: bool,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("has_auth_hook", &self.auth.is_some())
            .field("send_trace_headers", &self.send_trace_headers)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client rooted at `base_url` (for example
    /// `http://localhost:8080/api/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`ApiError::InvalidUrl`] if `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `Url::join` appends below the
        // versioned prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            auth: None,
            send_trace_headers: false,
        })
    }

    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Ok(Self::new(
            &config.api_base_url,
            config.api_timeout_secs,
            &config.user_agent,
        )?
        .with_trace_headers(config.send_trace_headers))
    }

    /// Registers the session owner consulted for bearer tokens and told about 401s.
    #[must_use]
    pub fn with_auth_hook(mut self, hook: Arc<dyn AuthHook>) -> Self {
        self.auth = Some(hook);
        self
    }

    /// Enables the `X-Request-Id` / `X-Timestamp` headers on every request.
    #[must_use]
    pub fn with_trace_headers(mut self, enabled: bool) -> Self {
        self.send_trace_headers = enabled;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a relative API path (no leading slash) against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    /// Starts a request with auth and tracing headers applied.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        let mut builder = self.client.request(method, url);

        if let Some(token) = self
            .auth
            .as_ref()
            .and_then(|hook| hook.bearer_token())
            .filter(|token| !token.is_empty())
        {
            builder = builder.bearer_auth(token);
        }

        if self.send_trace_headers {
            builder = builder
                .header(REQUEST_ID_HEADER, uuid::Uuid::new_v4().to_string())
                .header(
                    TIMESTAMP_HEADER,
                    chrono::Utc::now().timestamp_millis().to_string(),
                );
        }

        Ok(builder)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path)?;
        self.execute(builder, &format!("GET {path}")).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path)?.query(query);
        self.execute(builder, &format!("GET {path}")).await
    }

    /// GET a list endpoint that may answer with a page or a bare array.
    /// A `null` payload is an empty list.
    pub(crate) async fn get_records<T, Q>(&self, path: &str, query: &Q) -> Result<Vec<T>, ApiError>
    where
        T: DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let records: Option<Records<T>> = self.get_with_query(path, query).await?;
        Ok(records.map(Records::into_vec).unwrap_or_default())
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let context = format!("{method} {path}");
        let builder = self.request(method, path)?.json(body);
        self.execute(builder, &context).await
    }

    /// POST without a body, for endpoints like `auth/logout`.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path)?;
        self.execute(builder, &format!("POST {path}")).await
    }

    /// Sends the request, maps the HTTP status, strips the envelope and
    /// deserializes the payload.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        context: &str,
    ) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(context, error = %e, "request failed before a response arrived");
            ApiError::Http(e)
        })?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(self.status_error(status, &text, context));
        }

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize {
                context: context.to_owned(),
                source: e,
            })?
        };

        let payload = unwrap_envelope(body)?;
        serde_json::from_value(payload).map_err(|e| ApiError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }

    /// Maps a non-2xx response to an error. A 401 first notifies the auth hook.
    fn status_error(&self, status: StatusCode, body: &str, context: &str) -> ApiError {
        let message = error_message(status, body);
        match status {
            StatusCode::UNAUTHORIZED => {
                tracing::warn!(context, "session rejected by server; clearing local session");
                if let Some(hook) = &self.auth {
                    hook.on_unauthorized();
                }
                ApiError::Unauthorized { message }
            }
            StatusCode::FORBIDDEN => {
                tracing::warn!(context, %message, "permission denied");
                ApiError::Status {
                    status: status.as_u16(),
                    message,
                }
            }
            StatusCode::NOT_FOUND => {
                tracing::warn!(context, %message, "resource not found");
                ApiError::Status {
                    status: status.as_u16(),
                    message,
                }
            }
            _ => {
                tracing::warn!(context, status = status.as_u16(), %message, "request failed");
                ApiError::Status {
                    status: status.as_u16(),
                    message,
                }
            }
        }
    }
}

/// Strips a `{code, message, data}` envelope if present.
///
/// Bodies that are not envelopes (bare arrays, plain objects without a
/// numeric `code`) pass through unchanged. An envelope with a `code` outside
/// 200..300 becomes [`ApiError::Business`].
pub(crate) fn unwrap_envelope(body: Value) -> Result<Value, ApiError> {
    let Value::Object(mut map) = body else {
        return Ok(body);
    };

    let Some(code) = map.get("code").and_then(Value::as_i64) else {
        return Ok(Value::Object(map));
    };
    if !map.contains_key("data") && !map.contains_key("message") {
        return Ok(Value::Object(map));
    }

    if !(200..300).contains(&code) {
        let message = map
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("request failed")
            .to_owned();
        return Err(ApiError::Business { code, message });
    }

    Ok(map.remove("data").unwrap_or(Value::Null))
}

/// Extracts `{message}` from an error body, falling back to a per-status line.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| match status {
            StatusCode::UNAUTHORIZED => "session expired, please sign in again".to_owned(),
            StatusCode::FORBIDDEN => "you do not have permission to access this resource".to_owned(),
            StatusCode::NOT_FOUND => "the requested resource does not exist".to_owned(),
            s if s.is_server_error() => "internal server error, please retry later".to_owned(),
            s => format!("request failed with status {}", s.as_u16()),
        })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
