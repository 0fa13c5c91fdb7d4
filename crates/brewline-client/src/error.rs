use thiserror::Error;

/// Errors returned by [`crate::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 401. The registered [`crate::AuthHook`] has already been told to
    /// drop the session by the time the caller sees this.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Any other non-2xx HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// A 2xx response whose `{code, message, data}` envelope reports failure.
    #[error("business error {code}: {message}")]
    Business { code: i64, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// `true` when the server was never reached (connect failure or timeout).
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Http(e) if e.is_connect() || e.is_timeout() || e.is_request())
    }

    /// Human-readable message suitable for showing next to a form.
    ///
    /// Server-supplied messages win; transport failures get a generic line.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::Status { message, .. }
            | ApiError::Business { message, .. } => message.clone(),
            ApiError::Http(e) if e.is_timeout() => "the server took too long to respond".to_string(),
            ApiError::Http(_) => "unable to reach the server, check the network connection".to_string(),
            ApiError::Deserialize { .. } => "the server sent an unexpected response".to_string(),
            ApiError::InvalidUrl { .. } => "the request could not be built".to_string(),
        }
    }
}
