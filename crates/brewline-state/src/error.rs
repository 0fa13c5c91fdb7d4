use brewline_client::ApiError;
use thiserror::Error;

/// Errors raised by persistence adapters.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode value for key \"{key}\": {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by store actions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("cart index {index} out of range (cart has {len} lines)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("not signed in")]
    NotAuthenticated,

    #[error("cart is empty")]
    EmptyCart,
}

impl StoreError {
    /// `true` when the server rejected the session (HTTP 401).
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, StoreError::Api(e) if e.is_unauthorized())
    }

    /// Message stored in a store's `error` field and shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}
