//! Seam between the HTTP client and whoever owns the session token.
//!
//! The client never stores credentials itself: it asks the hook for the
//! current bearer token on every request, and tells the hook when the server
//! answers 401 so the session can be dropped.

/// Session owner consulted by [`crate::ApiClient`] on every request.
pub trait AuthHook: Send + Sync {
    /// Current bearer token, or `None` when anonymous. Empty strings are
    /// treated as `None` by the client.
    fn bearer_token(&self) -> Option<String>;

    /// Called once per 401 response, before the error reaches the caller.
    fn on_unauthorized(&self);
}
