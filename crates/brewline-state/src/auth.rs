//! Authentication state.
//!
//! [`AuthSession`] owns the token and signed-in user and is shared with the
//! HTTP client as its [`AuthHook`]: the client reads the bearer token from it
//! on every request and clears it when the server answers 401. It holds no
//! client of its own, so there is no reference cycle. [`AuthStore`] wraps the
//! session with the actions that talk to the API.

use std::sync::Arc;

use brewline_client::{ApiClient, ApiError, AuthHook, AuthPayload};
use brewline_core::User;
use tokio::sync::{watch, Mutex};

use crate::error::StoreError;
use crate::persistence::{forget, keys, load_json, persist, KeyValueStorage};
use crate::snapshot::{impl_action_state, Published};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl_action_state!(AuthState);

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Loyalty points of the signed-in member, 0 when anonymous.
    #[must_use]
    pub fn user_points(&self) -> u64 {
        self.user.as_ref().map_or(0, |u| u.points)
    }

    /// Member level of the signed-in member, 0 when anonymous.
    #[must_use]
    pub fn user_level(&self) -> u32 {
        self.user.as_ref().map_or(0, |u| u.member_level_id)
    }
}

pub struct AuthSession {
    state: Published<AuthState>,
    storage: Arc<dyn KeyValueStorage>,
}

impl AuthSession {
    /// Creates the session, restoring a persisted token and user if present.
    #[must_use]
    pub fn restore(storage: Arc<dyn KeyValueStorage>) -> Self {
        let token: Option<String> =
            load_json(storage.as_ref(), keys::TOKEN).filter(|t: &String| !t.is_empty());
        let user: Option<User> = token
            .as_ref()
            .and_then(|_| load_json(storage.as_ref(), keys::USER));
        if token.is_some() {
            tracing::debug!("restored persisted session");
        }
        Self {
            state: Published::new(AuthState {
                user,
                token,
                loading: false,
                error: None,
            }),
            storage,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<AuthState> {
        self.state.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<AuthState>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.snapshot().token.clone().filter(|t| !t.is_empty())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    /// Drops the token and user from memory and storage.
    pub fn clear(&self) {
        self.state.update(|state| {
            state.token = None;
            state.user = None;
        });
        forget(self.storage.as_ref(), keys::TOKEN);
        forget(self.storage.as_ref(), keys::USER);
    }

    fn establish(&self, payload: AuthPayload) -> User {
        let AuthPayload { token, user } = payload;
        persist(self.storage.as_ref(), keys::TOKEN, &token);
        persist(self.storage.as_ref(), keys::USER, &user);
        self.state.finish(|state| {
            state.token = Some(token);
            state.user = Some(user.clone());
            state.error = None;
        });
        user
    }

    fn set_user(&self, user: &User) {
        persist(self.storage.as_ref(), keys::USER, user);
        self.state.finish(|state| state.user = Some(user.clone()));
    }
}

impl AuthHook for AuthSession {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }

    fn on_unauthorized(&self) {
        if self.is_authenticated() {
            tracing::info!("session rejected by server; signing out locally");
        }
        self.clear();
    }
}

pub struct AuthStore {
    api: ApiClient,
    session: Arc<AuthSession>,
    gate: Mutex<()>,
}

impl AuthStore {
    /// `api` should already carry `session` as its auth hook.
    #[must_use]
    pub fn new(api: ApiClient, session: Arc<AuthSession>) -> Self {
        Self {
            api,
            session,
            gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<AuthSession> {
        &self.session
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<AuthState> {
        self.session.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<AuthState>> {
        self.session.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn user_points(&self) -> u64 {
        self.snapshot().user_points()
    }

    #[must_use]
    pub fn user_level(&self) -> u32 {
        self.snapshot().user_level()
    }

    /// Signs in with phone and password.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the session stays anonymous and the state's
    /// `error` holds a message for the user.
    pub async fn login(&self, phone: &str, password: &str) -> Result<User, StoreError> {
        let _gate = self.gate.lock().await;
        self.session.state.begin();
        let result = self.api.login(phone, password).await;
        self.sign_in(result)
    }

    /// Creates an account and signs in with it.
    ///
    /// # Errors
    ///
    /// See [`AuthStore::login`].
    pub async fn register(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        password: &str,
    ) -> Result<User, StoreError> {
        let _gate = self.gate.lock().await;
        self.session.state.begin();
        let result = self.api.register(name, phone, email, password).await;
        self.sign_in(result)
    }

    /// Signs in with a one-time SMS code.
    ///
    /// # Errors
    ///
    /// See [`AuthStore::login`].
    pub async fn sms_login(&self, phone: &str, code: &str) -> Result<User, StoreError> {
        let _gate = self.gate.lock().await;
        self.session.state.begin();
        let result = self.api.sms_login(phone, code).await;
        self.sign_in(result)
    }

    /// Signs in with an authorization code from a third-party provider.
    ///
    /// # Errors
    ///
    /// See [`AuthStore::login`].
    pub async fn oauth_login(&self, provider: &str, code: &str) -> Result<User, StoreError> {
        let _gate = self.gate.lock().await;
        self.session.state.begin();
        let result = self.api.oauth_login(provider, code).await;
        self.sign_in(result)
    }

    /// Requests an SMS code. `purpose`: 1 login, 2 registration, 3 password reset.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn send_sms_code(&self, phone: &str, purpose: i32) -> Result<(), StoreError> {
        let _gate = self.gate.lock().await;
        self.session.state.begin();
        match self.api.send_sms_code(phone, purpose).await {
            Ok(()) => {
                self.session.state.finish(|_| {});
                Ok(())
            }
            Err(e) => Err(self.session.state.fail(e.into())),
        }
    }

    /// Best-effort server-side logout, then unconditional local sign-out.
    pub async fn logout(&self) {
        let _gate = self.gate.lock().await;
        self.sign_out().await;
    }

    /// Refreshes the signed-in user's profile. Does nothing when anonymous.
    ///
    /// # Errors
    ///
    /// Returns the API failure. A 401 signs the session out first.
    pub async fn fetch_profile(&self) -> Result<Option<User>, StoreError> {
        let _gate = self.gate.lock().await;
        if !self.session.is_authenticated() {
            return Ok(None);
        }

        self.session.state.begin();
        match self.api.profile().await {
            Ok(user) => {
                self.session.set_user(&user);
                Ok(Some(user))
            }
            Err(e) if e.is_unauthorized() => {
                self.sign_out().await;
                Err(self.session.state.fail(e.into()))
            }
            Err(e) => Err(self.session.state.fail(e.into())),
        }
    }

    /// Resets a forgotten password with an SMS verification code.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn forgot_password(
        &self,
        phone: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), StoreError> {
        let _gate = self.gate.lock().await;
        self.session.state.begin();
        match self.api.forgot_password(phone, code, new_password).await {
            Ok(()) => {
                self.session.state.finish(|_| {});
                Ok(())
            }
            Err(e) => Err(self.session.state.fail(e.into())),
        }
    }

    /// Changes the signed-in user's password.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotAuthenticated`] when anonymous, otherwise the
    /// API failure. Both are recorded.
    pub async fn reset_password(&self, old_password: &str, new_password: &str) -> Result<(), StoreError> {
        let _gate = self.gate.lock().await;
        self.session.state.begin();
        if !self.session.is_authenticated() {
            return Err(self.session.state.fail(StoreError::NotAuthenticated));
        }
        match self.api.reset_password(old_password, new_password).await {
            Ok(()) => {
                self.session.state.finish(|_| {});
                Ok(())
            }
            Err(e) => Err(self.session.state.fail(e.into())),
        }
    }

    pub fn clear_error(&self) {
        self.session.state.update(|state| state.error = None);
    }

    fn sign_in(&self, result: Result<AuthPayload, ApiError>) -> Result<User, StoreError> {
        match result {
            Ok(payload) => {
                let user = self.session.establish(payload);
                tracing::info!(user_id = user.id, "signed in");
                Ok(user)
            }
            Err(e) => Err(self.session.state.fail(e.into())),
        }
    }

    async fn sign_out(&self) {
        self.session.state.begin();
        if self.session.is_authenticated() {
            if let Err(e) = self.api.logout().await {
                tracing::warn!(error = %e, "server-side logout failed; clearing local session anyway");
            }
        }
        self.session.clear();
        self.session.state.finish(|_| {});
        tracing::info!("signed out");
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
