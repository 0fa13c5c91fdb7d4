use brewline_core::User;
use reqwest::Method;
use serde_json::Value;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{
    AuthPayload, ForgotPasswordRequest, LoginRequest, OauthRequest, RefreshRequest,
    RegisterRequest, ResetPasswordRequest, SmsLoginRequest, SmsRequest, TokenPair,
};

impl ApiClient {
    /// `POST auth/login` with phone and password.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status or a
    /// failing envelope code.
    pub async fn login(&self, phone: &str, password: &str) -> Result<AuthPayload, ApiError> {
        self.send_json(Method::POST, "auth/login", &LoginRequest { phone, password })
            .await
    }

    /// `POST auth/register`. The server signs the new account in.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn register(
        &self,
        name: &str,
        phone: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, ApiError> {
        let body = RegisterRequest {
            name,
            phone,
            email,
            password,
        };
        self.send_json(Method::POST, "auth/register", &body).await
    }

    /// `POST auth/logout`. Invalidates the token server side.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn logout(&self) -> Result<(), ApiError> {
        let _: Value = self.post_empty("auth/logout").await?;
        Ok(())
    }

    /// `POST auth/refresh`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        self.send_json(Method::POST, "auth/refresh", &RefreshRequest { refresh_token })
            .await
    }

    /// `POST auth/send-sms`. `purpose` is the server's code type
    /// (1 login, 2 registration, 3 password reset).
    ///
    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn send_sms_code(&self, phone: &str, purpose: i32) -> Result<(), ApiError> {
        let _: Value = self
            .send_json(Method::POST, "auth/send-sms", &SmsRequest { phone, purpose })
            .await?;
        Ok(())
    }

    /// `POST auth/sms-login`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn sms_login(
        &self,
        phone: &str,
        verification_code: &str,
    ) -> Result<AuthPayload, ApiError> {
        let body = SmsLoginRequest {
            phone,
            verification_code,
        };
        self.send_json(Method::POST, "auth/sms-login", &body).await
    }

    /// `POST auth/oauth/{provider}` exchanging an authorization code.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn oauth_login(&self, provider: &str, code: &str) -> Result<AuthPayload, ApiError> {
        let path = format!("auth/oauth/{provider}");
        self.send_json(Method::POST, &path, &OauthRequest { code })
            .await
    }

    /// `GET auth/profile` for the bearer of the current token.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn profile(&self) -> Result<User, ApiError> {
        self.get("auth/profile").await
    }

    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn forgot_password(
        &self,
        phone: &str,
        verification_code: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let body = ForgotPasswordRequest {
            phone,
            verification_code,
            new_password,
        };
        let _: Value = self
            .send_json(Method::POST, "auth/forgot-password", &body)
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// See [`ApiClient::login`].
    pub async fn reset_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let body = ResetPasswordRequest {
            old_password,
            new_password,
        };
        let _: Value = self
            .send_json(Method::POST, "auth/reset-password", &body)
            .await?;
        Ok(())
    }
}
