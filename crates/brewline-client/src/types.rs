//! Request and response payloads for the Brewline REST API.
//!
//! Responses arrive wrapped in a `{"code", "message", "data"}` envelope which
//! [`crate::ApiClient`] strips before these types are deserialized. List
//! endpoints return either a bare array or a `{"total", "records"}` page;
//! [`Records`] accepts both.

use brewline_core::{OrderStatus, User};
use serde::{Deserialize, Serialize};

/// Either a paged result or a bare list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Records<T> {
    Page { records: Vec<T> },
    List(Vec<T>),
}

impl<T> Records<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Records::Page { records, .. } => records,
            Records::List(items) => items,
        }
    }
}

// ---------------------------------------------------------------------------
// auth
// ---------------------------------------------------------------------------

/// Session issued by the login, registration and SMS/OAuth login endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub phone: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub name: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SmsRequest<'a> {
    pub phone: &'a str,
    #[serde(rename = "type")]
    pub purpose: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SmsLoginRequest<'a> {
    pub phone: &'a str,
    pub verification_code: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct OauthRequest<'a> {
    pub code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ForgotPasswordRequest<'a> {
    pub phone: &'a str,
    pub verification_code: &'a str,
    pub new_password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResetPasswordRequest<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
}

// ---------------------------------------------------------------------------
// catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

// ---------------------------------------------------------------------------
// orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_status: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusRequest {
    pub status: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PayRequest<'a> {
    pub payment_method: i32,
    pub payment_channel: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CancelRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub order_id: i64,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub payment_method: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub order_id: i64,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// stores
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in metres.
    pub radius: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreSearchQuery {
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FavoriteRequest {
    pub is_favorite: bool,
}

// ---------------------------------------------------------------------------
// recommendations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_id: Option<i64>,
}
