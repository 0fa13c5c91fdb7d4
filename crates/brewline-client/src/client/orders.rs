use brewline_core::{NewOrder, Order, OrderStatus};
use reqwest::Method;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{CancelRequest, OrderQuery, PayRequest, PaymentReceipt, StatusChange, StatusRequest};

impl ApiClient {
    /// `POST orders`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, a failing
    /// envelope code or an unexpected payload shape.
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        self.send_json(Method::POST, "orders", order).await
    }

    /// `GET orders` for the signed-in customer.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::create_order`].
    pub async fn orders(&self, query: &OrderQuery) -> Result<Vec<Order>, ApiError> {
        self.get_records("orders", query).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::create_order`].
    pub async fn order(&self, id: i64) -> Result<Order, ApiError> {
        self.get(&format!("orders/{id}")).await
    }

    /// `PUT orders/{id}/status`. Returns the updated order.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::create_order`].
    pub async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let body = StatusRequest {
            status: status.code(),
        };
        self.send_json(Method::PUT, &format!("orders/{id}/status"), &body)
            .await
    }

    /// `POST orders/{id}/pay`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::create_order`].
    pub async fn pay_order(
        &self,
        id: i64,
        payment_method: i32,
        payment_channel: &str,
    ) -> Result<PaymentReceipt, ApiError> {
        let body = PayRequest {
            payment_method,
            payment_channel,
        };
        self.send_json(Method::POST, &format!("orders/{id}/pay"), &body)
            .await
    }

    /// `POST orders/{id}/cancel` with an optional reason.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::create_order`].
    pub async fn cancel_order(
        &self,
        id: i64,
        reason: Option<&str>,
    ) -> Result<StatusChange, ApiError> {
        let body = CancelRequest {
            cancel_reason: reason,
        };
        self.send_json(Method::POST, &format!("orders/{id}/cancel"), &body)
            .await
    }
}
