//! Customer orders.
//!
//! Orders are account data: there is no offline fallback, every failure is
//! returned and recorded.

use std::sync::Arc;

use brewline_client::{ApiClient, OrderQuery, PaymentReceipt};
use brewline_core::{NewOrder, Order, OrderStatus};
use tokio::sync::{watch, Mutex};

use crate::error::StoreError;
use crate::snapshot::{impl_action_state, Published};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderState {
    pub orders: Vec<Order>,
    pub current_order: Option<Order>,
    pub loading: bool,
    pub error: Option<String>,
}

impl_action_state!(OrderState);

impl OrderState {
    /// Cached orders in `status`, in fetch order.
    pub fn orders_with_status(&self, status: OrderStatus) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.order_status == status)
    }

    pub fn pending_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders_with_status(OrderStatus::Pending)
    }

    pub fn processing_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders_with_status(OrderStatus::Processing)
    }

    pub fn completed_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders_with_status(OrderStatus::Completed)
    }

    pub fn cancelled_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders_with_status(OrderStatus::Cancelled)
    }

    pub fn refunding_orders(&self) -> impl Iterator<Item = &Order> {
        self.orders_with_status(OrderStatus::Refunding)
    }

    /// Replaces the cached copies of `order`, if any.
    fn replace(&mut self, order: &Order) {
        if let Some(row) = self.orders.iter_mut().find(|o| o.id == order.id) {
            *row = order.clone();
        }
        if self.current_order.as_ref().is_some_and(|o| o.id == order.id) {
            self.current_order = Some(order.clone());
        }
    }

    fn apply_receipt(&mut self, receipt: &PaymentReceipt) {
        let rows = self
            .orders
            .iter_mut()
            .chain(self.current_order.iter_mut())
            .filter(|o| o.id == receipt.order_id);
        for order in rows {
            order.order_status = receipt.order_status;
            if receipt.payment_method.is_some() {
                order.payment_method = receipt.payment_method;
            }
        }
    }
}

pub struct OrderStore {
    api: ApiClient,
    state: Published<OrderState>,
    gate: Mutex<()>,
}

impl OrderStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Published::new(OrderState::default()),
            gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<OrderState> {
        self.state.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<OrderState>> {
        self.state.subscribe()
    }

    /// Places an order; it becomes `current_order`.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        match self.api.create_order(order).await {
            Ok(created) => {
                tracing::info!(order_id = created.id, order_no = %created.order_no, "order placed");
                self.state.finish(|state| state.current_order = Some(created.clone()));
                Ok(created)
            }
            Err(e) => Err(self.state.fail(e.into())),
        }
    }

    /// Replaces the cached order list.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message; the cached list is
    /// left as it was.
    pub async fn fetch_orders(&self, query: &OrderQuery) -> Result<Vec<Order>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        match self.api.orders(query).await {
            Ok(orders) => {
                tracing::debug!(count = orders.len(), "orders loaded");
                self.state.finish(|state| state.orders.clone_from(&orders));
                Ok(orders)
            }
            Err(e) => Err(self.state.fail(e.into())),
        }
    }

    /// Loads one order into `current_order`.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn fetch_order_by_id(&self, id: i64) -> Result<Order, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        match self.api.order(id).await {
            Ok(order) => {
                self.state.finish(|state| state.current_order = Some(order.clone()));
                Ok(order)
            }
            Err(e) => Err(self.state.fail(e.into())),
        }
    }

    /// Moves an order to cancelled and replaces the cached row with the
    /// server's copy.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn cancel_order(&self, id: i64) -> Result<Order, StoreError> {
        self.update_order_status(id, OrderStatus::Cancelled).await
    }

    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn update_order_status(
        &self,
        id: i64,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        match self.api.update_order_status(id, status).await {
            Ok(order) => {
                tracing::info!(order_id = id, %status, "order status changed");
                self.state.finish(|state| state.replace(&order));
                Ok(order)
            }
            Err(e) => Err(self.state.fail(e.into())),
        }
    }

    /// Pays for an order and applies the returned status to cached copies.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn pay_order(
        &self,
        id: i64,
        payment_method: i32,
        payment_channel: &str,
    ) -> Result<PaymentReceipt, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        match self.api.pay_order(id, payment_method, payment_channel).await {
            Ok(receipt) => {
                tracing::info!(order_id = id, status = %receipt.order_status, "order paid");
                self.state.finish(|state| state.apply_receipt(&receipt));
                Ok(receipt)
            }
            Err(e) => Err(self.state.fail(e.into())),
        }
    }
}
