//! Shopping cart.
//!
//! The cart is purely local: no API calls, so every action is synchronous.
//! Each mutation republishes the state and rewrites the whole item list
//! under the `cart` key.

use std::sync::Arc;

use brewline_core::{CartItem, NewCartItem, OrderLine};
use rust_decimal::Decimal;
use tokio::sync::watch;

use crate::error::StoreError;
use crate::persistence::{keys, load_json, persist, KeyValueStorage};
use crate::snapshot::Published;

/// Cart lines in display (insertion) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

impl CartState {
    /// Total number of units across all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.items
            .iter()
            .fold(Decimal::ZERO, |sum, item| {
                sum.checked_add(item.total).unwrap_or(Decimal::MAX)
            })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub struct CartStore {
    state: Published<CartState>,
    storage: Arc<dyn KeyValueStorage>,
}

impl CartStore {
    /// Creates the store and loads any persisted cart. Absent or malformed
    /// data yields an empty cart.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let items = load_items(storage.as_ref());
        Self {
            state: Published::new(CartState { items }),
            storage,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<CartState> {
        self.state.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<CartState>> {
        self.state.subscribe()
    }

    /// Adds `item`, merging into an existing line with the same variant.
    pub fn add_to_cart(&self, item: NewCartItem) {
        self.state.update(|state| {
            let existing = state
                .items
                .iter_mut()
                .find(|line| line.variant_key() == item.variant_key());
            match existing {
                Some(line) => line.add_quantity(item.quantity.max(1)),
                None => state.items.push(CartItem::from_new(item)),
            }
        });
        tracing::debug!(lines = self.snapshot().items.len(), "cart item added");
        self.save();
    }

    /// Removes the line at `index` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] and leaves the cart untouched
    /// when `index` is past the end.
    pub fn remove_from_cart(&self, index: usize) -> Result<CartItem, StoreError> {
        let removed = self.state.try_update(|state| {
            let len = state.items.len();
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
            Ok(state.items.remove(index))
        })?;
        self.save();
        Ok(removed)
    }

    /// Sets the quantity of the line at `index`. Values below 1 become 1.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] and leaves the cart untouched
    /// when `index` is past the end.
    pub fn update_quantity(&self, index: usize, quantity: i64) -> Result<(), StoreError> {
        self.state.try_update(|state| {
            let len = state.items.len();
            let Some(line) = state.items.get_mut(index) else {
                return Err(StoreError::IndexOutOfRange { index, len });
            };
            line.set_quantity(quantity);
            Ok(())
        })?;
        self.save();
        Ok(())
    }

    /// Takes `ordered` out of the cart, matching lines by variant and
    /// subtracting their quantities. Units added after `ordered` was read
    /// stay in the cart; a line whose quantity reaches zero is dropped.
    pub fn remove_lines(&self, ordered: &[CartItem]) {
        self.state.update(|state| {
            for sent in ordered {
                let Some(pos) = state
                    .items
                    .iter()
                    .position(|line| line.variant_key() == sent.variant_key())
                else {
                    continue;
                };
                let line = &mut state.items[pos];
                if line.quantity <= sent.quantity {
                    state.items.remove(pos);
                } else {
                    line.set_quantity(i64::from(line.quantity - sent.quantity));
                }
            }
        });
        tracing::debug!(lines = self.snapshot().items.len(), "ordered lines removed from cart");
        self.save();
    }

    pub fn clear_cart(&self) {
        self.state.update(|state| state.items.clear());
        self.save();
    }

    /// Replaces in-memory lines with whatever is currently persisted.
    pub fn reload(&self) {
        let items = load_items(self.storage.as_ref());
        self.state.update(|state| state.items = items);
    }

    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.snapshot().cart_count()
    }

    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.snapshot().cart_total()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Order lines for checkout, one per cart line.
    #[must_use]
    pub fn to_order_lines(&self) -> Vec<OrderLine> {
        order_lines(&self.snapshot().items)
    }

    fn save(&self) {
        persist(self.storage.as_ref(), keys::CART, &self.snapshot().items);
    }
}

/// Order creation lines for `items`, one per cart line.
#[must_use]
pub fn order_lines(items: &[CartItem]) -> Vec<OrderLine> {
    items
        .iter()
        .map(|item| OrderLine {
            product_id: item.product_id,
            quantity: item.quantity,
            price: Some(item.price),
            total: Some(item.total),
        })
        .collect()
}

fn load_items(storage: &dyn KeyValueStorage) -> Vec<CartItem> {
    let mut items: Vec<CartItem> = load_json(storage, keys::CART).unwrap_or_default();
    for item in &mut items {
        item.normalize();
    }
    items
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
