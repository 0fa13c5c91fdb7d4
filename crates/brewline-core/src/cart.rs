use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of the shopping cart.
///
/// `total` is always `price * quantity` and `quantity` is never below 1;
/// the constructors and mutators on this type are the only writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i64,
    pub product_no: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image_url: String,
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub addons: Option<Vec<i64>>,
}

/// A cart line as submitted by the caller, before `total` is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub product_id: i64,
    pub product_no: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub image_url: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub temperature: Option<String>,
    #[serde(default)]
    pub addons: Option<Vec<i64>>,
}

/// Identity used to merge repeated additions of the same customised product.
///
/// Addon order is significant: `[1, 2]` and `[2, 1]` are different variants,
/// and an absent addon list differs from an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantKey<'a> {
    pub product_id: i64,
    pub size: Option<&'a str>,
    pub temperature: Option<&'a str>,
    pub addons: Option<&'a [i64]>,
}

impl NewCartItem {
    #[must_use]
    pub fn variant_key(&self) -> VariantKey<'_> {
        VariantKey {
            product_id: self.product_id,
            size: self.size.as_deref(),
            temperature: self.temperature.as_deref(),
            addons: self.addons.as_deref(),
        }
    }
}

impl CartItem {
    /// Builds a cart line from a submitted item. A zero quantity is raised to 1.
    #[must_use]
    pub fn from_new(item: NewCartItem) -> Self {
        let quantity = item.quantity.max(1);
        Self {
            product_id: item.product_id,
            product_no: item.product_no,
            name: item.name,
            price: item.price,
            quantity,
            image_url: item.image_url,
            total: line_total(item.price, quantity),
            size: item.size,
            temperature: item.temperature,
            addons: item.addons,
        }
    }

    #[must_use]
    pub fn variant_key(&self) -> VariantKey<'_> {
        VariantKey {
            product_id: self.product_id,
            size: self.size.as_deref(),
            temperature: self.temperature.as_deref(),
            addons: self.addons.as_deref(),
        }
    }

    /// Adds `extra` units and recomputes the line total.
    pub fn add_quantity(&mut self, extra: u32) {
        self.set_quantity(i64::from(self.quantity) + i64::from(extra));
    }

    /// Sets the quantity, clamping anything below 1 up to 1, and recomputes
    /// the line total.
    pub fn set_quantity(&mut self, quantity: i64) {
        let clamped = quantity.clamp(1, i64::from(u32::MAX));
        self.quantity = u32::try_from(clamped).unwrap_or(u32::MAX);
        self.total = line_total(self.price, self.quantity);
    }

    /// Re-derives `total` and repairs a zero quantity. Used after loading
    /// persisted lines, which may have been written by an older client.
    pub fn normalize(&mut self) {
        self.set_quantity(i64::from(self.quantity));
    }
}

/// `price * quantity`, saturating at `Decimal::MAX` instead of overflowing.
fn line_total(price: Decimal, quantity: u32) -> Decimal {
    price
        .checked_mul(Decimal::from(quantity))
        .unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn americano(quantity: u32) -> NewCartItem {
        NewCartItem {
            product_id: 1,
            product_no: "P001".to_string(),
            name: "Americano".to_string(),
            price: Decimal::new(350, 2),
            quantity,
            image_url: String::new(),
            size: Some("grande".to_string()),
            temperature: None,
            addons: None,
        }
    }

    #[test]
    fn from_new_derives_total() {
        let line = CartItem::from_new(americano(2));
        assert_eq!(line.total, Decimal::new(700, 2));
    }

    #[test]
    fn from_new_raises_zero_quantity() {
        let line = CartItem::from_new(americano(0));
        assert_eq!(line.quantity, 1);
        assert_eq!(line.total, Decimal::new(350, 2));
    }

    #[test]
    fn set_quantity_clamps_negative_to_one() {
        let mut line = CartItem::from_new(americano(3));
        line.set_quantity(-5);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.total, line.price);
    }

    #[test]
    fn huge_line_total_saturates_instead_of_panicking() {
        let mut item = americano(2);
        item.price = Decimal::MAX;
        let mut line = CartItem::from_new(item);
        assert_eq!(line.total, Decimal::MAX);

        line.set_quantity(i64::from(u32::MAX));
        assert_eq!(line.quantity, u32::MAX);
        assert_eq!(line.total, Decimal::MAX);
    }

    #[test]
    fn variant_key_distinguishes_absent_and_empty_addons() {
        let mut with_empty = americano(1);
        with_empty.addons = Some(vec![]);
        assert_ne!(americano(1).variant_key(), with_empty.variant_key());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let line = CartItem::from_new(americano(1));
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["productId"], 1);
        assert_eq!(json["productNo"], "P001");
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn deserializes_numeric_price() {
        let json = r#"{"productId":2,"productNo":"P002","name":"Latte","price":4.75,
            "quantity":2,"imageUrl":"","total":9.5}"#;
        let line: CartItem = serde_json::from_str(json).unwrap();
        assert_eq!(line.price, Decimal::new(475, 2));
        assert_eq!(line.total, Decimal::new(950, 2));
    }
}
