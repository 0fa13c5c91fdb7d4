use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Lifecycle state of an order. Wire codes: 1 pending, 2 processing,
/// 3 completed, 4 cancelled, 5 refunding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
    Refunding,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
        OrderStatus::Refunding,
    ];

    #[must_use]
    pub fn code(self) -> i32 {
        i32::from(self)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunding => "refunding",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for OrderStatus {
    type Error = CoreError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(OrderStatus::Pending),
            2 => Ok(OrderStatus::Processing),
            3 => Ok(OrderStatus::Completed),
            4 => Ok(OrderStatus::Cancelled),
            5 => Ok(OrderStatus::Refunding),
            other => Err(CoreError::UnknownOrderStatus(other)),
        }
    }
}

impl From<OrderStatus> for i32 {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => 1,
            OrderStatus::Processing => 2,
            OrderStatus::Completed => 3,
            OrderStatus::Cancelled => 4,
            OrderStatus::Refunding => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub order_no: String,
    #[serde(default)]
    pub customer_id: Option<i64>,
    pub store_id: i64,
    pub total_amount: Decimal,
    #[serde(default)]
    pub actual_amount: Option<Decimal>,
    #[serde(default)]
    pub payment_method: Option<i32>,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub pickup_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<OrderLine>>,
}

/// Payload for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub store_id: i64,
    pub items: Vec<OrderLine>,
    pub payment_method: i32,
    pub pickup_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::try_from(status.code()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_code_is_rejected() {
        let result = serde_json::from_str::<OrderStatus>("9");
        assert!(result.is_err());
    }

    #[test]
    fn order_parses_minimal_shape() {
        let json = r#"{"id":7,"storeId":1,"totalAmount":12.5,"orderStatus":2}"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_status, OrderStatus::Processing);
        assert_eq!(order.total_amount, Decimal::new(125, 1));
        assert!(order.items.is_none());
    }

    #[test]
    fn new_order_omits_absent_remarks() {
        let order = NewOrder {
            store_id: 1,
            items: vec![OrderLine {
                product_id: 3,
                quantity: 2,
                price: None,
                total: None,
            }],
            payment_method: 1,
            pickup_time: "2024-05-01T09:30:00".to_string(),
            remarks: None,
        };
        let json = serde_json::to_value(&order).unwrap();
        assert!(json.get("remarks").is_none());
        assert_eq!(json["items"][0]["productId"], 3);
        assert!(json["items"][0].get("price").is_none());
    }
}
