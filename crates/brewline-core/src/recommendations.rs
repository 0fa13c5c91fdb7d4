use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product projection used inside recommendation payloads. Richer than
/// [`crate::Product`]: carries ratings and merchandising flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedProduct {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category_id: i64,
    #[serde(default)]
    pub category_name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub is_hot: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub product: RecommendedProduct,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A time-boxed promotion. `discount` is either an absolute amount (`10`)
/// or a multiplier (`0.85`), as the back office configures it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub discount: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub image: String,
}

impl Promotion {
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start_time <= at && at < self.end_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboProduct {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCombination {
    pub id: i64,
    pub name: String,
    pub products: Vec<ComboProduct>,
    pub total_price: Decimal,
    pub discount_price: Decimal,
    pub saving: Decimal,
    #[serde(default)]
    pub image: String,
}

/// Payload for `POST /recommend/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub user_id: i64,
    pub product_id: i64,
    pub feedback_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
