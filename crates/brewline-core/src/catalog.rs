use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Listing status of a product. Wire value `1` is active, `0` inactive;
/// other codes are preserved verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ProductStatus {
    Active,
    Inactive,
    Other(i32),
}

impl From<i32> for ProductStatus {
    fn from(code: i32) -> Self {
        match code {
            1 => ProductStatus::Active,
            0 => ProductStatus::Inactive,
            other => ProductStatus::Other(other),
        }
    }
}

impl From<ProductStatus> for i32 {
    fn from(status: ProductStatus) -> Self {
        match status {
            ProductStatus::Active => 1,
            ProductStatus::Inactive => 0,
            ProductStatus::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub product_no: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    pub category_id: i64,
    pub status: ProductStatus,
    /// Timestamps are kept as the server sent them; the back end emits both
    /// zoned and local ISO-8601 forms.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Product {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ProductStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
