use brewline_core::{Category, Product};

use super::ApiClient;
use crate::error::ApiError;
use crate::types::ProductQuery;

impl ApiClient {
    /// `GET products`, unwrapping paged responses to their records.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, a failing
    /// envelope code or an unexpected payload shape.
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        self.get_records("products", query).await
    }

    /// `GET products/{id}`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::products`].
    pub async fn product(&self, id: i64) -> Result<Product, ApiError> {
        self.get(&format!("products/{id}")).await
    }

    /// `GET products/category/{id}`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::products`].
    pub async fn products_by_category(&self, category_id: i64) -> Result<Vec<Product>, ApiError> {
        let path = format!("products/category/{category_id}");
        self.get_records(&path, &[] as &[(&str, &str)]).await
    }

    /// `GET categories`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::products`].
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.get_records("categories", &[] as &[(&str, &str)]).await
    }
}
