use brewline_core::Store;
use reqwest::Method;
use serde_json::Value;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{FavoriteRequest, NearbyQuery, StoreSearchQuery};

impl ApiClient {
    /// `GET stores/nearby`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, a failing
    /// envelope code or an unexpected payload shape.
    pub async fn nearby_stores(&self, query: &NearbyQuery) -> Result<Vec<Store>, ApiError> {
        self.get_records("stores/nearby", query).await
    }

    /// `GET stores/search`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::nearby_stores`].
    pub async fn search_stores(&self, query: &StoreSearchQuery) -> Result<Vec<Store>, ApiError> {
        self.get_records("stores/search", query).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::nearby_stores`].
    pub async fn store(&self, id: i64) -> Result<Store, ApiError> {
        self.get(&format!("stores/{id}")).await
    }

    /// `POST stores/{id}/favorite`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::nearby_stores`].
    pub async fn set_favorite(&self, id: i64, is_favorite: bool) -> Result<(), ApiError> {
        let _: Value = self
            .send_json(
                Method::POST,
                &format!("stores/{id}/favorite"),
                &FavoriteRequest { is_favorite },
            )
            .await?;
        Ok(())
    }

    /// `GET stores/favorites` for the signed-in customer.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::nearby_stores`].
    pub async fn favorite_stores(&self) -> Result<Vec<Store>, ApiError> {
        self.get_records("stores/favorites", &[] as &[(&str, &str)])
            .await
    }
}
