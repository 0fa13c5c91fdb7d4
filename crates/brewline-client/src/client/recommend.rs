use brewline_core::{Feedback, ProductCombination, Promotion, Recommendation};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ApiClient;
use crate::error::ApiError;
use crate::types::{RecommendQuery, Records};

impl ApiClient {
    /// `POST recommend/products`. The recommendation endpoints take their
    /// parameters as a JSON body rather than a query string.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure, non-2xx status, a failing
    /// envelope code or an unexpected payload shape.
    pub async fn recommendations(
        &self,
        query: &RecommendQuery,
    ) -> Result<Vec<Recommendation>, ApiError> {
        self.post_records("recommend/products", query).await
    }

    /// `POST recommend/promotions`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::recommendations`].
    pub async fn promotions(&self, query: &RecommendQuery) -> Result<Vec<Promotion>, ApiError> {
        self.post_records("recommend/promotions", query).await
    }

    /// `POST recommend/combinations`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::recommendations`].
    pub async fn combinations(
        &self,
        query: &RecommendQuery,
    ) -> Result<Vec<ProductCombination>, ApiError> {
        self.post_records("recommend/combinations", query).await
    }

    /// `POST recommend/feedback`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::recommendations`].
    pub async fn submit_feedback(&self, feedback: &Feedback) -> Result<(), ApiError> {
        let _: Value = self
            .send_json(Method::POST, "recommend/feedback", feedback)
            .await?;
        Ok(())
    }

    async fn post_records<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &RecommendQuery,
    ) -> Result<Vec<T>, ApiError> {
        let records: Option<Records<T>> = self.send_json(Method::POST, path, query).await?;
        Ok(records.map(Records::into_vec).unwrap_or_default())
    }
}
