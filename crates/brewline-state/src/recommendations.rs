//! Recommendations, promotions and product bundles.
//!
//! Pure pass-through to the recommendation endpoints; ranking happens
//! server side.

use std::sync::Arc;

use brewline_client::{ApiClient, RecommendQuery};
use brewline_core::{Feedback, ProductCombination, Promotion, Recommendation};
use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};

use crate::error::StoreError;
use crate::fallback;
use crate::snapshot::{impl_action_state, Published};
use crate::source::{resolve, Sourced};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationState {
    pub recommendations: Vec<Recommendation>,
    pub promotions: Vec<Promotion>,
    pub combinations: Vec<ProductCombination>,
    pub loading: bool,
    pub error: Option<String>,
}

impl_action_state!(RecommendationState);

impl RecommendationState {
    pub fn active_promotions(&self, at: DateTime<Utc>) -> impl Iterator<Item = &Promotion> {
        self.promotions.iter().filter(move |p| p.is_active_at(at))
    }
}

pub struct RecommendationStore {
    api: ApiClient,
    offline_fallback: bool,
    state: Published<RecommendationState>,
    gate: Mutex<()>,
}

impl RecommendationStore {
    #[must_use]
    pub fn new(api: ApiClient, offline_fallback: bool) -> Self {
        Self {
            api,
            offline_fallback,
            state: Published::new(RecommendationState::default()),
            gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<RecommendationState> {
        self.state.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<RecommendationState>> {
        self.state.subscribe()
    }

    /// # Errors
    ///
    /// Returns the API failure only when offline fallback is disabled.
    pub async fn get_personalized_recommendations(
        &self,
        query: &RecommendQuery,
    ) -> Result<Sourced<Vec<Recommendation>>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        let result = self.api.recommendations(query).await;

        match resolve(self.offline_fallback, "recommendations", result, fallback::recommendations) {
            Ok((sourced, error)) => {
                self.state.finish(|state| {
                    state.recommendations.clone_from(&sourced.data);
                    state.error = error;
                });
                Ok(sourced)
            }
            Err(e) => Err(self.state.fail(e)),
        }
    }

    /// # Errors
    ///
    /// Returns the API failure only when offline fallback is disabled.
    pub async fn get_promotion_recommendations(
        &self,
        query: &RecommendQuery,
    ) -> Result<Sourced<Vec<Promotion>>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        let result = self.api.promotions(query).await;

        match resolve(self.offline_fallback, "promotions", result, || fallback::promotions(Utc::now())) {
            Ok((sourced, error)) => {
                self.state.finish(|state| {
                    state.promotions.clone_from(&sourced.data);
                    state.error = error;
                });
                Ok(sourced)
            }
            Err(e) => Err(self.state.fail(e)),
        }
    }

    /// # Errors
    ///
    /// Returns the API failure only when offline fallback is disabled.
    pub async fn get_product_combinations(
        &self,
        query: &RecommendQuery,
    ) -> Result<Sourced<Vec<ProductCombination>>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        let result = self.api.combinations(query).await;

        match resolve(self.offline_fallback, "combinations", result, fallback::combinations) {
            Ok((sourced, error)) => {
                self.state.finish(|state| {
                    state.combinations.clone_from(&sourced.data);
                    state.error = error;
                });
                Ok(sourced)
            }
            Err(e) => Err(self.state.fail(e)),
        }
    }

    /// Reports how the customer reacted to a recommendation.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn submit_feedback(&self, feedback: &Feedback) -> Result<(), StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        match self.api.submit_feedback(feedback).await {
            Ok(()) => {
                self.state.finish(|_| {});
                Ok(())
            }
            Err(e) => Err(self.state.fail(e.into())),
        }
    }
}
