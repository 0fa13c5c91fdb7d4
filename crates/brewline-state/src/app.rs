//! The store container.
//!
//! Everything a front end needs is built here once, from explicit
//! dependencies, and handed around by reference. The API client given to
//! every store shares one [`AuthSession`], so a 401 seen by any store signs
//! the customer out everywhere.

use std::sync::Arc;

use brewline_client::ApiClient;
use brewline_core::{AppConfig, Coordinates, NewOrder, Order};

use crate::auth::{AuthSession, AuthStore};
use crate::cart::{order_lines, CartStore};
use crate::catalog::CatalogStore;
use crate::error::StoreError;
use crate::geo::{Geolocator, DEFAULT_LOCATION};
use crate::locations::LocationStore;
use crate::orders::OrderStore;
use crate::persistence::{FileStorage, KeyValueStorage};
use crate::recommendations::RecommendationStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreOptions {
    /// Serve built-in catalogue data when the API cannot be reached.
    pub offline_fallback: bool,
    pub default_location: Coordinates,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            offline_fallback: true,
            default_location: DEFAULT_LOCATION,
        }
    }
}

impl From<&AppConfig> for StoreOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            offline_fallback: config.offline_fallback,
            default_location: Coordinates::new(config.default_latitude, config.default_longitude),
        }
    }
}

pub struct AppStores {
    pub api: ApiClient,
    pub session: Arc<AuthSession>,
    pub auth: AuthStore,
    pub cart: CartStore,
    pub catalog: CatalogStore,
    pub locations: LocationStore,
    pub orders: OrderStore,
    pub recommendations: RecommendationStore,
}

impl AppStores {
    /// Wires every store to `api` and `storage`. The persisted session, cart
    /// and selected store are restored before this returns.
    #[must_use]
    pub fn new(
        api: ApiClient,
        storage: Arc<dyn KeyValueStorage>,
        geolocator: Arc<dyn Geolocator>,
        options: StoreOptions,
    ) -> Self {
        let session = Arc::new(AuthSession::restore(Arc::clone(&storage)));
        let api = api.with_auth_hook(session.clone());

        let locations = LocationStore::new(
            api.clone(),
            Arc::clone(&storage),
            geolocator,
            options.default_location,
            options.offline_fallback,
        );
        locations.load_selected_store();

        Self {
            auth: AuthStore::new(api.clone(), Arc::clone(&session)),
            cart: CartStore::new(storage),
            catalog: CatalogStore::new(api.clone(), options.offline_fallback),
            locations,
            orders: OrderStore::new(api.clone()),
            recommendations: RecommendationStore::new(api.clone(), options.offline_fallback),
            session,
            api,
        }
    }

    /// Builds the container from configuration, with file-backed storage at
    /// `config.state_path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Api`] if the configured base URL is invalid.
    pub fn from_config(
        config: &AppConfig,
        geolocator: Arc<dyn Geolocator>,
    ) -> Result<Self, StoreError> {
        let api = ApiClient::from_config(config)?;
        let storage = Arc::new(FileStorage::new(&config.state_path));
        tracing::debug!(state_path = %config.state_path.display(), "opened state file");
        Ok(Self::new(api, storage, geolocator, StoreOptions::from(config)))
    }

    /// Places an order for everything in the cart. Once the server accepts
    /// it, exactly the ordered lines are taken out of the cart; anything
    /// added while the request was in flight stays. A rejected order leaves
    /// the cart as it was.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotAuthenticated`] when nobody is signed in,
    /// [`StoreError::EmptyCart`] when there is nothing to order, and the API
    /// failure otherwise.
    pub async fn checkout(
        &self,
        store_id: i64,
        payment_method: i32,
        pickup_time: &str,
        remarks: Option<&str>,
    ) -> Result<Order, StoreError> {
        if !self.session.is_authenticated() {
            return Err(StoreError::NotAuthenticated);
        }
        let cart = self.cart.snapshot();
        if cart.is_empty() {
            return Err(StoreError::EmptyCart);
        }

        let order = NewOrder {
            store_id,
            items: order_lines(&cart.items),
            payment_method,
            pickup_time: pickup_time.to_string(),
            remarks: remarks.map(str::to_string),
        };
        let created = self.orders.create_order(&order).await?;
        self.cart.remove_lines(&cart.items);
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_follow_config() {
        let config = AppConfig {
            env: brewline_core::Environment::Test,
            api_base_url: "http://localhost:8080/api/v1".to_string(),
            api_timeout_secs: 5,
            user_agent: "brewline-test".to_string(),
            state_path: std::path::PathBuf::from("state.json"),
            log_level: "debug".to_string(),
            offline_fallback: false,
            send_trace_headers: false,
            default_latitude: 31.2304,
            default_longitude: 121.4737,
        };

        let options = StoreOptions::from(&config);
        assert!(!options.offline_fallback);
        assert_eq!(options.default_location, Coordinates::new(31.2304, 121.4737));
    }

    #[test]
    fn default_options_enable_fallback() {
        let options = StoreOptions::default();
        assert!(options.offline_fallback);
        assert_eq!(options.default_location, DEFAULT_LOCATION);
    }
}
