//! Product catalogue.

use std::sync::Arc;

use brewline_client::{ApiClient, ProductQuery};
use brewline_core::{Category, Product};
use tokio::sync::{watch, Mutex};

use crate::error::StoreError;
use crate::fallback;
use crate::snapshot::{impl_action_state, Published};
use crate::source::{resolve, Sourced};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub current_product: Option<Product>,
    pub loading: bool,
    pub error: Option<String>,
}

impl_action_state!(CatalogState);

impl CatalogState {
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_active())
    }
}

pub struct CatalogStore {
    api: ApiClient,
    offline_fallback: bool,
    state: Published<CatalogState>,
    gate: Mutex<()>,
}

impl CatalogStore {
    #[must_use]
    pub fn new(api: ApiClient, offline_fallback: bool) -> Self {
        Self {
            api,
            offline_fallback,
            state: Published::new(CatalogState::default()),
            gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<CatalogState> {
        self.state.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<CatalogState>> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn active_products(&self) -> Vec<Product> {
        self.snapshot().active_products().cloned().collect()
    }

    /// Loads the full product list.
    ///
    /// # Errors
    ///
    /// Returns the API failure only when offline fallback is disabled.
    pub async fn fetch_products(&self) -> Result<Sourced<Vec<Product>>, StoreError> {
        self.load_products(None).await
    }

    /// Loads the products of one category, replacing the product list.
    ///
    /// # Errors
    ///
    /// See [`CatalogStore::fetch_products`].
    pub async fn fetch_products_by_category(
        &self,
        category_id: i64,
    ) -> Result<Sourced<Vec<Product>>, StoreError> {
        self.load_products(Some(category_id)).await
    }

    /// Loads one product into `current_product`.
    ///
    /// # Errors
    ///
    /// Returns the API failure when offline fallback is disabled, and
    /// [`StoreError::NotFound`] when the fallback catalogue has no such id.
    pub async fn fetch_product_by_id(&self, id: i64) -> Result<Sourced<Product>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        let result = self.api.product(id).await;

        let resolved = resolve(self.offline_fallback, "product", result.map(Some), || {
            fallback::product_by_id(id)
        });
        match resolved {
            Ok((Sourced { data: Some(product), source }, error)) => {
                self.state.finish(|state| {
                    state.current_product = Some(product.clone());
                    state.error = error;
                });
                Ok(Sourced { data: product, source })
            }
            Ok((Sourced { data: None, .. }, _)) => Err(self.state.fail(StoreError::NotFound {
                entity: "product",
                id,
            })),
            Err(e) => Err(self.state.fail(e)),
        }
    }

    /// # Errors
    ///
    /// See [`CatalogStore::fetch_products`].
    pub async fn fetch_categories(&self) -> Result<Sourced<Vec<Category>>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        let result = self.api.categories().await;

        match resolve(self.offline_fallback, "categories", result, fallback::categories) {
            Ok((sourced, error)) => {
                self.state.finish(|state| {
                    state.categories.clone_from(&sourced.data);
                    state.error = error;
                });
                Ok(sourced)
            }
            Err(e) => Err(self.state.fail(e)),
        }
    }

    async fn load_products(
        &self,
        category_id: Option<i64>,
    ) -> Result<Sourced<Vec<Product>>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        let result = match category_id {
            Some(id) => self.api.products_by_category(id).await,
            None => self.api.products(&ProductQuery::default()).await,
        };

        let substitute = || match category_id {
            Some(id) => fallback::products_in_category(id),
            None => fallback::products(),
        };
        match resolve(self.offline_fallback, "products", result, substitute) {
            Ok((sourced, error)) => {
                tracing::debug!(count = sourced.data.len(), source = ?sourced.source, "products loaded");
                self.state.finish(|state| {
                    state.products.clone_from(&sourced.data);
                    state.error = error;
                });
                Ok(sourced)
            }
            Err(e) => Err(self.state.fail(e)),
        }
    }
}
