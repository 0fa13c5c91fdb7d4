//! Coffee-shop locations.
//!
//! Every store record lives once, in an id-keyed map. Search results, nearby
//! results and favorites are ordered id lists over that map, so a favorite
//! flag flipped on one entity is seen by every view at once.

use std::collections::HashMap;
use std::sync::Arc;

use brewline_client::{ApiClient, NearbyQuery, StoreSearchQuery};
use brewline_core::{Coordinates, Store};
use tokio::sync::{watch, Mutex};

use crate::error::StoreError;
use crate::fallback;
use crate::geo::Geolocator;
use crate::persistence::{forget, keys, persist, KeyValueStorage};
use crate::snapshot::{impl_action_state, Published};
use crate::source::{resolve, DataSource, Sourced};

/// Radius used when a nearby query does not give one, in metres. Wide
/// enough to cover every store.
pub const DEFAULT_RADIUS_M: u64 = 10_000_000;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationState {
    entities: HashMap<i64, Store>,
    search_ids: Vec<i64>,
    nearby_ids: Vec<i64>,
    favorite_ids: Vec<i64>,
    selected_id: Option<i64>,
    pub current_location: Option<Coordinates>,
    pub loading: bool,
    pub error: Option<String>,
}

impl_action_state!(LocationState);

impl LocationState {
    #[must_use]
    pub fn store(&self, id: i64) -> Option<&Store> {
        self.entities.get(&id)
    }

    /// Results of the last search.
    #[must_use]
    pub fn stores(&self) -> Vec<&Store> {
        self.view(&self.search_ids)
    }

    #[must_use]
    pub fn nearby_stores(&self) -> Vec<&Store> {
        self.view(&self.nearby_ids)
    }

    /// Known stores currently flagged as favorites.
    #[must_use]
    pub fn favorite_stores(&self) -> Vec<&Store> {
        self.view(&self.favorite_ids)
            .into_iter()
            .filter(|s| s.is_favorite)
            .collect()
    }

    #[must_use]
    pub fn selected_store(&self) -> Option<&Store> {
        self.selected_id.and_then(|id| self.entities.get(&id))
    }

    fn view(&self, ids: &[i64]) -> Vec<&Store> {
        ids.iter().filter_map(|id| self.entities.get(id)).collect()
    }

    /// Upserts `stores` and returns their ids in order. Only live data may
    /// change a known store's favorite flag; built-in and persisted copies
    /// keep whatever the server last confirmed.
    fn absorb(&mut self, stores: &[Store], source: DataSource) -> Vec<i64> {
        stores
            .iter()
            .map(|store| {
                let mut incoming = store.clone();
                if source == DataSource::Fallback {
                    if let Some(known) = self.entities.get(&store.id) {
                        incoming.is_favorite = known.is_favorite;
                    }
                }
                self.entities.insert(store.id, incoming);
                store.id
            })
            .collect()
    }

    fn set_favorite(&mut self, id: i64, is_favorite: bool) {
        if let Some(store) = self.entities.get_mut(&id) {
            store.is_favorite = is_favorite;
        }
        self.favorite_ids.retain(|&f| f != id);
        if is_favorite {
            self.favorite_ids.push(id);
        }
    }
}

pub struct LocationStore {
    api: ApiClient,
    storage: Arc<dyn KeyValueStorage>,
    geolocator: Arc<dyn Geolocator>,
    default_location: Coordinates,
    offline_fallback: bool,
    state: Published<LocationState>,
    gate: Mutex<()>,
}

impl LocationStore {
    #[must_use]
    pub fn new(
        api: ApiClient,
        storage: Arc<dyn KeyValueStorage>,
        geolocator: Arc<dyn Geolocator>,
        default_location: Coordinates,
        offline_fallback: bool,
    ) -> Self {
        Self {
            api,
            storage,
            geolocator,
            default_location,
            offline_fallback,
            state: Published::new(LocationState::default()),
            gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<LocationState> {
        self.state.snapshot()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<LocationState>> {
        self.state.subscribe()
    }

    /// Device position, resolved once and then cached. When the geolocator
    /// fails the configured default location is used, and cached too.
    pub async fn get_current_position(&self) -> Coordinates {
        let _gate = self.gate.lock().await;
        self.position().await
    }

    /// Stores within `radius` metres (default [`DEFAULT_RADIUS_M`]) of
    /// `coords`, or of the device position when `coords` is `None`.
    ///
    /// # Errors
    ///
    /// Returns the API failure only when offline fallback is disabled.
    pub async fn get_nearby_stores(
        &self,
        coords: Option<Coordinates>,
        radius: Option<u64>,
    ) -> Result<Sourced<Vec<Store>>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        let origin = match coords {
            Some(c) => c,
            None => self.position().await,
        };
        let radius = radius.unwrap_or(DEFAULT_RADIUS_M);
        let query = NearbyQuery {
            latitude: origin.latitude,
            longitude: origin.longitude,
            radius,
            page: None,
            size: None,
        };
        let result = self.api.nearby_stores(&query).await;

        let substitute = || fallback_nearby(origin, radius);
        match resolve(self.offline_fallback, "nearby stores", result, substitute) {
            Ok((sourced, error)) => {
                tracing::debug!(count = sourced.data.len(), source = ?sourced.source, "nearby stores loaded");
                self.state.finish(|state| {
                    state.nearby_ids = state.absorb(&sourced.data, sourced.source);
                    state.error = error;
                });
                Ok(sourced)
            }
            Err(e) => Err(self.state.fail(e)),
        }
    }

    /// Keyword search, biased towards `coords` or the device position.
    ///
    /// # Errors
    ///
    /// Returns the API failure only when offline fallback is disabled.
    pub async fn search_stores(
        &self,
        keyword: &str,
        coords: Option<Coordinates>,
    ) -> Result<Sourced<Vec<Store>>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        let origin = match coords {
            Some(c) => c,
            None => self.position().await,
        };
        let query = StoreSearchQuery {
            keyword: keyword.to_string(),
            latitude: Some(origin.latitude),
            longitude: Some(origin.longitude),
            page: None,
            size: None,
        };
        let result = self.api.search_stores(&query).await;

        let substitute = || fallback_search(keyword);
        match resolve(self.offline_fallback, "store search", result, substitute) {
            Ok((sourced, error)) => {
                self.state.finish(|state| {
                    state.search_ids = state.absorb(&sourced.data, sourced.source);
                    state.error = error;
                });
                Ok(sourced)
            }
            Err(e) => Err(self.state.fail(e)),
        }
    }

    /// Loads one store and selects it.
    ///
    /// # Errors
    ///
    /// Returns the API failure when offline fallback is disabled, and
    /// [`StoreError::NotFound`] when the fallback list has no such id.
    pub async fn get_store_detail(&self, id: i64) -> Result<Sourced<Store>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        let result = self.api.store(id).await.map(Some);

        match resolve(self.offline_fallback, "store detail", result, || fallback::store_by_id(id)) {
            Ok((Sourced { data: Some(store), source }, error)) => {
                self.state.finish(|state| {
                    state.absorb(std::slice::from_ref(&store), source);
                    state.selected_id = Some(store.id);
                    state.error = error;
                });
                Ok(Sourced { data: store, source })
            }
            Ok((Sourced { data: None, .. }, _)) => {
                Err(self.state.fail(StoreError::NotFound { entity: "store", id }))
            }
            Err(e) => Err(self.state.fail(e)),
        }
    }

    /// The signed-in customer's favorites. Account data, so no fallback.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn get_favorite_stores(&self) -> Result<Vec<Store>, StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        match self.api.favorite_stores().await {
            Ok(stores) => {
                self.state.finish(|state| {
                    // The server only lists favorites; make the flag agree.
                    let mut marked = stores.clone();
                    for store in &mut marked {
                        store.is_favorite = true;
                    }
                    state.favorite_ids = state.absorb(&marked, DataSource::Live);
                });
                Ok(stores)
            }
            Err(e) => Err(self.state.fail(e.into())),
        }
    }

    /// Sets the favorite flag on the server, then locally. A failed remote
    /// call leaves local state untouched.
    ///
    /// # Errors
    ///
    /// Returns the API failure and records its message.
    pub async fn toggle_favorite(&self, id: i64, is_favorite: bool) -> Result<(), StoreError> {
        let _gate = self.gate.lock().await;
        self.state.begin();
        match self.api.set_favorite(id, is_favorite).await {
            Ok(()) => {
                tracing::debug!(store_id = id, is_favorite, "favorite updated");
                self.state.finish(|state| state.set_favorite(id, is_favorite));
                Ok(())
            }
            Err(e) => Err(self.state.fail(e.into())),
        }
    }

    /// Selects `store` and persists it under `selected_store`.
    pub fn select_store(&self, store: &Store) {
        self.state.update(|state| {
            state.absorb(std::slice::from_ref(store), DataSource::Fallback);
            state.selected_id = Some(store.id);
        });
        persist(self.storage.as_ref(), keys::SELECTED_STORE, store);
    }

    /// Restores the persisted selection. Malformed data is removed and
    /// ignored.
    pub fn load_selected_store(&self) -> Option<Store> {
        let raw = match self.storage.get(keys::SELECTED_STORE) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read selected store");
                return None;
            }
        };
        let store: Store = match serde_json::from_str(&raw) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed selected store");
                forget(self.storage.as_ref(), keys::SELECTED_STORE);
                return None;
            }
        };
        self.state.update(|state| {
            state.absorb(std::slice::from_ref(&store), DataSource::Fallback);
            state.selected_id = Some(store.id);
        });
        Some(store)
    }

    /// Memoized position lookup. Callers hold the gate.
    async fn position(&self) -> Coordinates {
        if let Some(cached) = self.snapshot().current_location {
            return cached;
        }
        let resolved = match self.geolocator.current_position().await {
            Ok(coords) => coords,
            Err(e) => {
                tracing::info!(error = %e, "using default location");
                self.default_location
            }
        };
        self.state.update(|state| state.current_location = Some(resolved));
        resolved
    }
}

/// Fallback stores within `radius` of `origin`, nearest first, with
/// distances filled in.
fn fallback_nearby(origin: Coordinates, radius: u64) -> Vec<Store> {
    #[allow(clippy::cast_precision_loss)]
    let radius = radius as f64;
    let mut stores: Vec<Store> = fallback::stores()
        .into_iter()
        .map(|mut store| {
            store.distance = Some(origin.distance_m(&store.coordinates()));
            store
        })
        .filter(|store| store.distance.is_some_and(|d| d <= radius))
        .collect();
    stores.sort_by(|a, b| a.distance.unwrap_or(f64::MAX).total_cmp(&b.distance.unwrap_or(f64::MAX)));
    stores
}

fn fallback_search(keyword: &str) -> Vec<Store> {
    let needle = keyword.to_lowercase();
    fallback::stores()
        .into_iter()
        .filter(|s| s.name.to_lowercase().contains(&needle) || s.address.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;
