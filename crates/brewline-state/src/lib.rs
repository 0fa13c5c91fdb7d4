//! Client-side state stores for the Brewline storefront.
//!
//! Each store owns one slice of application state, publishes immutable
//! snapshots of it, and serializes its own actions. [`AppStores`] builds
//! them all around one shared API client and storage adapter.

pub mod app;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod fallback;
pub mod geo;
pub mod locations;
pub mod orders;
pub mod persistence;
pub mod recommendations;
mod snapshot;
pub mod source;

pub use app::{AppStores, StoreOptions};
pub use auth::{AuthSession, AuthState, AuthStore};
pub use cart::{CartState, CartStore};
pub use catalog::{CatalogState, CatalogStore};
pub use error::{StorageError, StoreError};
pub use geo::{FixedGeolocator, GeoError, Geolocator, NoGeolocator, DEFAULT_LOCATION};
pub use locations::{LocationState, LocationStore, DEFAULT_RADIUS_M};
pub use orders::{OrderState, OrderStore};
pub use persistence::{FileStorage, KeyValueStorage, MemoryStorage};
pub use recommendations::{RecommendationState, RecommendationStore};
pub use source::{DataSource, Sourced};
