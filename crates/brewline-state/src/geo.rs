//! Device location lookup.

use async_trait::async_trait;
use brewline_core::Coordinates;
use thiserror::Error;

/// Beijing city centre. Used when the device location cannot be resolved.
pub const DEFAULT_LOCATION: Coordinates = Coordinates::new(39.9042, 116.4074);

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("location services are unavailable")]
    Unavailable,

    #[error("location permission denied")]
    PermissionDenied,
}

/// Source of the device's current position.
#[async_trait]
pub trait Geolocator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`GeoError`] when no position can be produced.
    async fn current_position(&self) -> Result<Coordinates, GeoError>;
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocator(pub Coordinates);

#[async_trait]
impl Geolocator for FixedGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        Ok(self.0)
    }
}

/// For hosts without location services, such as the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeolocator;

#[async_trait]
impl Geolocator for NoGeolocator {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        Err(GeoError::Unavailable)
    }
}
