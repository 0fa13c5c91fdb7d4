use serde::Serialize;

/// Where a catalogue read got its data from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// The API answered.
    Live,
    /// The API failed and the built-in static dataset was substituted.
    Fallback,
}

/// A read result tagged with its [`DataSource`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourced<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    #[must_use]
    pub fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
        }
    }

    #[must_use]
    pub fn fallback(data: T) -> Self {
        Self {
            data,
            source: DataSource::Fallback,
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == DataSource::Fallback
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            data: f(self.data),
            source: self.source,
        }
    }
}

/// Applies the offline-fallback contract to a catalogue read.
///
/// A live result passes through. On failure with fallback enabled, the
/// static dataset is substituted and the failure's user message is handed
/// back so the store can record it; with fallback disabled the failure is
/// returned.
pub(crate) fn resolve<T>(
    fallback_enabled: bool,
    what: &'static str,
    result: Result<T, brewline_client::ApiError>,
    fallback: impl FnOnce() -> T,
) -> Result<(Sourced<T>, Option<String>), crate::StoreError> {
    match result {
        Ok(data) => Ok((Sourced::live(data), None)),
        Err(e) if fallback_enabled => {
            tracing::warn!(what, error = %e, "API unavailable; serving built-in data");
            Ok((Sourced::fallback(fallback()), Some(e.user_message())))
        }
        Err(e) => Err(e.into()),
    }
}
