use std::time::Duration;

use thiserror::Error;

use medspa_places::PlacesError;

/// A postal code could not be turned into a search origin.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("enter a ZIP or postal code to search")]
    EmptyInput,

    #[error("no location found for '{postal_code}'")]
    NoMatch { postal_code: String },

    #[error("could not look up '{postal_code}': {source}")]
    Service {
        postal_code: String,
        #[source]
        source: PlacesError,
    },
}

/// The device position could not be obtained.
#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported on this device")]
    Unsupported,

    #[error("no position fix within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("position source failed: {0}")]
    Platform(String),
}

/// User-visible failures that abort a search cycle before any searching.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write map output {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode map output: {0}")]
    Encode(#[from] serde_json::Error),
}
