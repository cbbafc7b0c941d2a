use thiserror::Error;

use crate::types::ApiStatus;

/// Errors returned by the Maps Platform web-service client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-`OK` status in the JSON envelope.
    #[error("{operation} failed with status {status}: {message}")]
    Api {
        operation: &'static str,
        status: ApiStatus,
        message: String,
    },

    /// Geocoding found no location for the address.
    #[error("no location found for '{address}'")]
    NoMatch { address: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
