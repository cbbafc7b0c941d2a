//! Postal code to search origin.

use medspa_core::Coordinate;
use medspa_places::PlacesError;

use crate::error::GeocodeError;
use crate::service::PlacesService;

/// Geocode a ZIP or postal code into the origin for a search cycle.
///
/// Only emptiness is checked locally; anything else is left to the
/// geocoder, so a malformed code simply fails to match.
///
/// # Errors
///
/// - [`GeocodeError::EmptyInput`] for blank input (no request is made).
/// - [`GeocodeError::NoMatch`] if the geocoder finds nothing.
/// - [`GeocodeError::Service`] on any other geocoder failure.
pub async fn resolve_postal_code<S>(
    service: &S,
    postal_code: &str,
) -> Result<Coordinate, GeocodeError>
where
    S: PlacesService + ?Sized,
{
    let postal_code = postal_code.trim();
    if postal_code.is_empty() {
        return Err(GeocodeError::EmptyInput);
    }

    match service.geocode(postal_code).await {
        Ok(origin) => {
            tracing::info!(postal_code, %origin, "resolved search origin");
            Ok(origin)
        }
        Err(PlacesError::NoMatch { .. }) => Err(GeocodeError::NoMatch {
            postal_code: postal_code.to_owned(),
        }),
        Err(source) => Err(GeocodeError::Service {
            postal_code: postal_code.to_owned(),
            source,
        }),
    }
}
