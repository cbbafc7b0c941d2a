//! The places provider seam used by the search pipeline.

use async_trait::async_trait;

use medspa_core::{Coordinate, PlaceDetails, RawCandidate};
use medspa_places::{PlacesClient, PlacesError};

/// Geocoding, nearby search, and place details as the pipeline consumes them.
///
/// Implemented by [`PlacesClient`] for production; tests supply scripted
/// implementations.
#[async_trait]
pub trait PlacesService: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Coordinate, PlacesError>;

    async fn nearby_search(
        &self,
        origin: Coordinate,
        radius_meters: f64,
        keyword: &str,
    ) -> Result<Vec<RawCandidate>, PlacesError>;

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError>;
}

#[async_trait]
impl PlacesService for PlacesClient {
    async fn geocode(&self, address: &str) -> Result<Coordinate, PlacesError> {
        PlacesClient::geocode(self, address).await
    }

    async fn nearby_search(
        &self,
        origin: Coordinate,
        radius_meters: f64,
        keyword: &str,
    ) -> Result<Vec<RawCandidate>, PlacesError> {
        PlacesClient::nearby_search(self, origin, radius_meters, keyword).await
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        PlacesClient::place_details(self, place_id).await
    }
}
