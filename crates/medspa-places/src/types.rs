//! Maps Platform web-service response types.
//!
//! Every endpoint wraps its payload in a `{"status": "OK", ...}` envelope
//! with an optional `error_message`. Only the fields the locator reads are
//! modelled; everything else is ignored.

use serde::Deserialize;

use medspa_core::{Coordinate, PlaceDetails, RawCandidate};

/// The `status` field shared by the geocoding and places endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiStatus {
    Ok,
    ZeroResults,
    OverQueryLimit,
    OverDailyLimit,
    RequestDenied,
    InvalidRequest,
    NotFound,
    UnknownError,
    #[serde(other)]
    Unrecognized,
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApiStatus::Ok => "OK",
            ApiStatus::ZeroResults => "ZERO_RESULTS",
            ApiStatus::OverQueryLimit => "OVER_QUERY_LIMIT",
            ApiStatus::OverDailyLimit => "OVER_DAILY_LIMIT",
            ApiStatus::RequestDenied => "REQUEST_DENIED",
            ApiStatus::InvalidRequest => "INVALID_REQUEST",
            ApiStatus::NotFound => "NOT_FOUND",
            ApiStatus::UnknownError => "UNKNOWN_ERROR",
            ApiStatus::Unrecognized => "UNRECOGNIZED",
        };
        f.write_str(s)
    }
}

/// Status envelope common to all responses.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub status: ApiStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinate {
    fn from(value: LatLng) -> Self {
        Coordinate::new(value.lat, value.lng)
    }
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

// ---------------------------------------------------------------------------
// geocode
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
}

// ---------------------------------------------------------------------------
// place/nearbysearch
// ---------------------------------------------------------------------------

/// Nearby-search page. Results are kept as raw JSON so one malformed entry
/// does not discard the whole page.
#[derive(Debug, Deserialize)]
pub struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaceSummary {
    pub place_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vicinity: String,
    pub geometry: Geometry,
}

impl From<PlaceSummary> for RawCandidate {
    fn from(value: PlaceSummary) -> Self {
        RawCandidate {
            place_id: value.place_id,
            name: value.name,
            vicinity: value.vicinity,
            location: value.geometry.location.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// place/details
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    #[serde(default)]
    pub result: Option<PlaceDetailResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceDetailResult {
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<PlaceDetailResult> for PlaceDetails {
    fn from(value: PlaceDetailResult) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        PlaceDetails {
            phone: present(value.formatted_phone_number),
            website: present(value.website),
            url: present(value.url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_deserializes_as_unrecognized() {
        let env: Envelope = serde_json::from_str(r#"{"status":"SOMETHING_NEW"}"#).unwrap();
        assert_eq!(env.status, ApiStatus::Unrecognized);
        assert!(env.error_message.is_none());
    }

    #[test]
    fn status_display_round_trips_wire_names() {
        let env: Envelope =
            serde_json::from_str(r#"{"status":"OVER_QUERY_LIMIT","error_message":"slow"}"#)
                .unwrap();
        assert_eq!(env.status.to_string(), "OVER_QUERY_LIMIT");
        assert_eq!(env.error_message.as_deref(), Some("slow"));
    }

    #[test]
    fn place_summary_without_vicinity_defaults_to_empty() {
        let summary: PlaceSummary = serde_json::from_value(serde_json::json!({
            "place_id": "p1",
            "name": "Glow",
            "geometry": { "location": { "lat": 33.2, "lng": -117.35 } }
        }))
        .unwrap();
        let candidate = RawCandidate::from(summary);
        assert_eq!(candidate.vicinity, "");
        assert_eq!(candidate.location, Coordinate::new(33.2, -117.35));
    }

    #[test]
    fn blank_detail_fields_become_absent() {
        let details = PlaceDetails::from(PlaceDetailResult {
            formatted_phone_number: Some(String::new()),
            website: Some("https://glow.example".to_string()),
            url: None,
        });
        assert!(details.phone.is_none());
        assert_eq!(details.website.as_deref(), Some("https://glow.example"));
        assert!(details.url.is_none());
    }
}
