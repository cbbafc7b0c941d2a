//! HTTP client for the Maps Platform geocoding and places web services.
//!
//! Wraps `reqwest` with API key management, the shared status envelope, and
//! typed response decoding. Only the three calls the clinic locator needs are
//! exposed: [`PlacesClient::geocode`], [`PlacesClient::nearby_search`] and
//! [`PlacesClient::place_details`].

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use medspa_core::{Coordinate, PlaceDetails, RawCandidate};

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{
    ApiStatus, DetailsResponse, Envelope, GeocodeResponse, NearbySearchResponse, PlaceSummary,
};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/";

/// Detail fields requested per place. Billing is per field group, so keep
/// this to what the result list shows.
pub const DETAIL_FIELDS: &str = "formatted_phone_number,website,url";

/// Client for the Maps Platform web services.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production Maps Platform API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends endpoint paths
        // instead of replacing the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Enables retry of transient failures with exponential back-off.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Resolves a free-text address or postal code to a coordinate.
    ///
    /// The first result is used when the service returns several.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::NoMatch`] if the service finds nothing.
    /// - [`PlacesError::Api`] on any other non-`OK` status.
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport or
    ///   decode failure.
    pub async fn geocode(&self, address: &str) -> Result<Coordinate, PlacesError> {
        let url = self.build_url("geocode/json", &[("address", address)])?;
        let body = self.get_json(&url).await?;

        if Self::check_status("geocode", &body)? == ApiStatus::ZeroResults {
            return Err(PlacesError::NoMatch {
                address: address.to_owned(),
            });
        }

        let response: GeocodeResponse =
            Self::decode(body, || format!("geocode(address={address})"))?;
        let first = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| PlacesError::NoMatch {
                address: address.to_owned(),
            })?;

        tracing::debug!(
            address,
            formatted_address = first.formatted_address.as_deref().unwrap_or(""),
            "geocoded address"
        );
        Ok(first.geometry.location.into())
    }

    /// Runs one keyword nearby search and returns the first page of places.
    ///
    /// `ZERO_RESULTS` yields an empty list. Entries missing a place ID or
    /// geometry are skipped.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] on a non-`OK`, non-`ZERO_RESULTS` status.
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport or
    ///   decode failure.
    pub async fn nearby_search(
        &self,
        origin: Coordinate,
        radius_meters: f64,
        keyword: &str,
    ) -> Result<Vec<RawCandidate>, PlacesError> {
        let location = format!("{},{}", origin.latitude, origin.longitude);
        let radius = format_radius(radius_meters);
        let url = self.build_url(
            "place/nearbysearch/json",
            &[
                ("location", &location),
                ("radius", &radius),
                ("keyword", keyword),
            ],
        )?;
        let body = self.get_json(&url).await?;

        if Self::check_status("nearbysearch", &body)? == ApiStatus::ZeroResults {
            return Ok(Vec::new());
        }

        let page: NearbySearchResponse =
            Self::decode(body, || format!("nearbysearch(keyword={keyword})"))?;
        if page.next_page_token.is_some() {
            tracing::debug!(keyword, "nearbysearch has further pages; using first page only");
        }

        let candidates = page
            .results
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| {
                serde_json::from_value::<PlaceSummary>(value)
                    .map_err(|e| {
                        tracing::warn!(keyword, idx, error = %e, "nearbysearch: skipping malformed place");
                    })
                    .ok()
            })
            .map(RawCandidate::from)
            .collect();

        Ok(candidates)
    }

    /// Fetches phone, website and canonical map URL for one place.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] on any non-`OK` status (including `NOT_FOUND`).
    /// - [`PlacesError::Http`] / [`PlacesError::Deserialize`] on transport or
    ///   decode failure.
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceDetails, PlacesError> {
        let url = self.build_url(
            "place/details/json",
            &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
        )?;
        let body = self.get_json(&url).await?;

        let status = Self::check_status("details", &body)?;
        if status != ApiStatus::Ok {
            return Err(PlacesError::Api {
                operation: "details",
                status,
                message: "no details returned".to_owned(),
            });
        }

        let response: DetailsResponse =
            Self::decode(body, || format!("details(place_id={place_id})"))?;
        Ok(response.result.unwrap_or_default().into())
    }

    /// Builds an endpoint URL with the API key and percent-encoded parameters.
    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, PlacesError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// GET with retry, asserting a 2xx status and parsing the body as JSON.
    async fn get_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.request_json(url)
        })
        .await
        .map_err(Self::redact)
    }

    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, PlacesError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: url.path().to_owned(),
                source: e,
            })?;

        // Surface UNKNOWN_ERROR here so the retry loop sees it.
        if let Ok(envelope) = serde_json::from_value::<Envelope>(value.clone()) {
            if envelope.status == ApiStatus::UnknownError {
                return Err(PlacesError::Api {
                    operation: endpoint_name(url),
                    status: envelope.status,
                    message: envelope.error_message.unwrap_or_default(),
                });
            }
        }
        Ok(value)
    }

    /// Reads the envelope status; anything other than `OK` or `ZERO_RESULTS`
    /// becomes [`PlacesError::Api`].
    fn check_status(
        operation: &'static str,
        body: &serde_json::Value,
    ) -> Result<ApiStatus, PlacesError> {
        let envelope: Envelope =
            serde_json::from_value(body.clone()).map_err(|e| PlacesError::Deserialize {
                context: format!("{operation} status envelope"),
                source: e,
            })?;
        match envelope.status {
            ApiStatus::Ok | ApiStatus::ZeroResults => Ok(envelope.status),
            status => Err(PlacesError::Api {
                operation,
                status,
                message: envelope
                    .error_message
                    .unwrap_or_else(|| "no error message".to_owned()),
            }),
        }
    }

    fn decode<T: DeserializeOwned>(
        body: serde_json::Value,
        context: impl FnOnce() -> String,
    ) -> Result<T, PlacesError> {
        serde_json::from_value(body).map_err(|e| PlacesError::Deserialize {
            context: context(),
            source: e,
        })
    }

    /// Strips the request URL (which carries the API key) from reqwest errors.
    fn redact(err: PlacesError) -> PlacesError {
        match err {
            PlacesError::Http(e) => PlacesError::Http(e.without_url()),
            other => other,
        }
    }
}

/// Formats a radius in meters with one decimal place.
fn format_radius(radius_meters: f64) -> String {
    format!("{radius_meters:.1}")
}

fn endpoint_name(url: &Url) -> &'static str {
    let path = url.path();
    if path.ends_with("geocode/json") {
        "geocode"
    } else if path.ends_with("nearbysearch/json") {
        "nearbysearch"
    } else if path.ends_with("details/json") {
        "details"
    } else {
        "request"
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
