//! Clinic search records as they move through one search cycle.
//!
//! A [`RawCandidate`] comes from a nearby search, picks up an [`Enrichment`]
//! to become an [`EnrichedCandidate`], and finally gains a distance to become
//! a [`RankedResult`].

use serde::{Deserialize, Serialize};
use url::Url;

use crate::geo::{Coordinate, SearchRadius};

/// Inputs for one search cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub origin: Coordinate,
    pub radius: SearchRadius,
    /// Searched in order, one nearby search per keyword.
    pub keywords: Vec<String>,
}

/// A place summary returned by a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    /// Provider-assigned place identity. Stable across keywords.
    pub place_id: String,
    pub name: String,
    /// Short address fragment as returned by the provider.
    pub vicinity: String,
    pub location: Coordinate,
}

/// Supplementary fields from a place-details lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub phone: Option<String>,
    pub website: Option<String>,
    /// Canonical map page for the place, used for directions.
    pub url: Option<String>,
}

/// Outcome of the best-effort detail lookup for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Enrichment {
    Fetched(PlaceDetails),
    /// The lookup failed; the candidate is kept without detail fields.
    Unavailable,
}

impl Enrichment {
    #[must_use]
    pub fn details(&self) -> Option<&PlaceDetails> {
        match self {
            Enrichment::Fetched(details) => Some(details),
            Enrichment::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedCandidate {
    #[serde(flatten)]
    pub candidate: RawCandidate,
    pub enrichment: Enrichment,
}

impl EnrichedCandidate {
    #[must_use]
    pub fn place_id(&self) -> &str {
        &self.candidate.place_id
    }
}

/// A deduplicated, distance-ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub place: EnrichedCandidate,
    pub distance_miles: f64,
}

impl RankedResult {
    #[must_use]
    pub fn place_id(&self) -> &str {
        self.place.place_id()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.place.candidate.name
    }

    #[must_use]
    pub fn vicinity(&self) -> &str {
        &self.place.candidate.vicinity
    }

    #[must_use]
    pub fn location(&self) -> Coordinate {
        self.place.candidate.location
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.detail(|d| d.phone.as_deref())
    }

    #[must_use]
    pub fn website(&self) -> Option<&str> {
        self.detail(|d| d.website.as_deref())
    }

    #[must_use]
    pub fn directions_url(&self) -> Option<&str> {
        self.detail(|d| d.url.as_deref())
    }

    /// Website hostname without a leading `www.`, for compact display.
    ///
    /// A website listed without a scheme is read as `http://`. Returns `None`
    /// when there is no website or it does not parse to a URL with a host.
    #[must_use]
    pub fn website_host(&self) -> Option<String> {
        let website = self.website()?;
        let parsed = match Url::parse(website) {
            Ok(parsed) => parsed,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                Url::parse(&format!("http://{website}")).ok()?
            }
            Err(_) => return None,
        };
        let host = parsed.host_str()?;
        Some(host.strip_prefix("www.").unwrap_or(host).to_owned())
    }

    fn detail<'a>(&'a self, field: impl Fn(&'a PlaceDetails) -> Option<&'a str>) -> Option<&'a str> {
        self.place.enrichment.details().and_then(field)
    }
}
