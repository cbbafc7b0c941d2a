//! Coordinates, search radii, and great-circle distance.

use serde::{Deserialize, Serialize};

/// Meters per statute mile, as used for the nearby-search `radius` parameter.
pub const METERS_PER_MILE: f64 = 1609.34;

const EARTH_RADIUS_KM: f64 = 6371.0;
const MILES_PER_KM: f64 = 0.621_371;

/// A WGS-84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to `other` in miles.
    #[must_use]
    pub fn distance_miles(&self, other: &Coordinate) -> f64 {
        haversine_miles(self, other)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Haversine distance between two coordinates in miles.
///
/// Uses a spherical Earth of radius 6371 km and converts with 0.621371 mi/km.
#[must_use]
pub fn haversine_miles(from: &Coordinate, to: &Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lng = (to.longitude - from.longitude).to_radians();
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c * MILES_PER_KM
}

/// The radius choices offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SearchRadius {
    Five,
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl SearchRadius {
    pub const ALL: [SearchRadius; 4] = [
        SearchRadius::Five,
        SearchRadius::Ten,
        SearchRadius::TwentyFive,
        SearchRadius::Fifty,
    ];

    #[must_use]
    pub const fn miles(self) -> u32 {
        match self {
            SearchRadius::Five => 5,
            SearchRadius::Ten => 10,
            SearchRadius::TwentyFive => 25,
            SearchRadius::Fifty => 50,
        }
    }

    /// Radius in meters, the unit the nearby-search endpoint expects.
    #[must_use]
    pub fn meters(self) -> f64 {
        f64::from(self.miles()) * METERS_PER_MILE
    }
}

impl TryFrom<u32> for SearchRadius {
    type Error = String;

    fn try_from(miles: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|r| r.miles() == miles)
            .ok_or_else(|| format!("unsupported radius {miles}; must be one of 5, 10, 25, 50"))
    }
}

impl From<SearchRadius> for u32 {
    fn from(radius: SearchRadius) -> Self {
        radius.miles()
    }
}

impl std::str::FromStr for SearchRadius {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let miles = s
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid radius '{s}': {e}"))?;
        Self::try_from(miles)
    }
}

impl std::fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.miles())
    }
}
