//! Deduplication, distance, and ranking.

use std::collections::HashSet;

use medspa_core::{Coordinate, EnrichedCandidate, RankedResult};

/// Collapse duplicates and rank by distance from `origin`.
///
/// The first occurrence of each place ID (in keyword-scan order) is kept and
/// later duplicates are dropped. The sort is stable, so equal distances keep
/// their scan order.
#[must_use]
pub fn consolidate(candidates: Vec<EnrichedCandidate>, origin: Coordinate) -> Vec<RankedResult> {
    let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
    let mut ranked: Vec<RankedResult> = candidates
        .into_iter()
        .filter(|c| seen.insert(c.place_id().to_owned()))
        .map(|place| {
            let distance_miles = origin.distance_miles(&place.candidate.location);
            RankedResult {
                place,
                distance_miles,
            }
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_miles.total_cmp(&b.distance_miles));
    ranked
}

#[cfg(test)]
mod tests {
    use medspa_core::{haversine_miles, Enrichment, PlaceDetails, RawCandidate};

    use super::*;

    const ORIGIN: Coordinate = Coordinate::new(33.1581, -117.3506);

    fn candidate(id: &str, vicinity: &str, lat: f64, lng: f64) -> EnrichedCandidate {
        EnrichedCandidate {
            candidate: RawCandidate {
                place_id: id.to_string(),
                name: format!("Clinic {id}"),
                vicinity: vicinity.to_string(),
                location: Coordinate::new(lat, lng),
            },
            enrichment: Enrichment::Unavailable,
        }
    }

    fn ids(results: &[RankedResult]) -> Vec<&str> {
        results.iter().map(RankedResult::place_id).collect()
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(consolidate(Vec::new(), ORIGIN).is_empty());
    }

    #[test]
    fn duplicates_collapse_to_first_occurrence() {
        let results = consolidate(
            vec![
                candidate("p1", "first address", 33.20, -117.35),
                candidate("p2", "other", 33.40, -117.35),
                candidate("p1", "second address", 33.20, -117.35),
            ],
            ORIGIN,
        );
        assert_eq!(ids(&results), vec!["p1", "p2"]);
        assert_eq!(results[0].vicinity(), "first address");
    }

    #[test]
    fn first_occurrence_wins_even_when_later_copy_is_enriched() {
        let mut later = candidate("p1", "later", 33.20, -117.35);
        later.enrichment = Enrichment::Fetched(PlaceDetails {
            phone: Some("555".to_string()),
            ..PlaceDetails::default()
        });
        let results = consolidate(
            vec![candidate("p1", "earlier", 33.20, -117.35), later],
            ORIGIN,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].vicinity(), "earlier");
        assert!(results[0].phone().is_none());
    }

    #[test]
    fn sorted_ascending_by_distance() {
        let results = consolidate(
            vec![
                candidate("far", "", 33.60, -117.35),
                candidate("near", "", 33.16, -117.35),
                candidate("mid", "", 33.30, -117.35),
            ],
            ORIGIN,
        );
        assert_eq!(ids(&results), vec!["near", "mid", "far"]);
        assert!(results
            .windows(2)
            .all(|w| w[0].distance_miles <= w[1].distance_miles));
    }

    #[test]
    fn equal_distances_keep_scan_order() {
        let results = consolidate(
            vec![
                candidate("b", "", 33.20, -117.35),
                candidate("a", "", 33.20, -117.35),
                candidate("c", "", 33.20, -117.35),
            ],
            ORIGIN,
        );
        assert_eq!(ids(&results), vec!["b", "a", "c"]);
    }

    #[test]
    fn distance_matches_haversine_from_origin() {
        let results = consolidate(vec![candidate("p1", "", 33.20, -117.35)], ORIGIN);
        let expected = haversine_miles(&ORIGIN, &Coordinate::new(33.20, -117.35));
        assert!((results[0].distance_miles - expected).abs() < 1e-9);
        assert!(results[0].distance_miles >= 0.0);
        // 0.0419 degrees of latitude, roughly 2.9 miles
        assert!((results[0].distance_miles - 2.895).abs() < 0.01);
    }

    #[test]
    fn candidate_at_origin_has_zero_distance() {
        let results = consolidate(vec![candidate("here", "", 33.1581, -117.3506)], ORIGIN);
        assert!(results[0].distance_miles.abs() < 1e-9);
    }
}
