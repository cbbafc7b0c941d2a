//! Best-effort detail lookup for a single candidate.

use medspa_core::{EnrichedCandidate, Enrichment, RawCandidate};

use crate::service::PlacesService;

/// Attach phone, website and map URL to `candidate`.
///
/// Never fails: any lookup error yields [`Enrichment::Unavailable`] and the
/// candidate is kept as-is.
pub async fn enrich_candidate<S>(service: &S, candidate: RawCandidate) -> EnrichedCandidate
where
    S: PlacesService + ?Sized,
{
    let enrichment = match service.place_details(&candidate.place_id).await {
        Ok(details) => Enrichment::Fetched(details),
        Err(e) => {
            tracing::debug!(
                place_id = %candidate.place_id,
                error = %e,
                "place details unavailable; keeping candidate without them"
            );
            Enrichment::Unavailable
        }
    };

    EnrichedCandidate {
        candidate,
        enrichment,
    }
}
