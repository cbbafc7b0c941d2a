//! Sequential multi-keyword nearby search.
//!
//! One nearby search per keyword, strictly in keyword order. Each keyword's
//! candidates are enriched one at a time before the next keyword is searched,
//! so at most one request is ever in flight.

use medspa_core::{EnrichedCandidate, Enrichment, SearchQuery};

use crate::enrich::enrich_candidate;
use crate::service::PlacesService;

/// A keyword whose nearby search failed and contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordFailure {
    pub keyword: String,
    pub reason: String,
}

/// Everything gathered across all keywords, duplicates included.
#[derive(Debug, Default)]
pub struct Collected {
    /// Candidates in keyword-scan order.
    pub candidates: Vec<EnrichedCandidate>,
    pub failed_keywords: Vec<KeywordFailure>,
    pub details_unavailable: usize,
}

/// Run the keyword fan-out for `query`.
///
/// A failing keyword is logged and skipped; the remaining keywords still run.
pub async fn collect_candidates<S>(service: &S, query: &SearchQuery) -> Collected
where
    S: PlacesService + ?Sized,
{
    let radius_meters = query.radius.meters();
    let mut collected = Collected::default();

    for keyword in &query.keywords {
        let places = match service
            .nearby_search(query.origin, radius_meters, keyword)
            .await
        {
            Ok(places) => places,
            Err(e) => {
                tracing::warn!(
                    keyword = %keyword,
                    error = %e,
                    "nearby search failed; keyword contributes no candidates"
                );
                collected.failed_keywords.push(KeywordFailure {
                    keyword: keyword.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        tracing::debug!(keyword = %keyword, count = places.len(), "nearby search returned");

        for place in places {
            let enriched = enrich_candidate(service, place).await;
            if enriched.enrichment == Enrichment::Unavailable {
                collected.details_unavailable += 1;
            }
            collected.candidates.push(enriched);
        }
    }

    collected
}
