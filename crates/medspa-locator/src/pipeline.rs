//! One complete search cycle: fan-out, enrichment, consolidation.

use std::time::Instant;

use medspa_core::{RankedResult, SearchQuery};

use crate::consolidate::consolidate;
use crate::fanout::{collect_candidates, KeywordFailure};
use crate::service::PlacesService;

/// Counters from one cycle, for logging and display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub keywords_searched: usize,
    pub failed_keywords: Vec<KeywordFailure>,
    pub candidates_seen: usize,
    pub duplicates_dropped: usize,
    pub details_unavailable: usize,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub query: SearchQuery,
    /// Deduplicated, nearest first.
    pub results: Vec<RankedResult>,
    pub report: CycleReport,
}

/// Run the keyword fan-out for `query` and rank what comes back.
///
/// Keyword and detail failures are absorbed into the report; this never fails.
pub async fn run_search_cycle<S>(service: &S, query: &SearchQuery) -> SearchOutcome
where
    S: PlacesService + ?Sized,
{
    let started = Instant::now();
    tracing::info!(
        origin = %query.origin,
        radius_miles = query.radius.miles(),
        keywords = query.keywords.len(),
        "search cycle started"
    );

    let collected = collect_candidates(service, query).await;
    let candidates_seen = collected.candidates.len();
    let results = consolidate(collected.candidates, query.origin);

    let report = CycleReport {
        keywords_searched: query.keywords.len(),
        failed_keywords: collected.failed_keywords,
        candidates_seen,
        duplicates_dropped: candidates_seen - results.len(),
        details_unavailable: collected.details_unavailable,
    };

    tracing::info!(
        results = results.len(),
        candidates = report.candidates_seen,
        duplicates = report.duplicates_dropped,
        failed_keywords = report.failed_keywords.len(),
        details_unavailable = report.details_unavailable,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "search cycle finished"
    );

    SearchOutcome {
        query: query.clone(),
        results,
        report,
    }
}
