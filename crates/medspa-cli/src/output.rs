//! Result rendering for the terminal.

use std::fmt::Write as _;

use medspa_core::{Coordinate, RankedResult};
use medspa_locator::SearchOutcome;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct JsonOutcome<'a> {
    origin: Coordinate,
    radius_miles: u32,
    results: &'a [RankedResult],
    failed_keywords: Vec<&'a str>,
}

/// Serialize an outcome; compact output is one line per outcome.
pub(crate) fn render_json(outcome: &SearchOutcome, pretty: bool) -> serde_json::Result<String> {
    let doc = JsonOutcome {
        origin: outcome.query.origin,
        radius_miles: outcome.query.radius.miles(),
        results: &outcome.results,
        failed_keywords: outcome
            .report
            .failed_keywords
            .iter()
            .map(|f| f.keyword.as_str())
            .collect(),
    };
    if pretty {
        serde_json::to_string_pretty(&doc)
    } else {
        serde_json::to_string(&doc)
    }
}

/// Numbered list, nearest first. Detail lines are omitted when unknown.
pub(crate) fn render_list(outcome: &SearchOutcome) -> String {
    let radius = outcome.query.radius.miles();
    let origin = outcome.query.origin;
    let mut out = String::new();

    if outcome.results.is_empty() {
        let _ = writeln!(out, "No clinics found within {radius} miles of {origin}.");
        return out;
    }

    let count = outcome.results.len();
    let noun = if count == 1 { "clinic" } else { "clinics" };
    let _ = writeln!(out, "{count} {noun} within {radius} miles of {origin}");

    for (idx, result) in outcome.results.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {}", idx + 1, result.name());
        if !result.vicinity().is_empty() {
            let _ = writeln!(out, "   {}", result.vicinity());
        }
        let _ = writeln!(out, "   {:.1} miles away", result.distance_miles);
        if let Some(phone) = result.phone() {
            let _ = writeln!(out, "   Phone: {phone}");
        }
        if let Some(host) = result.website_host() {
            let _ = writeln!(out, "   Website: {host}");
        }
        if let Some(url) = result.directions_url() {
            let _ = writeln!(out, "   Directions: {url}");
        }
    }
    out
}

/// Keyword failures go to stderr; the results on stdout are still complete
/// for the keywords that succeeded.
pub(crate) fn report_failures(outcome: &SearchOutcome) {
    let failed = &outcome.report.failed_keywords;
    if failed.is_empty() {
        return;
    }
    let names: Vec<&str> = failed.iter().map(|f| f.keyword.as_str()).collect();
    eprintln!(
        "note: {} of {} keyword searches failed ({})",
        failed.len(),
        outcome.report.keywords_searched,
        names.join(", ")
    );
}
