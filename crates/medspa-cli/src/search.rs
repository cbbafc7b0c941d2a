//! Command handlers for `search`, `watch` and `keywords`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use medspa_core::{AppConfig, SearchRadius};
use medspa_locator::{
    GeoJsonMap, LinePositionSource, MapRenderer, MemoryMap, SearchSession, WatchEvent,
    WatchOptions,
};
use medspa_places::PlacesClient;
use tokio::io::BufReader;

use crate::output;

/// Flags shared by `search` and `watch`.
#[derive(Debug)]
pub(crate) struct RunOptions {
    pub radius: SearchRadius,
    pub json: bool,
    pub geojson: Option<PathBuf>,
}

type CliSession = SearchSession<PlacesClient, Box<dyn MapRenderer>>;

fn build_session(config: &AppConfig, opts: &RunOptions) -> anyhow::Result<CliSession> {
    let client = PlacesClient::with_base_url(
        &config.google_maps_api_key,
        config.request_timeout_secs,
        &config.user_agent,
        &config.places_base_url,
    )
    .context("failed to build places client")?
    .with_retries(config.max_retries, config.retry_backoff_base_ms);

    let keywords = medspa_core::resolve_keywords(config.keywords_path.as_deref())?;

    let map: Box<dyn MapRenderer> = match &opts.geojson {
        Some(path) => Box::new(GeoJsonMap::new(path)),
        None => Box::new(MemoryMap::default()),
    };

    let watch_options = WatchOptions {
        timeout: Duration::from_secs(config.geolocation_timeout_secs),
        ..WatchOptions::default()
    };

    Ok(SearchSession::new(client, map, keywords)
        .with_radius(opts.radius)
        .with_watch_options(watch_options))
}

/// Geocode `zip`, run one search cycle and print the results.
///
/// # Errors
///
/// Returns an error if configuration is unusable or the code cannot be
/// geocoded. Individual keyword or detail failures are not errors.
pub(crate) async fn run_search(
    config: &AppConfig,
    zip: &str,
    opts: &RunOptions,
) -> anyhow::Result<()> {
    let mut session = build_session(config, opts)?;
    let outcome = session.search_postal_code(zip).await?;

    if opts.json {
        println!("{}", output::render_json(&outcome, true)?);
    } else {
        print!("{}", output::render_list(&outcome));
    }
    output::report_failures(&outcome);
    Ok(())
}

/// Re-run the search for every position read from stdin until the input
/// ends, `max_updates` searches complete, or the user interrupts.
///
/// Position errors are reported and the watch keeps going.
///
/// # Errors
///
/// Returns an error if the watch cannot start, or if it ends with only
/// position errors and no completed search.
pub(crate) async fn run_watch(
    config: &AppConfig,
    opts: &RunOptions,
    max_updates: Option<u32>,
) -> anyhow::Result<()> {
    let mut session = build_session(config, opts)?;
    let source = LinePositionSource::new(BufReader::new(tokio::io::stdin()));
    session.start_watch(&source)?;
    tracing::info!(radius_miles = opts.radius.miles(), "watching position from stdin");

    let mut completed: u32 = 0;
    let mut last_error = None;

    loop {
        let event = tokio::select! {
            event = session.next_watch_event() => event,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        };
        let Some(event) = event else { break };

        match event {
            WatchEvent::Searched { reading, outcome } => {
                if opts.json {
                    println!("{}", output::render_json(&outcome, false)?);
                } else {
                    print!("{}", output::render_list(&outcome));
                    println!();
                }
                output::report_failures(&outcome);
                tracing::debug!(accuracy_m = ?reading.accuracy_m, at = %reading.timestamp, "reading handled");

                completed += 1;
                if max_updates.is_some_and(|max| completed >= max) {
                    break;
                }
            }
            WatchEvent::Failed(e) => {
                eprintln!("location unavailable: {e}");
                last_error = Some(e);
            }
        }
    }

    session.stop_watch();

    match last_error {
        Some(e) if completed == 0 => Err(e.into()),
        _ => Ok(()),
    }
}

/// Print the keywords a search would run, one per line.
///
/// # Errors
///
/// Returns an error if `file` is set but cannot be read or is invalid.
pub(crate) fn run_keywords(file: Option<&Path>) -> anyhow::Result<()> {
    let keywords = medspa_core::resolve_keywords(file)?;
    for keyword in &keywords {
        println!("{keyword}");
    }
    Ok(())
}
