//! Search session: the state shared by successive search cycles.
//!
//! Holds the places service, the map renderer, the search settings, the
//! last origin and result set, and at most one active position watch.
//!
//! Overlapping cycles are resolved as "latest wins". Manual searches take
//! `&mut self`, so they cannot overlap. In watch mode a new position reading
//! drops the in-flight cycle before it commits anything and a fresh cycle
//! starts from the new position.

use medspa_core::{Coordinate, RankedResult, SearchQuery, SearchRadius};

use crate::error::{GeolocationError, LocateError};
use crate::map::{MapRenderer, MapView, Marker, RESULTS_ZOOM};
use crate::pipeline::{run_search_cycle, SearchOutcome};
use crate::position::{PositionReading, PositionSource, PositionWatch, WatchOptions};
use crate::resolver::resolve_postal_code;
use crate::service::PlacesService;

/// What one step of a position watch produced.
#[derive(Debug)]
pub enum WatchEvent {
    /// A cycle completed for this reading and its results were committed.
    Searched {
        reading: PositionReading,
        outcome: SearchOutcome,
    },
    /// The position source reported an error; no cycle was started for it.
    Failed(GeolocationError),
}

enum Step {
    Done(SearchOutcome),
    Superseded(PositionReading),
    SourceError(GeolocationError),
    SourceClosed,
}

pub struct SearchSession<S, M> {
    service: S,
    map: M,
    keywords: Vec<String>,
    radius: SearchRadius,
    watch_options: WatchOptions,
    origin: Option<Coordinate>,
    results: Vec<RankedResult>,
    watch: Option<PositionWatch>,
    pending_error: Option<GeolocationError>,
}

impl<S, M> SearchSession<S, M>
where
    S: PlacesService,
    M: MapRenderer,
{
    pub fn new(service: S, map: M, keywords: Vec<String>) -> Self {
        Self {
            service,
            map,
            keywords,
            radius: SearchRadius::default(),
            watch_options: WatchOptions::default(),
            origin: None,
            results: Vec::new(),
            watch: None,
            pending_error: None,
        }
    }

    #[must_use]
    pub fn with_radius(mut self, radius: SearchRadius) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_watch_options(mut self, options: WatchOptions) -> Self {
        self.watch_options = options;
        self
    }

    /// Applies to the next search cycle.
    pub fn set_radius(&mut self, radius: SearchRadius) {
        self.radius = radius;
    }

    #[must_use]
    pub fn radius(&self) -> SearchRadius {
        self.radius
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Origin of the currently displayed results.
    #[must_use]
    pub fn origin(&self) -> Option<Coordinate> {
        self.origin
    }

    /// The currently displayed results, nearest first.
    #[must_use]
    pub fn results(&self) -> &[RankedResult] {
        &self.results
    }

    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Geocode `postal_code` and run a search cycle from it.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::Geocode`] if the code cannot be resolved; no
    /// search is made and the current results and map are left untouched.
    pub async fn search_postal_code(
        &mut self,
        postal_code: &str,
    ) -> Result<SearchOutcome, LocateError> {
        let origin = resolve_postal_code(&self.service, postal_code).await?;
        Ok(self.search_from(origin).await)
    }

    /// Run a search cycle from `origin` and commit its results.
    pub async fn search_from(&mut self, origin: Coordinate) -> SearchOutcome {
        let query = self.query_for(origin);
        let outcome = run_search_cycle(&self.service, &query).await;
        self.commit(&outcome);
        outcome
    }

    /// Subscribe to device positions, replacing any active subscription.
    ///
    /// # Errors
    ///
    /// Returns [`GeolocationError`] if the source cannot start a watch. Any
    /// previous subscription has already been released by then.
    pub fn start_watch(&mut self, source: &dyn PositionSource) -> Result<(), GeolocationError> {
        if self.stop_watch() {
            tracing::info!("replacing active position watch");
        }
        let watch = source.watch(self.watch_options)?;
        self.watch = Some(watch);
        Ok(())
    }

    /// Release the active subscription. Returns whether one was active.
    pub fn stop_watch(&mut self) -> bool {
        self.pending_error = None;
        self.watch.take().is_some()
    }

    /// Drive the watch until one search cycle completes or the source fails.
    ///
    /// Returns `None` when there is no active watch or the source has closed.
    /// A reading that arrives while a cycle is in flight cancels that cycle
    /// and restarts from the newer position. A position error that arrives
    /// mid-cycle does not stop the cycle; it is returned by the next call.
    pub async fn next_watch_event(&mut self) -> Option<WatchEvent> {
        if let Some(err) = self.pending_error.take() {
            return Some(WatchEvent::Failed(err));
        }

        let mut reading = match self.watch.as_mut()?.next().await {
            Some(Ok(reading)) => reading,
            Some(Err(err)) => return Some(WatchEvent::Failed(err)),
            None => {
                self.watch = None;
                return None;
            }
        };

        let outcome = 'search: loop {
            let query = self.query_for(reading.coordinate);
            let cycle = run_search_cycle(&self.service, &query);
            tokio::pin!(cycle);

            loop {
                let Some(watch) = self.watch.as_mut() else {
                    // Closed source: nothing can supersede this cycle now.
                    break 'search cycle.await;
                };
                // A finished cycle commits even when a reading is also ready.
                let step = tokio::select! {
                    biased;
                    outcome = &mut cycle => Step::Done(outcome),
                    next = watch.next() => match next {
                        Some(Ok(newer)) => Step::Superseded(newer),
                        Some(Err(err)) => Step::SourceError(err),
                        None => Step::SourceClosed,
                    },
                };

                match step {
                    Step::Done(outcome) => break 'search outcome,
                    Step::Superseded(newer) => {
                        tracing::info!(
                            superseded = %reading.coordinate,
                            origin = %newer.coordinate,
                            "position changed; restarting search cycle"
                        );
                        reading = newer;
                        break;
                    }
                    Step::SourceError(err) => {
                        // Reported on the next call. The cycle keeps running
                        // and a later reading can still supersede it.
                        tracing::warn!(error = %err, "position error during search cycle");
                        self.pending_error = Some(err);
                    }
                    Step::SourceClosed => self.watch = None,
                }
            }
        };

        self.commit(&outcome);
        Some(WatchEvent::Searched { reading, outcome })
    }

    fn query_for(&self, origin: Coordinate) -> SearchQuery {
        SearchQuery {
            origin,
            radius: self.radius,
            keywords: self.keywords.clone(),
        }
    }

    /// Replace the displayed results and redraw the map for them.
    ///
    /// Map failures are logged; the result set is still replaced.
    fn commit(&mut self, outcome: &SearchOutcome) {
        self.origin = Some(outcome.query.origin);
        self.results.clone_from(&outcome.results);

        let view = MapView {
            center: outcome.query.origin,
            zoom: RESULTS_ZOOM,
        };
        let rendered = self
            .map
            .set_view(view)
            .and_then(|()| self.map.clear_markers())
            .and_then(|()| {
                outcome
                    .results
                    .iter()
                    .try_for_each(|r| self.map.add_marker(Marker::from(r)))
            })
            .and_then(|()| self.map.flush());

        if let Err(e) = rendered {
            tracing::warn!(error = %e, "map update failed; result list is still current");
        }
    }
}
