//! Map rendering seam.
//!
//! After a completed search the session recentres the map on the origin,
//! zooms in, and places one marker per result. [`MemoryMap`] keeps that
//! state in memory; [`GeoJsonMap`] also writes it out as a GeoJSON
//! `FeatureCollection` that any web map can display.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use medspa_core::{Coordinate, RankedResult};

use crate::error::RenderError;

/// Where the map starts before any search.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(33.1581, -117.3506);
pub const INITIAL_ZOOM: u8 = 10;
/// Zoom applied after a completed search.
pub const RESULTS_ZOOM: u8 = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: INITIAL_ZOOM,
        }
    }
}

/// Content shown when a marker is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub title: String,
    pub popup: Popup,
}

impl From<&RankedResult> for Marker {
    fn from(result: &RankedResult) -> Self {
        Marker {
            position: result.location(),
            title: result.name().to_owned(),
            popup: Popup {
                name: result.name().to_owned(),
                address: result.vicinity().to_owned(),
            },
        }
    }
}

pub trait MapRenderer: Send {
    /// Recentre and zoom.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the renderer cannot apply the view.
    fn set_view(&mut self, view: MapView) -> Result<(), RenderError>;

    /// Remove every marker placed so far.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the renderer cannot clear its markers.
    fn clear_markers(&mut self) -> Result<(), RenderError>;

    /// # Errors
    ///
    /// Returns [`RenderError`] if the marker cannot be placed.
    fn add_marker(&mut self, marker: Marker) -> Result<(), RenderError>;

    /// Called once the view and all markers for a search are in place.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if pending output cannot be written.
    fn flush(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

impl<M: MapRenderer + ?Sized> MapRenderer for Box<M> {
    fn set_view(&mut self, view: MapView) -> Result<(), RenderError> {
        (**self).set_view(view)
    }

    fn clear_markers(&mut self) -> Result<(), RenderError> {
        (**self).clear_markers()
    }

    fn add_marker(&mut self, marker: Marker) -> Result<(), RenderError> {
        (**self).add_marker(marker)
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        (**self).flush()
    }
}

/// Keeps the current view and markers in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryMap {
    view: MapView,
    markers: Vec<Marker>,
}

impl MemoryMap {
    #[must_use]
    pub fn view(&self) -> MapView {
        self.view
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The current view and markers as a GeoJSON `FeatureCollection`.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .markers
            .iter()
            .map(|m| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        // GeoJSON positions are [longitude, latitude].
                        "coordinates": [m.position.longitude, m.position.latitude],
                    },
                    "properties": {
                        "title": m.title,
                        "popup_name": m.popup.name,
                        "popup_address": m.popup.address,
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "properties": {
                "center": [self.view.center.longitude, self.view.center.latitude],
                "zoom": self.view.zoom,
            },
            "features": features,
        })
    }
}

impl MapRenderer for MemoryMap {
    fn set_view(&mut self, view: MapView) -> Result<(), RenderError> {
        self.view = view;
        Ok(())
    }

    fn clear_markers(&mut self) -> Result<(), RenderError> {
        self.markers.clear();
        Ok(())
    }

    fn add_marker(&mut self, marker: Marker) -> Result<(), RenderError> {
        self.markers.push(marker);
        Ok(())
    }
}

/// Writes the map state to a GeoJSON file on every flush.
#[derive(Debug)]
pub struct GeoJsonMap {
    inner: MemoryMap,
    path: PathBuf,
}

impl GeoJsonMap {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: MemoryMap::default(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn state(&self) -> &MemoryMap {
        &self.inner
    }
}

impl MapRenderer for GeoJsonMap {
    fn set_view(&mut self, view: MapView) -> Result<(), RenderError> {
        self.inner.set_view(view)
    }

    fn clear_markers(&mut self) -> Result<(), RenderError> {
        self.inner.clear_markers()
    }

    fn add_marker(&mut self, marker: Marker) -> Result<(), RenderError> {
        self.inner.add_marker(marker)
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        let body = serde_json::to_vec_pretty(&self.inner.to_geojson())?;
        std::fs::write(&self.path, body).map_err(|e| RenderError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;
        tracing::debug!(path = %self.path.display(), markers = self.inner.markers.len(), "map written");
        Ok(())
    }
}
