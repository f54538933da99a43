// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal-backed [`DrawingSurface`] and tag field.
//!
//! Both write into state shared with the renderer; the state machine owns the writers, the UI
//! loop only reads them (and moves the viewport on user pans).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::model::geo::{clamp_zoom, viewport_bounds, zoom_to_fit};
use crate::model::{Bounds, Coordinate, MarkerDescriptor};
use crate::surface::{DrawingSurface, MarkerActions, MarkerHandle, TagFilterControl};

/// Fraction of the half-viewport moved by one pan step.
const PAN_STEP: f64 = 0.25;

/// A marker as the terminal shows it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub handle: MarkerHandle,
    pub descriptor: MarkerDescriptor,
    pub actions: MarkerActions,
}

/// Everything the map canvas renders.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    markers: BTreeMap<MarkerHandle, PlacedMarker>,
    center: Coordinate,
    zoom: f64,
    fit_max_zoom: f64,
}

impl MapView {
    pub fn new(center: Coordinate, zoom: f64, fit_max_zoom: f64) -> Self {
        Self {
            markers: BTreeMap::new(),
            center,
            zoom,
            fit_max_zoom,
        }
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn bounds(&self) -> Bounds {
        viewport_bounds(self.center, self.zoom)
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&PlacedMarker> {
        self.markers.get(&handle)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Markers ordered by id, the order Tab cycles through.
    pub fn markers_by_id(&self) -> Vec<&PlacedMarker> {
        let mut markers = self.markers.values().collect::<Vec<_>>();
        markers.sort_by(|a, b| a.descriptor.id().cmp(b.descriptor.id()));
        markers
    }

    pub fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.center = center.clamped();
        self.zoom = clamp_zoom(zoom);
    }

    /// Pans by whole steps; `east` and `north` are -1, 0 or 1.
    pub fn pan(&mut self, east: i8, north: i8) {
        let bounds = self.bounds();
        let lon_step = bounds.lon_span() / 2.0 * PAN_STEP;
        let lat_step = bounds.lat_span() / 2.0 * PAN_STEP;
        let center = Coordinate::new(
            self.center.lat + f64::from(north) * lat_step,
            self.center.lon + f64::from(east) * lon_step,
        );
        self.set_view(center, self.zoom);
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.set_view(self.center, self.zoom + delta);
    }

    fn insert(&mut self, marker: PlacedMarker) {
        self.markers.insert(marker.handle, marker);
    }

    fn remove(&mut self, handle: MarkerHandle) -> Option<PlacedMarker> {
        self.markers.remove(&handle)
    }

    fn fit(&mut self, bounds: Bounds) {
        self.set_view(bounds.center(), zoom_to_fit(&bounds, self.fit_max_zoom));
    }
}

pub type SharedMapView = Arc<Mutex<MapView>>;

pub(crate) fn lock_view(view: &SharedMapView) -> MutexGuard<'_, MapView> {
    match view.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// [`DrawingSurface`] drawing into a [`SharedMapView`].
#[derive(Debug)]
pub struct TerminalSurface {
    next_handle: u64,
    view: SharedMapView,
}

impl TerminalSurface {
    pub fn new(view: SharedMapView) -> Self {
        Self {
            next_handle: 0,
            view,
        }
    }
}

impl DrawingSurface for TerminalSurface {
    fn create_marker(
        &mut self,
        descriptor: &MarkerDescriptor,
        actions: MarkerActions,
    ) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle::new(self.next_handle);
        lock_view(&self.view).insert(PlacedMarker {
            handle,
            descriptor: descriptor.clone(),
            actions,
        });
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        if lock_view(&self.view).remove(handle).is_none() {
            tracing::warn!(%handle, "removing unknown marker handle");
        }
    }

    fn set_view(&mut self, center: Coordinate, zoom: f64) {
        lock_view(&self.view).set_view(center, zoom);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        lock_view(&self.view).fit(bounds);
    }
}

/// The tag text field. The UI shows `text()` whenever the user is not editing it.
#[derive(Debug, Clone, Default)]
pub struct TagField {
    text: Arc<Mutex<String>>,
}

impl TagField {
    pub fn text(&self) -> String {
        match self.text.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TagFilterControl for TagField {
    fn set_text(&mut self, text: &str) {
        match self.text.lock() {
            Ok(mut guard) => *guard = text.to_owned(),
            Err(poisoned) => *poisoned.into_inner() = text.to_owned(),
        }
    }
}
