// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The versioned map state machine.
//!
//! Every change to what the map shows goes through [`MapStateMachine::request_state_change`]:
//! the candidate's documents are queried and its markers built without holding any lock, then
//! the result is committed only if no newer version has been committed in the meantime. The
//! commit (version check, reconciliation, viewport and tag field update) happens under a single
//! lock with no suspension point, so the displayed state always belongs to exactly one version.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::builder::{BuildError, MarkerBuilder};
use crate::config::MapSettings;
use crate::model::geo::{clamp_zoom, zoom_to_fit};
use crate::model::{Bounds, Coordinate, MapState, MarkerDescriptor, Tag, Version};
use crate::query::{format_tag_box, parse_tag_box, QueryEngine};
use crate::reconcile::{reconcile, DrawnMarker, DrawnMarkers, Reconciled};
use crate::store::{DocumentIndex, StoreError};
use crate::surface::{DrawingSurface, TagFilterControl};

/// Lowest version handed to a host restore, above any version organic requests reach.
pub const RESTORE_VERSION_FLOOR: Version = Version::new(1_000_000_000);

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("document query failed: {0}")]
    Query(#[from] StoreError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// What a successful commit changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitReport {
    pub version: Version,
    pub added: usize,
    pub kept: usize,
    pub removed: usize,
    /// Bounds the viewport was fitted to, when auto fit applied.
    pub fitted: Option<Bounds>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommitOutcome {
    Committed(CommitReport),
    /// A newer version was committed while this candidate was being computed.
    Superseded {
        candidate: Version,
        committed: Version,
    },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

struct DisplayState<S, C> {
    committed: MapState,
    highest_issued: Version,
    drawn: DrawnMarkers,
    /// Last viewport, as set by a commit or reported by the surface.
    viewport: (Coordinate, f64),
    settings: Arc<MapSettings>,
    surface: S,
    controls: C,
}

impl<S: DrawingSurface, C: TagFilterControl> DisplayState<S, C> {
    fn issue_next(&mut self) -> Version {
        let version = self.committed.version.max(self.highest_issued).next();
        self.highest_issued = version;
        version
    }

    fn issue_restore(&mut self) -> Version {
        let version = self.highest_issued.next().max(RESTORE_VERSION_FLOOR);
        self.highest_issued = version;
        version
    }

    fn observe(&mut self, version: Version) {
        self.highest_issued = self.highest_issued.max(version);
    }

    fn commit(
        &mut self,
        candidate: MapState,
        fresh: Vec<MarkerDescriptor>,
        auto_fit: bool,
    ) -> CommitOutcome {
        let committed = self.committed.version;
        if !candidate.version.may_replace(committed) {
            tracing::debug!(
                candidate = %candidate.version,
                committed = %committed,
                "discarding superseded map state"
            );
            return CommitOutcome::Superseded {
                candidate: candidate.version,
                committed,
            };
        }

        let current = std::mem::take(&mut self.drawn);
        let Reconciled {
            drawn,
            added,
            kept,
            removed,
        } = reconcile(&mut self.surface, current, fresh);
        self.drawn = drawn;

        self.controls.set_text(&format_tag_box(&candidate.tags));
        self.surface.set_view(candidate.center, candidate.zoom);
        self.note_viewport(candidate.center, candidate.zoom);
        let fitted = if auto_fit { self.fit() } else { None };

        let version = candidate.version;
        self.committed = candidate;
        tracing::debug!(%version, added, kept, removed, "map state committed");

        CommitOutcome::Committed(CommitReport {
            version,
            added,
            kept,
            removed,
            fitted,
        })
    }

    fn fit(&mut self) -> Option<Bounds> {
        let bounds = self.drawn.bounds()?;
        self.surface.fit_bounds(bounds);
        self.note_viewport(bounds.center(), zoom_to_fit(&bounds, self.settings.fit_max_zoom));
        Some(bounds)
    }

    /// Records the viewport as the surface shows it.
    fn note_viewport(&mut self, center: Coordinate, zoom: f64) {
        self.viewport = (center.clamped(), clamp_zoom(zoom));
    }
}

/// Owns the committed map state and the surface it is drawn on.
pub struct MapStateMachine<S, C> {
    query: QueryEngine,
    builder: Arc<dyn MarkerBuilder>,
    display: Mutex<DisplayState<S, C>>,
}

impl<S, C> std::fmt::Debug for MapStateMachine<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapStateMachine")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl<S: DrawingSurface, C: TagFilterControl> MapStateMachine<S, C> {
    /// Creates a machine whose committed state is the settings' default view at version 0.
    ///
    /// Nothing is drawn until [`Self::show_initial`] (or any other request) commits.
    pub fn new(
        index: Arc<dyn DocumentIndex>,
        builder: Arc<dyn MarkerBuilder>,
        settings: MapSettings,
        surface: S,
        controls: C,
    ) -> Self {
        let committed = settings.default_state(Version::INITIAL);
        let viewport = (committed.center, committed.zoom);
        Self {
            query: QueryEngine::new(index),
            builder,
            display: Mutex::new(DisplayState {
                committed,
                highest_issued: Version::INITIAL,
                drawn: DrawnMarkers::default(),
                viewport,
                settings: Arc::new(settings),
                surface,
                controls,
            }),
        }
    }

    pub fn query(&self) -> &QueryEngine {
        &self.query
    }

    /// Computes `candidate` and commits it unless a newer version won in the meantime.
    ///
    /// Query and build failures leave the committed state and drawn markers untouched.
    pub async fn request_state_change(
        &self,
        candidate: MapState,
        auto_fit: bool,
    ) -> Result<CommitOutcome, MapError> {
        let settings = {
            let mut display = self.display.lock().await;
            display.observe(candidate.version);
            Arc::clone(&display.settings)
        };

        let fresh = match self.compute(&candidate.tags, &settings).await {
            Ok(fresh) => fresh,
            Err(err) => {
                tracing::warn!(
                    version = %candidate.version,
                    error = %err,
                    "map state request failed"
                );
                return Err(err);
            }
        };

        let mut display = self.display.lock().await;
        Ok(display.commit(candidate, fresh, auto_fit))
    }

    async fn compute(
        &self,
        tags: &[Tag],
        settings: &MapSettings,
    ) -> Result<Vec<MarkerDescriptor>, MapError> {
        let documents = self.query.matching_documents(tags).await?;
        let markers = self.builder.build_markers(&documents, settings).await?;
        Ok(markers)
    }

    /// Requests the default view at version 0; any other request beats it.
    pub async fn show_initial(&self) -> Result<CommitOutcome, MapError> {
        let candidate = {
            let display = self.display.lock().await;
            display.settings.default_state(Version::INITIAL)
        };
        self.request_state_change(candidate, false).await
    }

    /// Centers the map on `location` at the "go from note" zoom, keeping the current tags.
    pub async fn zoom_to_location(&self, location: Coordinate) -> Result<CommitOutcome, MapError> {
        let candidate = {
            let mut display = self.display.lock().await;
            let version = display.issue_next();
            MapState::new(
                location,
                display.settings.go_from_note_zoom,
                display.committed.tags.clone(),
                version,
            )
        };
        self.request_state_change(candidate, false).await
    }

    pub async fn reset_to_default(&self) -> Result<CommitOutcome, MapError> {
        let candidate = {
            let mut display = self.display.lock().await;
            let version = display.issue_next();
            display.settings.default_state(version)
        };
        self.request_state_change(candidate, false).await
    }

    /// Applies a host-provided view state. The state's own version is ignored: restores always
    /// win over every request issued before them.
    pub async fn restore_view_state(&self, state: MapState) -> Result<CommitOutcome, MapError> {
        let candidate = {
            let mut display = self.display.lock().await;
            let version = display.issue_restore();
            state.with_version(version)
        };
        self.request_state_change(candidate, false).await
    }

    /// Replaces the tag filter with the comma separated tags in `text`.
    pub async fn edit_tag_box(
        &self,
        text: &str,
        auto_fit: bool,
    ) -> Result<CommitOutcome, MapError> {
        let tags = parse_tag_box(text);
        let candidate = {
            let mut display = self.display.lock().await;
            let version = display.issue_next();
            let (center, zoom) = display.viewport;
            MapState::new(center, zoom, tags, version)
        };
        self.request_state_change(candidate, auto_fit).await
    }

    /// Adds `tag` to the committed filter and fits the view to the result.
    pub async fn add_tag(&self, tag: Tag) -> Result<CommitOutcome, MapError> {
        let candidate = {
            let mut display = self.display.lock().await;
            let version = display.issue_next();
            let mut tags = display.committed.tags.clone();
            if !tags.contains(&tag) {
                tags.push(tag);
            }
            let (center, zoom) = display.viewport;
            MapState::new(center, zoom, tags, version)
        };
        self.request_state_change(candidate, true).await
    }

    /// Fits the viewport to the drawn markers. Does not change the committed version.
    pub async fn fit_to_markers(&self) -> Option<Bounds> {
        self.display.lock().await.fit()
    }

    /// Records a viewport change made directly on the surface (user pan or zoom).
    pub async fn note_viewport(&self, center: Coordinate, zoom: f64) {
        self.display.lock().await.note_viewport(center, zoom);
    }

    /// The host view state: committed tags and version with the current viewport.
    pub async fn view_state(&self) -> MapState {
        let display = self.display.lock().await;
        let (center, zoom) = display.viewport;
        display.committed.clone().with_view(center, zoom)
    }

    pub async fn committed(&self) -> MapState {
        self.display.lock().await.committed.clone()
    }

    /// Drawn markers ordered by id.
    pub async fn drawn_markers(&self) -> Vec<DrawnMarker> {
        let display = self.display.lock().await;
        display.drawn.sorted().into_iter().cloned().collect()
    }

    pub async fn settings(&self) -> Arc<MapSettings> {
        Arc::clone(&self.display.lock().await.settings)
    }

    /// Makes the current view the default view and returns the updated settings for the caller
    /// to persist.
    pub async fn set_as_default(&self) -> MapSettings {
        let mut display = self.display.lock().await;
        let (center, zoom) = display.viewport;
        let current = display.committed.clone().with_view(center, zoom);
        let mut settings = MapSettings::clone(&display.settings);
        settings.set_default_view(&current);
        display.settings = Arc::new(settings.clone());
        tracing::info!(center = %current.center, zoom = current.zoom, "default view updated");
        settings
    }
}

#[cfg(test)]
mod tests;
