// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Marker reconciliation.
//!
//! Diffs the drawn marker set against a freshly computed marker list. Markers whose id survives
//! keep their live handle (and therefore their click handlers); stale markers are removed from
//! the surface exactly once; new markers are created once.
//!
//! A carried-forward marker keeps its old descriptor verbatim. Non-identity fields such as the
//! icon are not refreshed until the marker's id changes.

use std::collections::hash_map::{self, HashMap};

use crate::model::{Bounds, MarkerDescriptor, MarkerId};
use crate::surface::{DrawingSurface, MarkerActions, MarkerHandle};

/// A marker currently on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnMarker {
    pub descriptor: MarkerDescriptor,
    pub handle: MarkerHandle,
}

/// The authoritative drawn set, keyed by marker id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawnMarkers {
    markers: HashMap<MarkerId, DrawnMarker>,
}

impl DrawnMarkers {
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, id: &MarkerId) -> Option<&DrawnMarker> {
        self.markers.get(id)
    }

    pub fn contains(&self, id: &MarkerId) -> bool {
        self.markers.contains_key(id)
    }

    pub fn iter(&self) -> hash_map::Values<'_, MarkerId, DrawnMarker> {
        self.markers.values()
    }

    #[cfg(test)]
    pub(crate) fn find_by_handle(&self, handle: MarkerHandle) -> Option<&DrawnMarker> {
        self.markers.values().find(|marker| marker.handle == handle)
    }

    /// Drawn markers ordered by id, for stable presentation.
    pub fn sorted(&self) -> Vec<&DrawnMarker> {
        let mut markers = self.markers.values().collect::<Vec<_>>();
        markers.sort_by(|a, b| a.descriptor.id().cmp(b.descriptor.id()));
        markers
    }

    #[cfg(test)]
    pub(crate) fn ids(&self) -> Vec<MarkerId> {
        self.sorted()
            .into_iter()
            .map(|marker| marker.descriptor.id().clone())
            .collect()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::around(self.markers.values().map(|marker| marker.descriptor.location()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub drawn: DrawnMarkers,
    pub added: usize,
    pub kept: usize,
    pub removed: usize,
}

/// Reconciles `current` against `fresh`, creating and removing handles on `surface`.
///
/// Fresh descriptors sharing an id collapse to the first occurrence.
pub fn reconcile<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    current: DrawnMarkers,
    fresh: Vec<MarkerDescriptor>,
) -> Reconciled {
    let mut unclaimed = current.markers;
    let mut next = HashMap::with_capacity(fresh.len());
    let mut added = 0;
    let mut kept = 0;

    for descriptor in fresh {
        if next.contains_key(descriptor.id()) {
            continue;
        }
        if let Some(existing) = unclaimed.remove(descriptor.id()) {
            next.insert(descriptor.id().clone(), existing);
            kept += 1;
            continue;
        }
        let handle = surface.create_marker(&descriptor, MarkerActions::for_marker(&descriptor));
        next.insert(descriptor.id().clone(), DrawnMarker { descriptor, handle });
        added += 1;
    }

    let removed = unclaimed.len();
    for stale in unclaimed.into_values() {
        surface.remove_marker(stale.handle);
    }

    Reconciled {
        drawn: DrawnMarkers { markers: next },
        added,
        kept,
        removed,
    }
}
