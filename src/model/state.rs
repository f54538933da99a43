// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::document::Tag;
use super::geo::Coordinate;

/// Sequence token ordering competing state requests. Higher is more recent.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    pub const INITIAL: Self = Self(0);

    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Whether a result computed for `self` may replace a state committed at `committed`.
    pub fn may_replace(self, committed: Version) -> bool {
        self >= committed
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// What the map should show: viewport plus tag filter, tagged with the request version.
///
/// This is also the host's serializable view state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapState {
    pub center: Coordinate,
    pub zoom: f64,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub version: Version,
}

impl MapState {
    pub fn new(center: Coordinate, zoom: f64, tags: Vec<Tag>, version: Version) -> Self {
        Self {
            center,
            zoom,
            tags,
            version,
        }
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    pub fn with_view(mut self, center: Coordinate, zoom: f64) -> Self {
        self.center = center;
        self.zoom = zoom;
        self
    }
}
