// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! Documents carry tags and content; markers are plotted points derived from documents; a
//! `MapState` is one versioned request for what the map should show.

pub mod document;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod geo;
pub mod ids;
pub mod marker;
pub mod state;

pub use document::{Document, Tag};
pub use geo::{Bounds, Coordinate};
pub use ids::{DocumentPath, Id, IdError, MarkerId};
pub use marker::{marker_id, MarkerDescriptor, MarkerIcon, NavigationTarget};
pub use state::{MapState, Version};
