// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Marker building.
//!
//! A [`MarkerBuilder`] turns matching documents into marker descriptors. The state machine treats
//! it as an opaque, possibly slow, fallible async step.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::config::MapSettings;
use crate::format::{front_matter_location, geo_links};
use crate::model::{Document, MarkerDescriptor};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("marker building failed: {reason}")]
    Failed { reason: String },
}

pub trait MarkerBuilder: Send + Sync {
    /// Markers for `documents`, in document order.
    fn build_markers<'a>(
        &'a self,
        documents: &'a [Arc<Document>],
        settings: &'a MapSettings,
    ) -> BoxFuture<'a, Result<Vec<MarkerDescriptor>, BuildError>>;
}

/// Builds markers from note text: one marker for the front matter location (if any) and one per
/// inline `[label](geo:lat,lon)` link, carrying the link's byte offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteMarkerBuilder;

impl NoteMarkerBuilder {
    pub fn markers_for(document: &Document, settings: &MapSettings) -> Vec<MarkerDescriptor> {
        let icon = settings.icon_for(document.tags());
        let mut markers = Vec::new();

        if let Some(location) =
            front_matter_location(document.content(), &settings.front_matter_location_key)
        {
            markers.push(
                MarkerDescriptor::new(document.path().clone(), location, None)
                    .with_icon(icon.clone()),
            );
        }
        for link in geo_links(document.content()) {
            markers.push(
                MarkerDescriptor::new(document.path().clone(), link.location, Some(link.offset))
                    .with_icon(icon.clone()),
            );
        }
        markers
    }
}

impl MarkerBuilder for NoteMarkerBuilder {
    fn build_markers<'a>(
        &'a self,
        documents: &'a [Arc<Document>],
        settings: &'a MapSettings,
    ) -> BoxFuture<'a, Result<Vec<MarkerDescriptor>, BuildError>> {
        Box::pin(async move {
            let mut markers = Vec::new();
            for document in documents {
                markers.extend(Self::markers_for(document, settings));
                tokio::task::yield_now().await;
            }
            Ok(markers)
        })
    }
}
