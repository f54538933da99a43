// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use smol_str::SmolStr;

use super::geo::Coordinate;
use super::ids::{DocumentPath, MarkerId};

/// Presentation hint for a marker (a single glyph plus an optional color name).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerIcon {
    pub glyph: SmolStr,
    pub color: Option<SmolStr>,
}

impl MarkerIcon {
    pub fn new(glyph: impl Into<SmolStr>) -> Self {
        Self {
            glyph: glyph.into(),
            color: None,
        }
    }
}

/// Where to take the user when a marker is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub document: DocumentPath,
    pub file_offset: Option<usize>,
}

/// Derives the identity of a marker from its owning document and location.
///
/// The id is `"{path}@{lat},{lon}"`, with `#{offset}` appended for inline locations. Floats use
/// the shortest round-trip formatting, so the same location always yields the same id.
pub fn marker_id(
    document: &DocumentPath,
    location: Coordinate,
    file_offset: Option<usize>,
) -> MarkerId {
    let mut value = format!("{document}@{},{}", location.lat, location.lon);
    if let Some(offset) = file_offset {
        value.push('#');
        value.push_str(&offset.to_string());
    }
    // A valid document path is non-empty and single-line, so the derived value is too.
    MarkerId::new(value).unwrap_or_else(|_| unreachable!("derived marker id is always valid"))
}

/// One plotted point, as produced by a marker builder.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDescriptor {
    id: MarkerId,
    location: Coordinate,
    document: DocumentPath,
    file_offset: Option<usize>,
    icon: Option<MarkerIcon>,
}

impl MarkerDescriptor {
    pub fn new(document: DocumentPath, location: Coordinate, file_offset: Option<usize>) -> Self {
        Self {
            id: marker_id(&document, location, file_offset),
            location,
            document,
            file_offset,
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Option<MarkerIcon>) -> Self {
        self.icon = icon;
        self
    }

    pub fn id(&self) -> &MarkerId {
        &self.id
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn document(&self) -> &DocumentPath {
        &self.document
    }

    pub fn file_offset(&self) -> Option<usize> {
        self.file_offset
    }

    pub fn icon(&self) -> Option<&MarkerIcon> {
        self.icon.as_ref()
    }

    pub fn navigation_target(&self) -> NavigationTarget {
        NavigationTarget {
            document: self.document.clone(),
            file_offset: self.file_offset,
        }
    }
}
