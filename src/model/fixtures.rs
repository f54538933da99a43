// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use super::document::{Document, Tag};
use super::geo::Coordinate;
use super::ids::DocumentPath;
use super::marker::MarkerDescriptor;

pub(crate) fn path(value: &str) -> DocumentPath {
    DocumentPath::new(value).expect("document path")
}

pub(crate) fn tag(value: &str) -> Tag {
    Tag::parse(value).expect("tag")
}

pub(crate) fn tags(values: &[&str]) -> Vec<Tag> {
    values.iter().map(|value| tag(value)).collect()
}

pub(crate) fn doc(path_value: &str, tag_values: &[&str], content: &str) -> Arc<Document> {
    Arc::new(Document::new(path(path_value), tags(tag_values), content))
}

pub(crate) fn marker(path_value: &str, lat: f64, lon: f64) -> MarkerDescriptor {
    MarkerDescriptor::new(path(path_value), Coordinate::new(lat, lon), None)
}

pub(crate) const P1: Coordinate = Coordinate::new(38.7223, -9.1393);
pub(crate) const P2: Coordinate = Coordinate::new(41.1579, -8.6291);

/// D1 (#a at P1) and D2 (#b at P2), with front matter locations.
pub(crate) fn two_note_corpus() -> Vec<Arc<Document>> {
    vec![
        doc(
            "d1.md",
            &["#a"],
            "---\nlocation: [38.7223, -9.1393]\ntags: [a]\n---\n# Lisbon\n",
        ),
        doc(
            "d2.md",
            &["#b"],
            "---\nlocation: [41.1579, -8.6291]\ntags: [b]\n---\n# Porto\n",
        ),
    ]
}
