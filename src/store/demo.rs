// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::Arc;

use crate::format::note_tags;
use crate::model::{Document, DocumentPath};

const DEMO_NOTES: &[(&str, &str)] = &[
    (
        "trips/lisbon.md",
        "---\nlocation: [38.7223, -9.1393]\ntags: [travel]\n---\n# Lisbon\n\n\
         Tram 28 up to the castle. Dinner at [Cervejaria](geo:38.7205,-9.1433). #food\n",
    ),
    (
        "trips/porto.md",
        "---\nlocation: [41.1579, -8.6291]\ntags: [travel]\n---\n# Porto\n\n\
         Crossed the [Dom Luis bridge](geo:41.1400,-8.6094) at sunset.\n",
    ),
    (
        "trips/madrid.md",
        "---\nlocation: \"40.4168, -3.7038\"\ntags: [travel, work]\n---\n# Madrid\n\n\
         Conference week. Lunch near [Retiro](geo:40.4153,-3.6845). #food\n",
    ),
    (
        "food/sevilla-tapas.md",
        "# Tapas in Sevilla\n\n#food #wishlist\n\n\
         - [El Rinconcillo](geo:37.3931,-5.9898)\n- [Bodega Santa Cruz](geo:37.3860,-5.9907)\n",
    ),
    (
        "work/office.md",
        "---\nlocation: [52.5200, 13.4050]\ntags: [work]\n---\n# Berlin office\n",
    ),
    ("inbox.md", "# Inbox\n\nNo location here. #todo\n"),
];

/// A small built-in corpus for `--demo`.
pub fn demo_documents() -> Vec<Arc<Document>> {
    DEMO_NOTES
        .iter()
        .filter_map(|(path, content)| {
            let path = DocumentPath::new(*path).ok()?;
            Some(Arc::new(Document::new(path, note_tags(content), *content)))
        })
        .collect()
}
