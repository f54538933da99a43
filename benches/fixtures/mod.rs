// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Deterministic corpora for the benches (no RNG).

use std::sync::Arc;

use notemap::model::{Bounds, Coordinate, Document, DocumentPath, MarkerDescriptor, Tag};
use notemap::surface::{DrawingSurface, MarkerActions, MarkerHandle};

pub const TAG_POOL: [&str; 6] = ["travel", "food", "work", "family", "hike", "wishlist"];

/// A note with two tags from the pool and `links` inline geo links.
fn note(index: usize, links: usize) -> Arc<Document> {
    let first = TAG_POOL[index % TAG_POOL.len()];
    let second = TAG_POOL[(index / TAG_POOL.len()) % TAG_POOL.len()];
    let mut content = format!(
        "---\ntags: [{first}]\nlocation: [{}, {}]\n---\n",
        lat(index),
        lon(index)
    );
    content.push_str(&format!("Note {index} #{second}\n"));
    for link in 0..links {
        content.push_str(&format!(
            "- [stop {link}](geo:{},{})\n",
            lat(index + link + 1),
            lon(index + link + 1)
        ));
    }

    let path = DocumentPath::new(format!("notes/{index:05}.md")).expect("document path");
    let tags = [first, second]
        .into_iter()
        .filter_map(Tag::parse)
        .collect::<Vec<_>>();
    Arc::new(Document::new(path, tags, content))
}

fn lat(seed: usize) -> f64 {
    ((seed * 37) % 1600) as f64 / 10.0 - 80.0
}

fn lon(seed: usize) -> f64 {
    ((seed * 53) % 3400) as f64 / 10.0 - 170.0
}

pub fn corpus(notes: usize, links: usize) -> Vec<Arc<Document>> {
    (0..notes).map(|index| note(index, links)).collect()
}

/// `count` descriptors, the first `offset` ids shifted so two calls with different offsets
/// overlap partially.
pub fn descriptors(count: usize, offset: usize) -> Vec<MarkerDescriptor> {
    (offset..offset + count)
        .map(|index| {
            let path = DocumentPath::new(format!("notes/{index:05}.md")).expect("document path");
            MarkerDescriptor::new(path, Coordinate::new(lat(index), lon(index)), Some(index))
        })
        .collect()
}

/// A surface that only hands out handles.
#[derive(Debug, Default)]
pub struct CountingSurface {
    next: u64,
    pub removed: usize,
}

impl DrawingSurface for CountingSurface {
    fn create_marker(&mut self, _: &MarkerDescriptor, _: MarkerActions) -> MarkerHandle {
        self.next += 1;
        MarkerHandle::new(self.next)
    }

    fn remove_marker(&mut self, _: MarkerHandle) {
        self.removed += 1;
    }

    fn set_view(&mut self, _: Coordinate, _: f64) {}

    fn fit_bounds(&mut self, _: Bounds) {}
}
