// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Read-only queries over the document corpus.
//!
//! The query engine resolves a tag filter into the matching documents; `tags` holds the tag-box
//! parsing and quick-add suggestion helpers used by the controls.

pub mod tags;

use std::collections::HashSet;
use std::sync::Arc;

use rayon::prelude::*;

use crate::model::{Document, Tag};
use crate::store::{DocumentIndex, StoreError};

pub use tags::{format_tag_box, parse_tag_box, suggest_tags};

/// Corpus size above which matching runs on the rayon pool.
const PARALLEL_MATCH_THRESHOLD: usize = 2048;

/// Resolves tag filters against a [`DocumentIndex`].
#[derive(Clone)]
pub struct QueryEngine {
    index: Arc<dyn DocumentIndex>,
}

impl std::fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryEngine").finish_non_exhaustive()
    }
}

impl QueryEngine {
    pub fn new(index: Arc<dyn DocumentIndex>) -> Self {
        Self { index }
    }

    /// Documents matching any of `tags`, in corpus order. An empty filter matches everything.
    pub async fn matching_documents(
        &self,
        tags: &[Tag],
    ) -> Result<Vec<Arc<Document>>, StoreError> {
        let documents = self.index.documents().await?;
        Ok(filter_documents(documents, tags))
    }

    /// Every distinct tag in the corpus, sorted.
    pub async fn known_tags(&self) -> Result<Vec<Tag>, StoreError> {
        let documents = self.index.documents().await?;
        let mut tags = documents
            .iter()
            .flat_map(|doc| doc.tags().iter().cloned())
            .collect::<Vec<_>>();
        tags.sort();
        tags.dedup();
        Ok(tags)
    }
}

/// OR-match of `documents` against `tags`, preserving order.
pub fn filter_documents(documents: Vec<Arc<Document>>, tags: &[Tag]) -> Vec<Arc<Document>> {
    if tags.is_empty() {
        return documents;
    }

    let wanted = tags.iter().collect::<HashSet<_>>();
    let matches = |doc: &Arc<Document>| doc.tags().iter().any(|tag| wanted.contains(tag));

    if documents.len() >= PARALLEL_MATCH_THRESHOLD {
        documents.into_par_iter().filter(|doc| matches(doc)).collect()
    } else {
        documents.into_iter().filter(|doc| matches(doc)).collect()
    }
}
