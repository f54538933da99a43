// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Document storage.
//!
//! The map only queries the corpus through [`DocumentIndex`]. `VaultFolder` reads a directory of
//! Markdown notes; `MemoryIndex` serves a fixed corpus (demo mode and tests).

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::{self, BoxFuture};

use crate::model::{Document, IdError};

mod atomic;
mod demo;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod vault_folder;

pub(crate) use atomic::write_atomic;
pub use demo::demo_documents;
pub use vault_folder::VaultFolder;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid document path {}: {source}", path.display())]
    InvalidPath {
        path: PathBuf,
        #[source]
        source: IdError,
    },
    #[error("refusing to write through symlink {}", path.display())]
    SymlinkRefused { path: PathBuf },
    #[error("document index unavailable: {reason}")]
    Unavailable { reason: String },
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Writes a temp file and renames it into place without fsync.
    #[default]
    Fast,
    /// Additionally fsyncs the file and its parent directory (unix).
    Durable,
}

/// Read access to the host's document corpus.
pub trait DocumentIndex: Send + Sync {
    /// Every document, in a stable order.
    fn documents(&self) -> BoxFuture<'_, Result<Vec<Arc<Document>>, StoreError>>;
}

/// A fixed corpus held in memory (demo mode and tests).
#[derive(Debug, Default, Clone)]
pub struct MemoryIndex {
    documents: Vec<Arc<Document>>,
}

impl MemoryIndex {
    pub fn new(documents: Vec<Arc<Document>>) -> Self {
        Self { documents }
    }
}

impl DocumentIndex for MemoryIndex {
    fn documents(&self) -> BoxFuture<'_, Result<Vec<Arc<Document>>, StoreError>> {
        Box::pin(future::ready(Ok(self.documents.clone())))
    }
}
