// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use futures::future::BoxFuture;

use super::{DocumentIndex, StoreError};
use crate::format::note_tags;
use crate::model::{Document, DocumentPath};

const NOTE_EXTENSION: &str = "md";

/// A vault on disk: every `*.md` file below `root` is a document.
///
/// Hidden files and directories (leading `.`) are skipped, as are notes that cannot be read
/// (logged at `warn`). Documents are returned sorted by their vault-relative path.
#[derive(Debug, Clone)]
pub struct VaultFolder {
    root: PathBuf,
}

impl VaultFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a document in this vault.
    pub fn resolve(&self, document: &DocumentPath) -> PathBuf {
        document
            .as_str()
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    pub fn load_documents(&self) -> Result<Vec<Arc<Document>>, StoreError> {
        let mut files = Vec::new();
        collect_note_files(&self.root, &mut files)?;

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            match load_note(&self.root, &file) {
                Ok(document) => documents.push(Arc::new(document)),
                Err(err) => {
                    tracing::warn!(path = %file.display(), error = %err, "skipping note");
                }
            }
        }
        documents.sort_by(|a, b| a.path().cmp(b.path()));

        tracing::debug!(root = %self.root.display(), documents = documents.len(), "vault loaded");
        Ok(documents)
    }
}

impl DocumentIndex for VaultFolder {
    fn documents(&self) -> BoxFuture<'_, Result<Vec<Arc<Document>>, StoreError>> {
        let folder = self.clone();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || folder.load_documents())
                .await
                .map_err(|err| StoreError::Unavailable {
                    reason: format!("vault scan task failed: {err}"),
                })?
        })
    }
}

fn collect_note_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), StoreError> {
    let entries = fs::read_dir(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let file_type = entry.file_type().map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        if file_type.is_dir() {
            collect_note_files(&path, out)?;
        } else if file_type.is_file()
            && path.extension().is_some_and(|ext| ext == NOTE_EXTENSION)
        {
            out.push(path);
        }
    }
    Ok(())
}

fn load_note(root: &Path, file: &Path) -> Result<Document, StoreError> {
    let path = document_path(root, file)?;
    let content = fs::read_to_string(file).map_err(|source| StoreError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let tags = note_tags(&content);
    Ok(Document::new(path, tags, content))
}

fn document_path(root: &Path, file: &Path) -> Result<DocumentPath, StoreError> {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let segments = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>();

    DocumentPath::new(segments.join("/")).map_err(|source| StoreError::InvalidPath {
        path: file.to_path_buf(),
        source,
    })
}
