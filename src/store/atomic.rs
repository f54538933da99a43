// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use super::{StoreError, WriteDurability};

static STAGING_COUNTER: AtomicU32 = AtomicU32::new(0);

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

/// A staged sibling file, removed on drop unless it was renamed into place.
struct Staged {
    path: PathBuf,
    committed: bool,
}

impl Drop for Staged {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Replaces `path` with `contents` by staging a sibling file and renaming it over the target.
///
/// Symlinked targets are refused. `Durable` also syncs the staged file and, on unix, the parent
/// directory after the rename.
pub(crate) fn write_atomic(
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Err(err) if err.kind() != io::ErrorKind::NotFound => return Err(io_at(path)(err)),
        _ => {}
    }

    let Some(file_name) = path.file_name() else {
        return Err(io_at(path)(io::Error::other("path has no file name")));
    };
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(io_at(parent))?;

    let mut staged = Staged {
        path: parent.join(format!(
            ".{}.notemap-{}-{}",
            file_name.to_string_lossy(),
            std::process::id(),
            STAGING_COUNTER.fetch_add(1, Ordering::Relaxed)
        )),
        committed: false,
    };

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&staged.path)
        .map_err(io_at(&staged.path))?;
    file.write_all(contents).map_err(io_at(&staged.path))?;
    if durability == WriteDurability::Durable {
        file.sync_all().map_err(io_at(&staged.path))?;
    }
    drop(file);

    replace(&staged.path, path).map_err(io_at(path))?;
    staged.committed = true;

    #[cfg(unix)]
    if durability == WriteDurability::Durable {
        fs::File::open(parent)
            .and_then(|dir| dir.sync_all())
            .map_err(io_at(parent))?;
    }

    Ok(())
}

#[cfg(windows)]
fn replace(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to).or_else(|err| match err.kind() {
        io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied => {
            let _ = fs::remove_file(to);
            fs::rename(from, to)
        }
        _ => Err(err),
    })
}

#[cfg(not(windows))]
fn replace(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}
