// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Host integration of the terminal shell: opening notes in an external editor and copying to
//! the terminal clipboard.

use std::env;
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use crossterm::{execute, style::Print};

use crate::format::line_of_offset;
use crate::model::NavigationTarget;
use crate::store::VaultFolder;
use crate::surface::{NavigationError, NavigationHost};

/// Opens notes of a vault folder in `$VISUAL`/`$EDITOR`, at the marker's line when it has one.
#[derive(Debug, Clone)]
pub struct EditorHost {
    vault: Option<VaultFolder>,
    command: String,
}

impl EditorHost {
    pub fn new(vault: Option<VaultFolder>) -> Self {
        Self {
            vault,
            command: resolve_editor_command(),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }
}

impl NavigationHost for EditorHost {
    fn open(&mut self, target: &NavigationTarget) -> Result<(), NavigationError> {
        let Some(vault) = &self.vault else {
            return Err(NavigationError::NotInVault {
                document: target.document.clone(),
            });
        };
        let path = vault.resolve(&target.document);
        let line = match target.file_offset {
            Some(offset) => {
                let content = fs::read_to_string(&path).map_err(|source| {
                    NavigationError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                Some(line_of_offset(&content, offset))
            }
            None => None,
        };
        tracing::info!(document = %target.document, line, "opening note in editor");
        launch_editor(&editor_invocation(&self.command, &path, line)?)
    }
}

fn resolve_editor_command() -> String {
    env::var("VISUAL")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| env::var("EDITOR").ok().filter(|value| !value.trim().is_empty()))
        .unwrap_or_else(|| "vi".to_owned())
}

/// Shell command line opening `path`, with a `+line` argument when a line is known.
pub(crate) fn editor_invocation(
    command: &str,
    path: &Path,
    line: Option<usize>,
) -> Result<String, NavigationError> {
    let path_text = path.to_string_lossy();
    if path_text.starts_with('-') {
        return Err(NavigationError::SuspiciousPath {
            path: path.to_path_buf(),
        });
    }
    let mut invocation = command.to_owned();
    if let Some(line) = line {
        invocation.push_str(&format!(" +{line}"));
    }
    invocation.push(' ');
    invocation.push_str(&shell_single_quote(&path_text));
    Ok(invocation)
}

fn launch_editor(invocation: &str) -> Result<(), NavigationError> {
    let status = Command::new("sh")
        .arg("-lc")
        .arg(invocation)
        .status()
        .map_err(|source| NavigationError::Spawn {
            command: invocation.to_owned(),
            source,
        })?;
    if !status.success() {
        return Err(NavigationError::Editor { status });
    }
    Ok(())
}

fn shell_single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Copies `text` through the terminal (OSC 52).
pub(crate) fn copy_to_clipboard(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Print(osc52_sequence(text)))
}

pub(crate) fn osc52_sequence(text: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    format!("\x1b]52;c;{}\x1b\\", STANDARD.encode(text.as_bytes()))
}
