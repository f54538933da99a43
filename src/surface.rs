// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Outbound interfaces of the map panel: the drawing surface, the tag filter control and host
//! navigation.
//!
//! The state machine owns one surface and one tag control and only touches them inside its
//! commit step.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use crate::model::{Bounds, Coordinate, DocumentPath, MarkerDescriptor, NavigationTarget};

/// Live on-map representation of a marker, issued by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MarkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextMenuEntry {
    OpenNote,
    ZoomHere,
    CopyCoordinates,
}

impl ContextMenuEntry {
    pub fn label(self) -> &'static str {
        match self {
            Self::OpenNote => "Open note",
            Self::ZoomHere => "Zoom to marker",
            Self::CopyCoordinates => "Copy coordinates",
        }
    }
}

/// Click and context-menu behavior wired to a marker when it is first drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerActions {
    pub on_click: NavigationTarget,
    pub context_menu: Vec<ContextMenuEntry>,
}

impl MarkerActions {
    pub fn for_marker(descriptor: &MarkerDescriptor) -> Self {
        Self {
            on_click: descriptor.navigation_target(),
            context_menu: vec![
                ContextMenuEntry::OpenNote,
                ContextMenuEntry::ZoomHere,
                ContextMenuEntry::CopyCoordinates,
            ],
        }
    }
}

/// Context-menu entries of the map background.
pub const MAP_CONTEXT_MENU: [ContextMenuEntry; 2] =
    [ContextMenuEntry::ZoomHere, ContextMenuEntry::CopyCoordinates];

/// Pan/zoom/marker primitives of the map widget.
pub trait DrawingSurface: Send {
    fn create_marker(
        &mut self,
        descriptor: &MarkerDescriptor,
        actions: MarkerActions,
    ) -> MarkerHandle;

    fn remove_marker(&mut self, handle: MarkerHandle);

    fn set_view(&mut self, center: Coordinate, zoom: f64);

    /// Moves the viewport so `bounds` is visible.
    fn fit_bounds(&mut self, bounds: Bounds);
}

/// The free-text tag field; resynchronized on every commit.
pub trait TagFilterControl: Send {
    fn set_text(&mut self, text: &str);
}

#[derive(Debug, thiserror::Error)]
pub enum NavigationError {
    #[error("{document} is not backed by a vault file")]
    NotInVault { document: DocumentPath },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("refusing to open suspicious path {}", path.display())]
    SuspiciousPath { path: PathBuf },
    #[error("failed to run editor `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("editor exited with status {status}")]
    Editor { status: ExitStatus },
    #[error("terminal suspend failed: {0}")]
    Terminal(#[source] io::Error),
}

/// Opens documents in the host application.
pub trait NavigationHost {
    fn open(&mut self, target: &NavigationTarget) -> Result<(), NavigationError>;
}
