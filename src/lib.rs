// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Notemap: an interactive map panel for a vault of Markdown notes.
//!
//! Geolocated notes become markers on a pannable map, filtered by tag. Every view change is a
//! versioned request ([`state_machine`]); only the newest request ever reaches the screen, and
//! each commit reconciles the drawn markers against the fresh ones ([`reconcile`]) so unchanged
//! markers survive in place.

pub mod builder;
pub mod config;
pub mod format;
pub mod model;
pub mod query;
pub mod reconcile;
pub mod state_machine;
pub mod store;
pub mod surface;
pub mod tui;
