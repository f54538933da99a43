// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Note text formats.
//!
//! Front matter and inline syntax (tags, `geo:` links) read by the vault store and the default
//! marker builder.

pub mod front_matter;
pub mod note;

pub use front_matter::FrontMatter;
pub use note::{front_matter_location, geo_links, line_of_offset, note_tags, GeoLink};
