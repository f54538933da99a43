// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::sync::OnceLock;

use regex::Regex;

use super::front_matter::FrontMatter;
use crate::model::{Coordinate, Tag};

fn inline_tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:^|[\s(,])#([\p{L}\p{N}_/-]*[\p{L}_/-][\p{L}\p{N}_/-]*)")
            .unwrap_or_else(|err| unreachable!("inline tag regex: {err}"))
    })
}

fn geo_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\[[^\]\n]*\]\(geo:\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*\)")
            .unwrap_or_else(|err| unreachable!("geo link regex: {err}"))
    })
}

/// Tags of a note: front matter `tags:` entries followed by inline `#tag` tokens of the body.
///
/// Purely numeric tokens (`#1`) are not tags.
pub fn note_tags(content: &str) -> Vec<Tag> {
    let mut tags = Vec::new();
    let front_matter = FrontMatter::parse(content);
    let body_offset = front_matter.as_ref().map_or(0, FrontMatter::body_offset);

    if let Some(fm) = &front_matter {
        tags.extend(fm.items("tags").iter().filter_map(|item| Tag::parse(item)));
    }
    for capture in inline_tag_regex().captures_iter(&content[body_offset..]) {
        if let Some(tag) = capture.get(1).and_then(|m| Tag::parse(m.as_str())) {
            tags.push(tag);
        }
    }
    tags
}

/// An inline `[label](geo:lat,lon)` link.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLink {
    pub location: Coordinate,
    /// Byte offset of the link in the note content.
    pub offset: usize,
}

/// Every valid inline geo link in `content`, in document order.
pub fn geo_links(content: &str) -> Vec<GeoLink> {
    geo_link_regex()
        .captures_iter(content)
        .filter_map(|capture| {
            let whole = capture.get(0)?;
            let lat = capture.get(1)?.as_str().parse::<f64>().ok()?;
            let lon = capture.get(2)?.as_str().parse::<f64>().ok()?;
            Some(GeoLink {
                location: Coordinate::checked(lat, lon)?,
                offset: whole.start(),
            })
        })
        .collect()
}

/// Parses `[lat, lon]` / `"lat, lon"` front matter location values.
pub fn front_matter_location(content: &str, key: &str) -> Option<Coordinate> {
    let front_matter = FrontMatter::parse(content)?;
    let items = front_matter.items(key);
    let [lat, lon] = items.as_slice() else {
        return None;
    };
    Coordinate::checked(lat.trim().parse().ok()?, lon.trim().parse().ok()?)
}

/// 1-based line number of a byte offset.
pub fn line_of_offset(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    memchr::memchr_iter(b'\n', &content.as_bytes()[..end]).count() + 1
}
