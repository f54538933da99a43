// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::cmp::Ordering;

use crate::model::Tag;

/// Parses the free-text tag field: comma separated, blank tokens dropped, duplicates removed
/// (first occurrence wins).
pub fn parse_tag_box(text: &str) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    for tag in text.split(',').filter_map(Tag::parse) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Text shown in the tag field for `tags`.
pub fn format_tag_box(tags: &[Tag]) -> String {
    tags.iter().map(Tag::as_str).collect::<Vec<_>>().join(",")
}

/// Ranks `known` tags for the quick-add dropdown against what the user typed.
///
/// Tags already in `selected` are skipped. Substring hits rank above fuzzy hits; an empty input
/// lists tags alphabetically.
pub fn suggest_tags(known: &[Tag], selected: &[Tag], input: &str, limit: usize) -> Vec<Tag> {
    let needle = input.trim().trim_start_matches('#').to_lowercase();
    let candidates = known.iter().filter(|tag| !selected.contains(tag));

    if needle.is_empty() {
        let mut all = candidates.cloned().collect::<Vec<_>>();
        all.sort();
        all.truncate(limit);
        return all;
    }

    let mut scored = candidates
        .filter_map(|tag| {
            let haystack = tag.name().to_lowercase();
            let contains = haystack.contains(&needle);
            let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());
            if !contains && ratio < 0.5 {
                return None;
            }
            Some((contains, ratio, tag))
        })
        .collect::<Vec<_>>();

    scored.sort_by(|(contains_a, ratio_a, tag_a), (contains_b, ratio_b, tag_b)| {
        contains_b
            .cmp(contains_a)
            .then_with(|| ratio_b.partial_cmp(ratio_a).unwrap_or(Ordering::Equal))
            .then_with(|| tag_a.cmp(tag_b))
    });
    scored.into_iter().take(limit).map(|(_, _, tag)| tag.clone()).collect()
}
