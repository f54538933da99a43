// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use smol_str::SmolStr;

use super::ids::DocumentPath;

/// A tag filter or document tag, always stored with its leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Tag(SmolStr);

impl Tag {
    /// Trims `raw` and prefixes `#` when missing. Returns `None` for blank input or a lone `#`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let body = trimmed.strip_prefix('#').unwrap_or(trimmed).trim();
        if body.is_empty() {
            return None;
        }
        let mut value = String::with_capacity(body.len() + 1);
        value.push('#');
        value.push_str(body);
        Some(Self(SmolStr::from(value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tag text without the leading `#`.
    pub fn name(&self) -> &str {
        &self.0[1..]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("tag must not be empty"))
    }
}

/// A vault note as seen by the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: DocumentPath,
    tags: Vec<Tag>,
    content: Arc<str>,
}

impl Document {
    pub fn new(path: DocumentPath, tags: Vec<Tag>, content: impl Into<Arc<str>>) -> Self {
        let mut deduped = Vec::with_capacity(tags.len());
        for tag in tags {
            if !deduped.contains(&tag) {
                deduped.push(tag);
            }
        }
        Self {
            path,
            tags: deduped,
            content: content.into(),
        }
    }

    pub fn path(&self) -> &DocumentPath {
        &self.path
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
