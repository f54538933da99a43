// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use serde_yaml::{Mapping, Value};

/// The YAML block between `---` fences at the start of a note.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrontMatter {
    values: Mapping,
    body_offset: usize,
}

impl FrontMatter {
    /// Splits off the `---` delimited block at the start of `content` and parses it as YAML.
    ///
    /// Returns `None` when the note has no terminated block. A block that is not a YAML mapping
    /// yields an empty front matter; the body still starts after the closing fence.
    pub fn parse(content: &str) -> Option<Self> {
        let rest = content
            .strip_prefix("---\n")
            .or_else(|| content.strip_prefix("---\r\n"))?;
        let yaml_start = content.len() - rest.len();

        let mut offset = yaml_start;
        for line in rest.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();
            if line.trim_end() != "---" {
                continue;
            }
            return Some(Self {
                values: parse_mapping(&content[yaml_start..line_start]),
                body_offset: offset,
            });
        }
        None
    }

    /// Value of `key`, matched ASCII case-insensitively.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(entry, _)| entry.as_str().is_some_and(|k| k.eq_ignore_ascii_case(key)))
            .map(|(_, value)| value)
    }

    /// The value of `key` as text items: sequence entries one by one, a scalar split on commas.
    pub fn items(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Sequence(entries)) => entries.iter().filter_map(scalar_text).collect(),
            Some(value) => scalar_text(value)
                .map(|text| {
                    text.split(',')
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Byte offset where the note body starts.
    pub fn body_offset(&self) -> usize {
        self.body_offset
    }
}

fn parse_mapping(yaml: &str) -> Mapping {
    if yaml.trim().is_empty() {
        return Mapping::new();
    }
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(values)) => values,
        Ok(_) => Mapping::new(),
        Err(err) => {
            tracing::debug!(error = %err, "ignoring malformed front matter");
            Mapping::new()
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_owned()).filter(|text| !text.is_empty()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
