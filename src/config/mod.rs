// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Map settings and their JSON settings file.
//!
//! Settings are read once at startup and written back by "set as default". They are independent
//! of the versioned state protocol: changing defaults never bumps a map state version.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{Coordinate, MapState, MarkerIcon, Tag, Version};
use crate::store::{write_atomic, StoreError, WriteDurability};

pub const SETTINGS_FILENAME: &str = "notemap.settings.json";

/// Icon chosen for markers of documents carrying `tag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconRule {
    pub tag: Tag,
    pub glyph: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl IconRule {
    pub fn icon(&self) -> MarkerIcon {
        MarkerIcon {
            glyph: self.glyph.as_str().into(),
            color: self.color.as_deref().map(Into::into),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub default_center: Coordinate,
    pub default_zoom: f64,
    pub default_tags: Vec<Tag>,
    /// Zoom used when jumping to a single note's location.
    pub go_from_note_zoom: f64,
    /// Upper zoom bound when fitting the viewport to markers.
    pub fit_max_zoom: f64,
    pub front_matter_location_key: String,
    pub icon_rules: Vec<IconRule>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: Coordinate::new(40.44, -3.70),
            default_zoom: 2.0,
            default_tags: Vec::new(),
            go_from_note_zoom: 15.0,
            fit_max_zoom: 16.0,
            front_matter_location_key: "location".to_owned(),
            icon_rules: Vec::new(),
        }
    }
}

impl MapSettings {
    /// The configured default view as a state at `version`.
    pub fn default_state(&self, version: Version) -> MapState {
        MapState::new(
            self.default_center,
            self.default_zoom,
            self.default_tags.clone(),
            version,
        )
    }

    /// Replaces the default view with `state`'s center, zoom and tags.
    pub fn set_default_view(&mut self, state: &MapState) {
        self.default_center = state.center;
        self.default_zoom = state.zoom;
        self.default_tags = state.tags.clone();
    }

    /// Icon of the first rule whose tag the document carries.
    pub fn icon_for(&self, tags: &[Tag]) -> Option<MarkerIcon> {
        self.icon_rules
            .iter()
            .find(|rule| tags.contains(&rule.tag))
            .map(IconRule::icon)
    }
}

/// The JSON file backing [`MapSettings`].
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
    durability: WriteDurability,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            durability: WriteDurability::default(),
        }
    }

    /// Settings file at its default location inside a vault.
    pub fn in_vault(vault_root: &Path) -> Self {
        Self::new(vault_root.join(SETTINGS_FILENAME))
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads settings; a missing file yields the defaults.
    pub fn load_or_default(&self) -> Result<MapSettings, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(MapSettings::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    pub fn save(&self, settings: &MapSettings) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(settings).map_err(|source| {
            StoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes(), self.durability)?;
        tracing::info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{IconRule, MapSettings, SettingsFile};
    use crate::model::fixtures::{tag, tags};
    use crate::model::{Coordinate, MapState, Version};
    use crate::store::test_utils::TempDir;
    use crate::store::StoreError;

    #[test]
    fn missing_file_loads_defaults() {
        let tmp = TempDir::new("settings-missing");
        let file = SettingsFile::in_vault(tmp.path());
        let settings = file.load_or_default().unwrap();
        assert_eq!(settings, MapSettings::default());
        assert_eq!(settings.go_from_note_zoom, 15.0);
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new("settings-save");
        let file = SettingsFile::in_vault(tmp.path());
        let mut settings = MapSettings::default();
        settings.set_default_view(&MapState::new(
            Coordinate::new(38.7, -9.1),
            11.0,
            tags(&["#trip"]),
            Version::new(9),
        ));

        file.save(&settings).unwrap();
        assert_eq!(file.load_or_default().unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let tmp = TempDir::new("settings-partial");
        tmp.write("notemap.settings.json", r#"{ "default_zoom": 6, "default_tags": ["food"] }"#);
        let settings = SettingsFile::in_vault(tmp.path()).load_or_default().unwrap();

        assert_eq!(settings.default_zoom, 6.0);
        assert_eq!(settings.default_tags, tags(&["#food"]));
        assert_eq!(settings.fit_max_zoom, MapSettings::default().fit_max_zoom);
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let tmp = TempDir::new("settings-bad");
        tmp.write("notemap.settings.json", "{ not json");
        let err = SettingsFile::in_vault(tmp.path()).load_or_default().unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }

    #[test]
    fn default_state_uses_configured_view() {
        let settings = MapSettings {
            default_tags: tags(&["#a"]),
            ..MapSettings::default()
        };
        let state = settings.default_state(Version::new(4));
        assert_eq!(state.center, settings.default_center);
        assert_eq!(state.tags, tags(&["#a"]));
        assert_eq!(state.version, Version::new(4));
    }

    #[test]
    fn icon_comes_from_first_matching_rule() {
        let settings = MapSettings {
            icon_rules: vec![
                IconRule { tag: tag("#food"), glyph: "F".to_owned(), color: None },
                IconRule { tag: tag("#trip"), glyph: "T".to_owned(), color: Some("red".into()) },
            ],
            ..MapSettings::default()
        };
        let icon = settings.icon_for(&tags(&["#trip", "#food"])).expect("icon");
        assert_eq!(icon.glyph.as_str(), "F");
        assert!(settings.icon_for(&tags(&["#other"])).is_none());
    }
}
