// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

use crate::model::MarkerIcon;

const PALETTE_ENV: &str = "NOTEMAP_TUI_PALETTE";

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MapTheme {
    land: Color,
    marker: Color,
    accent: Color,
}

impl Default for MapTheme {
    fn default() -> Self {
        Self {
            land: Color::DarkGray,
            marker: Color::LightRed,
            accent: Color::Cyan,
        }
    }
}

impl MapTheme {
    /// Reads `NOTEMAP_TUI_PALETTE` (`land,marker,accent`); unset or blank keeps the defaults.
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(PALETTE_ENV) {
            Ok(value) if value.trim().is_empty() => Ok(Self::default()),
            Ok(value) => Self::parse_csv(&value).map_err(|reason| ThemeError::InvalidEnv {
                name: PALETTE_ENV,
                value: value.trim().to_owned(),
                reason,
            }),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV,
                value: "<non-unicode>".to_owned(),
                reason: "not unicode".to_owned(),
            }),
        }
    }

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts = value.split(',').map(str::trim).collect::<Vec<_>>();
        let [land, marker, accent] = parts.as_slice() else {
            return Err(format!(
                "expected 3 comma-separated colors (land,marker,accent), got {}",
                parts.len()
            ));
        };
        Ok(Self {
            land: parse_color(land)?,
            marker: parse_color(marker)?,
            accent: parse_color(accent)?,
        })
    }

    pub(crate) fn land_color(&self) -> Color {
        self.land
    }

    /// Marker color: the icon's own color when it parses, else the theme marker color.
    pub(crate) fn marker_style(&self, icon: Option<&MarkerIcon>) -> Style {
        let color = icon
            .and_then(|icon| icon.color.as_deref())
            .and_then(|color| parse_color(color).ok())
            .unwrap_or(self.marker);
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn selection_style(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.accent)
        } else {
            Style::default()
        }
    }

    pub(crate) fn key_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn error_style(&self) -> Style {
        Style::default().fg(Color::Red)
    }
}

/// Accepts color names (`red`, `lightblue`), `#rrggbb` and ANSI indexes.
pub(crate) fn parse_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_owned());
    }
    Color::from_str(trimmed).map_err(|_| format!("invalid color: {trimmed}"))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ThemeError {
    #[error("invalid env {name}={value} ({reason})")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },
}
