// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Layout, canvas, footer, popup and help rendering.

use ratatui::prelude::*;
use ratatui::symbols;
use ratatui::widgets::canvas::{Canvas, Map, MapResolution};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{App, MenuTarget, Mode};
use super::surface::lock_view;
use super::theme::MapTheme;

const DEFAULT_GLYPH: &str = "●";
const FOOTER_LABEL_COLOR: Color = Color::Gray;

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App, theme: &MapTheme) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tag_box(frame, layout[0], app, theme);
    render_map(frame, layout[1], app, theme);
    frame.render_widget(Paragraph::new(status_line(app, theme)), layout[2]);
    frame.render_widget(Paragraph::new(footer_help_line(app, theme)), layout[3]);

    match &app.mode {
        Mode::QuickAdd {
            input,
            suggestions,
            index,
            ..
        } => {
            let items = suggestions
                .iter()
                .map(|tag| ListItem::new(tag.as_str().to_owned()))
                .collect::<Vec<_>>();
            render_popup(frame, layout[1], format!(" Add tag: {input} "), items, *index, theme);
        }
        Mode::ContextMenu {
            target,
            entries,
            index,
        } => {
            let title = match target {
                MenuTarget::Marker(handle) => lock_view(&app.view)
                    .marker(*handle)
                    .map(|marker| format!(" {} ", marker.descriptor.document()))
                    .unwrap_or_else(|| " Marker ".to_owned()),
                MenuTarget::Map(center) => format!(" Map at {center} "),
            };
            let items = entries
                .iter()
                .map(|entry| ListItem::new(entry.label()))
                .collect::<Vec<_>>();
            render_popup(frame, layout[1], title, items, *index, theme);
        }
        Mode::Browse | Mode::EditTags { .. } => {}
    }

    if app.show_help {
        render_help(frame, layout[1], theme);
    }
}

fn render_tag_box(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &MapTheme) {
    let editing = matches!(app.mode, Mode::EditTags { .. });
    let mut text = app.tag_box_text();
    if editing {
        text.push('▏');
    } else if text.is_empty() {
        text.push_str("(all notes)");
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Tags ")
        .border_style(theme.border_style(editing));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

fn render_map(frame: &mut Frame<'_>, area: Rect, app: &App, theme: &MapTheme) {
    let selected = app.selected_marker();
    let (bounds, points, label) = {
        let view = lock_view(&app.view);
        let points = view
            .markers_by_id()
            .into_iter()
            .map(|marker| {
                let icon = marker.descriptor.icon();
                let glyph = icon.map_or(DEFAULT_GLYPH, |icon| icon.glyph.as_str()).to_owned();
                let style = if Some(marker.handle) == selected {
                    theme.selection_style()
                } else {
                    theme.marker_style(icon)
                };
                (marker.descriptor.location(), glyph, style)
            })
            .collect::<Vec<_>>();
        let label = selected.and_then(|handle| view.marker(handle)).map(|marker| {
            (marker.descriptor.location(), format!(" {}", marker.descriptor.document()))
        });
        (view.bounds(), points, label)
    };

    let land = theme.land_color();
    let label_style = theme.key_style();
    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title(" Map "))
        .marker(symbols::Marker::Braille)
        .x_bounds([bounds.south_west.lon, bounds.north_east.lon])
        .y_bounds([bounds.south_west.lat, bounds.north_east.lat])
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: land,
                resolution: MapResolution::High,
            });
            ctx.layer();
            for (location, glyph, style) in &points {
                ctx.print(location.lon, location.lat, Span::styled(glyph.clone(), *style));
            }
            if let Some((location, text)) = &label {
                ctx.print(location.lon, location.lat, Span::styled(text.clone(), label_style));
            }
        });
    frame.render_widget(canvas, area);
}

fn render_popup(
    frame: &mut Frame<'_>,
    area: Rect,
    title: String,
    items: Vec<ListItem<'static>>,
    index: usize,
    theme: &MapTheme,
) {
    let area = centered_rect(40, 50, area);
    frame.render_widget(Clear, area);
    let empty = items.is_empty();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(theme.border_style(true)),
        )
        .highlight_style(theme.selection_style());
    let mut state = ListState::default();
    if !empty {
        state.select(Some(index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

pub(crate) fn status_line(app: &App, theme: &MapTheme) -> Line<'static> {
    let (markers, center, zoom) = {
        let view = lock_view(&app.view);
        (view.marker_count(), view.center(), view.zoom())
    };
    let version = app
        .committed
        .as_ref()
        .map_or_else(|| "-".to_owned(), |state| state.version.to_string());

    let mut text = format!(
        "{version} | {markers} markers | {:.4},{:.4} z{zoom:.0}",
        center.lat, center.lon
    );
    if app.in_flight > 0 {
        text.push_str(&format!(" | {} pending", app.in_flight));
    }

    let mut spans = vec![Span::raw(text)];
    if let Some(toast) = &app.toast {
        spans.push(Span::raw(" | "));
        let style = if toast.is_error {
            theme.error_style()
        } else {
            Style::default()
        };
        spans.push(Span::styled(toast.message.clone(), style));
    }
    Line::from(spans)
}

pub(crate) fn footer_help_line(app: &App, theme: &MapTheme) -> Line<'static> {
    let entries: &[(&str, &str)] = match app.mode {
        Mode::Browse => &[
            ("pan", "←↑↓→"),
            ("zoom", "+/-"),
            ("tags", "/"),
            ("add", "t"),
            ("reset", "r"),
            ("fit", "f"),
            ("default", "d"),
            ("marker", "Tab"),
            ("open", "⏎"),
            ("go", "g"),
            ("menu", "m"),
            ("help", "?"),
            ("quit", "q"),
        ],
        Mode::EditTags { .. } => &[("apply", "⏎"), ("cancel", "Esc")],
        Mode::QuickAdd { .. } => &[("add", "⏎"), ("move", "↑/↓"), ("cancel", "Esc")],
        Mode::ContextMenu { .. } => &[("select", "⏎"), ("move", "↑/↓"), ("close", "Esc")],
    };

    let mut spans = Vec::<Span<'static>>::new();
    for (label, key) in entries {
        push_footer_entry(&mut spans, label, key, theme);
    }
    Line::from(spans)
}

fn push_footer_entry(spans: &mut Vec<Span<'static>>, label: &str, key: &str, theme: &MapTheme) {
    let label_style = Style::default().fg(FOOTER_LABEL_COLOR);
    if !spans.is_empty() {
        spans.push(Span::styled(" | ", label_style));
    }
    spans.push(Span::styled(format!("{}:", footer_label_ucfirst(label)), label_style));
    spans.push(Span::styled(key.to_owned(), theme.key_style()));
}

fn footer_label_ucfirst(label: &str) -> String {
    let mut chars = label.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut out = first.to_uppercase().collect::<String>();
    out.push_str(chars.as_str());
    out
}

fn render_help(frame: &mut Frame<'_>, area: Rect, theme: &MapTheme) {
    let area = centered_rect(70, 80, area);
    frame.render_widget(Clear, area);

    let rows = [
        ("←↑↓→", "pan the map"),
        ("+ / -", "zoom in / out"),
        ("/", "edit the tag filter (comma separated), ⏎ applies and fits"),
        ("t", "add a tag from the vault's tags"),
        ("r", "reset to the default view"),
        ("f", "fit the view to all markers"),
        ("d", "make the current view the default"),
        ("Tab / Shift-Tab", "select next / previous marker"),
        ("⏎", "open the selected marker's note"),
        ("g", "zoom to the selected marker"),
        ("m", "context menu (marker or map)"),
        ("Esc", "clear selection / close"),
        ("q", "quit"),
    ];
    let width = rows.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    let lines = rows
        .iter()
        .map(|(key, desc)| {
            let padding = " ".repeat(width - key.chars().count());
            Line::from(vec![
                Span::styled(format!("{padding}{key}"), theme.key_style()),
                Span::raw("  "),
                Span::raw(*desc),
            ])
        })
        .collect::<Vec<_>>();

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help (any key closes) "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn centered_rect(width_percent: u16, height_percent: u16, area: Rect) -> Rect {
    let vertical_margin = 100u16.saturating_sub(height_percent) / 2;
    let horizontal_margin = 100u16.saturating_sub(width_percent) / 2;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(vertical_margin),
            Constraint::Percentage(height_percent),
            Constraint::Percentage(vertical_margin),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(horizontal_margin),
            Constraint::Percentage(width_percent),
            Constraint::Percentage(horizontal_margin),
        ])
        .split(vertical[1])[1]
}
