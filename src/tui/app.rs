// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::surface::{lock_view, SharedMapView, TagField};
use crate::model::{Coordinate, MapState, NavigationTarget, Tag};
use crate::query::{parse_tag_box, suggest_tags};
use crate::surface::{ContextMenuEntry, MarkerHandle, MAP_CONTEXT_MENU};

const TOAST_TTL: Duration = Duration::from_secs(4);
pub(crate) const SUGGESTION_LIMIT: usize = 8;

/// Work the key handler hands to the async loop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    EditTags(String),
    AddTag(Tag),
    Reset,
    Fit,
    SetAsDefault,
    ZoomTo(Coordinate),
    /// The user moved the viewport.
    NoteViewport(Coordinate, f64),
    Open(NavigationTarget),
    Copy(String),
    LoadKnownTags,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MenuTarget {
    Marker(MarkerHandle),
    Map(Coordinate),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Mode {
    Browse,
    EditTags {
        buffer: String,
    },
    QuickAdd {
        input: String,
        known: Vec<Tag>,
        suggestions: Vec<Tag>,
        index: usize,
    },
    ContextMenu {
        target: MenuTarget,
        entries: Vec<ContextMenuEntry>,
        index: usize,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Toast {
    pub(crate) message: String,
    pub(crate) is_error: bool,
    at: Instant,
}

pub(crate) struct App {
    pub(crate) view: SharedMapView,
    pub(crate) tag_field: TagField,
    pub(crate) mode: Mode,
    pub(crate) selected: Option<MarkerHandle>,
    pub(crate) committed: Option<MapState>,
    pub(crate) in_flight: usize,
    pub(crate) toast: Option<Toast>,
    pub(crate) show_help: bool,
    pub(crate) should_quit: bool,
}

impl App {
    pub(crate) fn new(view: SharedMapView, tag_field: TagField) -> Self {
        Self {
            view,
            tag_field,
            mode: Mode::Browse,
            selected: None,
            committed: None,
            in_flight: 0,
            toast: None,
            show_help: false,
            should_quit: false,
        }
    }

    pub(crate) fn set_toast(&mut self, message: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error,
            at: Instant::now(),
        });
    }

    pub(crate) fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|toast| toast.at.elapsed() > TOAST_TTL) {
            self.toast = None;
        }
    }

    /// The selected marker's handle, if it is still drawn.
    pub(crate) fn selected_marker(&self) -> Option<MarkerHandle> {
        let handle = self.selected?;
        lock_view(&self.view).marker(handle).map(|marker| marker.handle)
    }

    /// Text shown in the tag field: the edit buffer while editing, else the control text.
    pub(crate) fn tag_box_text(&self) -> String {
        match &self.mode {
            Mode::EditTags { buffer } => buffer.clone(),
            _ => self.tag_field.text(),
        }
    }

    /// Opens the quick-add dropdown over `known` tags, skipping those already filtered on.
    pub(crate) fn open_quick_add(&mut self, known: Vec<Tag>) {
        let mut mode = Mode::QuickAdd {
            input: String::new(),
            known,
            suggestions: Vec::new(),
            index: 0,
        };
        self.refresh_suggestions(&mut mode);
        self.mode = mode;
    }

    fn refresh_suggestions(&self, mode: &mut Mode) {
        if let Mode::QuickAdd {
            input,
            known,
            suggestions,
            index,
        } = mode
        {
            let selected = parse_tag_box(&self.tag_field.text());
            *suggestions = suggest_tags(known, &selected, input, SUGGESTION_LIMIT);
            *index = 0;
        }
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        if self.show_help {
            self.show_help = false;
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Some(Command::Quit);
        }

        let mode = std::mem::replace(&mut self.mode, Mode::Browse);
        match mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::EditTags { buffer } => self.handle_edit_key(key, buffer),
            Mode::QuickAdd {
                input,
                known,
                suggestions,
                index,
            } => self.handle_quick_add_key(key, input, known, suggestions, index),
            Mode::ContextMenu {
                target,
                entries,
                index,
            } => self.handle_menu_key(key, target, entries, index),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                Some(Command::Quit)
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                None
            }
            KeyCode::Left => self.pan(-1, 0),
            KeyCode::Right => self.pan(1, 0),
            KeyCode::Up => self.pan(0, 1),
            KeyCode::Down => self.pan(0, -1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.zoom(1.0),
            KeyCode::Char('-') => self.zoom(-1.0),
            KeyCode::Char('/') => {
                self.mode = Mode::EditTags {
                    buffer: self.tag_field.text(),
                };
                None
            }
            KeyCode::Char('t') => Some(Command::LoadKnownTags),
            KeyCode::Char('r') => Some(Command::Reset),
            KeyCode::Char('f') => Some(Command::Fit),
            KeyCode::Char('d') => Some(Command::SetAsDefault),
            KeyCode::Tab => {
                self.cycle_selection(true);
                None
            }
            KeyCode::BackTab => {
                self.cycle_selection(false);
                None
            }
            KeyCode::Enter => match self.selected_target() {
                Some(target) => Some(Command::Open(target)),
                None => {
                    self.set_toast("No marker selected (Tab cycles markers)", true);
                    None
                }
            },
            KeyCode::Char('g') => match self.selected_location() {
                Some(location) => Some(Command::ZoomTo(location)),
                None => {
                    self.set_toast("No marker selected", true);
                    None
                }
            },
            KeyCode::Char('m') => {
                self.open_context_menu();
                None
            }
            KeyCode::Esc => {
                self.selected = None;
                None
            }
            _ => None,
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent, mut buffer: String) -> Option<Command> {
        match key.code {
            KeyCode::Enter => return Some(Command::EditTags(buffer)),
            KeyCode::Esc => return None,
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(ch) => buffer.push(ch),
            _ => {}
        }
        self.mode = Mode::EditTags { buffer };
        None
    }

    fn handle_quick_add_key(
        &mut self,
        key: KeyEvent,
        mut input: String,
        known: Vec<Tag>,
        suggestions: Vec<Tag>,
        index: usize,
    ) -> Option<Command> {
        match key.code {
            KeyCode::Esc => return None,
            KeyCode::Enter => {
                let chosen = suggestions.get(index).cloned().or_else(|| Tag::parse(&input));
                return chosen.map(Command::AddTag);
            }
            KeyCode::Up | KeyCode::Down => {
                let index = step_index(index, suggestions.len(), key.code == KeyCode::Down);
                self.mode = Mode::QuickAdd {
                    input,
                    known,
                    suggestions,
                    index,
                };
                return None;
            }
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(ch) => input.push(ch),
            _ => {}
        }
        let mut mode = Mode::QuickAdd {
            input,
            known,
            suggestions,
            index,
        };
        self.refresh_suggestions(&mut mode);
        self.mode = mode;
        None
    }

    fn handle_menu_key(
        &mut self,
        key: KeyEvent,
        target: MenuTarget,
        entries: Vec<ContextMenuEntry>,
        index: usize,
    ) -> Option<Command> {
        match key.code {
            KeyCode::Esc => None,
            KeyCode::Up | KeyCode::Down => {
                let index = step_index(index, entries.len(), key.code == KeyCode::Down);
                self.mode = Mode::ContextMenu {
                    target,
                    entries,
                    index,
                };
                None
            }
            KeyCode::Enter => entries
                .get(index)
                .and_then(|entry| self.menu_command(target, *entry)),
            _ => {
                self.mode = Mode::ContextMenu {
                    target,
                    entries,
                    index,
                };
                None
            }
        }
    }

    fn menu_command(&self, target: MenuTarget, entry: ContextMenuEntry) -> Option<Command> {
        match target {
            MenuTarget::Marker(handle) => {
                let view = lock_view(&self.view);
                let marker = view.marker(handle)?;
                Some(match entry {
                    ContextMenuEntry::OpenNote => Command::Open(marker.actions.on_click.clone()),
                    ContextMenuEntry::ZoomHere => Command::ZoomTo(marker.descriptor.location()),
                    ContextMenuEntry::CopyCoordinates => {
                        Command::Copy(marker.descriptor.location().to_string())
                    }
                })
            }
            MenuTarget::Map(center) => match entry {
                ContextMenuEntry::ZoomHere => Some(Command::ZoomTo(center)),
                ContextMenuEntry::CopyCoordinates => Some(Command::Copy(center.to_string())),
                ContextMenuEntry::OpenNote => None,
            },
        }
    }

    fn open_context_menu(&mut self) {
        let view = lock_view(&self.view);
        let (target, entries) = match self.selected.and_then(|handle| view.marker(handle)) {
            Some(marker) => (
                MenuTarget::Marker(marker.handle),
                marker.actions.context_menu.clone(),
            ),
            None => (MenuTarget::Map(view.center()), MAP_CONTEXT_MENU.to_vec()),
        };
        drop(view);
        self.mode = Mode::ContextMenu {
            target,
            entries,
            index: 0,
        };
    }

    fn pan(&mut self, east: i8, north: i8) -> Option<Command> {
        let mut view = lock_view(&self.view);
        view.pan(east, north);
        Some(Command::NoteViewport(view.center(), view.zoom()))
    }

    fn zoom(&mut self, delta: f64) -> Option<Command> {
        let mut view = lock_view(&self.view);
        view.zoom_by(delta);
        Some(Command::NoteViewport(view.center(), view.zoom()))
    }

    fn cycle_selection(&mut self, forward: bool) {
        let view = lock_view(&self.view);
        let handles = view
            .markers_by_id()
            .into_iter()
            .map(|marker| marker.handle)
            .collect::<Vec<_>>();
        drop(view);
        if handles.is_empty() {
            self.selected = None;
            return;
        }

        let current = self
            .selected
            .and_then(|handle| handles.iter().position(|candidate| *candidate == handle));
        let next = match current {
            Some(index) => step_index(index, handles.len(), forward),
            None if forward => 0,
            None => handles.len() - 1,
        };
        self.selected = Some(handles[next]);
    }

    fn selected_target(&self) -> Option<NavigationTarget> {
        let handle = self.selected?;
        let view = lock_view(&self.view);
        view.marker(handle).map(|marker| marker.actions.on_click.clone())
    }

    fn selected_location(&self) -> Option<Coordinate> {
        let handle = self.selected?;
        let view = lock_view(&self.view);
        view.marker(handle).map(|marker| marker.descriptor.location())
    }
}

fn step_index(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}
