// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Notemap-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Notemap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! A ratatui + crossterm shell around [`MapStateMachine`]: a world map canvas drawn through
//! [`TerminalSurface`], a tag field, a quick-add dropdown and marker context menus. Key handling
//! is synchronous and produces [`app::Command`]s; state requests run as tasks on the tokio
//! runtime so the UI keeps drawing while they are in flight.

use std::error::Error;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use crate::builder::MarkerBuilder;
use crate::config::{MapSettings, SettingsFile};
use crate::state_machine::{CommitOutcome, MapError, MapStateMachine};
use crate::store::DocumentIndex;
use crate::surface::{NavigationError, NavigationHost};

mod app;
mod chrome;
mod host;
pub mod surface;
mod theme;

pub use host::EditorHost;
pub use surface::{MapView, SharedMapView, TagField, TerminalSurface};

use app::{App, Command};
use theme::MapTheme;

const FRAME_INTERVAL: Duration = Duration::from_millis(30);

pub type TerminalMap = MapStateMachine<TerminalSurface, TagField>;

/// Outcome of a background request, reported back to the UI loop.
#[derive(Debug)]
struct Notice {
    message: String,
    is_error: bool,
}

impl Notice {
    fn from_request(label: &str, result: Result<CommitOutcome, MapError>) -> Self {
        match result {
            Ok(CommitOutcome::Committed(report)) => Self {
                message: format!(
                    "{label}: {} (+{} ={} -{})",
                    report.version, report.added, report.kept, report.removed
                ),
                is_error: false,
            },
            Ok(CommitOutcome::Superseded {
                candidate,
                committed,
            }) => Self {
                message: format!("{label}: {candidate} superseded by {committed}"),
                is_error: false,
            },
            Err(err) => Self {
                message: format!("{label} failed: {err}"),
                is_error: true,
            },
        }
    }
}

/// Everything the shell needs besides the corpus.
pub struct ShellOptions {
    pub settings: MapSettings,
    /// Where "set as default" persists settings; `None` keeps them in memory only.
    pub settings_file: Option<SettingsFile>,
    pub host: EditorHost,
    /// Tag box text applied right after the initial default view.
    pub initial_tags: Option<String>,
}

/// The map panel wired to a terminal.
pub struct MapShell {
    machine: Arc<TerminalMap>,
    app: App,
    settings_file: Option<SettingsFile>,
    host: EditorHost,
    theme: MapTheme,
    notices: mpsc::UnboundedSender<Notice>,
    inbox: mpsc::UnboundedReceiver<Notice>,
}

impl MapShell {
    pub fn new(
        index: Arc<dyn DocumentIndex>,
        builder: Arc<dyn MarkerBuilder>,
        options: ShellOptions,
    ) -> Result<Self, Box<dyn Error>> {
        let theme = MapTheme::from_env()?;
        let settings = options.settings;
        let view: SharedMapView = Arc::new(Mutex::new(MapView::new(
            settings.default_center,
            settings.default_zoom,
            settings.fit_max_zoom,
        )));
        let tag_field = TagField::default();
        let machine = MapStateMachine::new(
            index,
            builder,
            settings,
            TerminalSurface::new(Arc::clone(&view)),
            tag_field.clone(),
        );
        let (notices, inbox) = mpsc::unbounded_channel();

        let mut shell = Self {
            machine: Arc::new(machine),
            app: App::new(view, tag_field),
            settings_file: options.settings_file,
            host: options.host,
            theme,
            notices,
            inbox,
        };
        shell.spawn_initial(options.initial_tags);
        Ok(shell)
    }

    pub fn machine(&self) -> &Arc<TerminalMap> {
        &self.machine
    }

    fn spawn_initial(&mut self, initial_tags: Option<String>) {
        self.app.in_flight += 1;
        let machine = Arc::clone(&self.machine);
        let notices = self.notices.clone();
        tokio::spawn(async move {
            let result = machine.show_initial().await;
            let notice = match initial_tags {
                Some(text) if result.is_ok() => {
                    Notice::from_request("tags", machine.edit_tag_box(&text, true).await)
                }
                _ => Notice::from_request("initial view", result),
            };
            let _ = notices.send(notice);
        });
    }

    /// Runs the UI until the user quits.
    pub async fn run(mut self) -> Result<(), Box<dyn Error>> {
        let mut terminal = TerminalSession::new()?;

        while !self.app.should_quit {
            while let Ok(notice) = self.inbox.try_recv() {
                self.app.in_flight = self.app.in_flight.saturating_sub(1);
                self.app.set_toast(notice.message, notice.is_error);
            }
            self.app.expire_toast();
            self.app.committed = Some(self.machine.committed().await);

            let (app, theme) = (&self.app, &self.theme);
            terminal.draw(|frame| chrome::draw(frame, app, theme))?;

            if !event::poll(Duration::ZERO)? {
                tokio::time::sleep(FRAME_INTERVAL).await;
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(command) = self.app.handle_key(key) {
                    self.execute(command, &mut terminal).await;
                }
            }
        }

        Ok(())
    }

    async fn execute(&mut self, command: Command, terminal: &mut TerminalSession) {
        match command {
            Command::EditTags(text) => {
                self.spawn_request("tags", move |machine| async move {
                    machine.edit_tag_box(&text, true).await
                });
            }
            Command::AddTag(tag) => {
                self.spawn_request("add tag", move |machine| async move {
                    machine.add_tag(tag).await
                });
            }
            Command::Reset => {
                self.spawn_request("reset", |machine| async move {
                    machine.reset_to_default().await
                });
            }
            Command::ZoomTo(location) => {
                self.spawn_request("zoom", move |machine| async move {
                    machine.zoom_to_location(location).await
                });
            }
            Command::Fit => {
                if self.machine.fit_to_markers().await.is_none() {
                    self.app.set_toast("No markers to fit", false);
                } else {
                    let view = self.machine.view_state().await;
                    tracing::debug!(center = %view.center, zoom = view.zoom, "fitted to markers");
                }
            }
            Command::NoteViewport(center, zoom) => {
                self.machine.note_viewport(center, zoom).await;
            }
            Command::SetAsDefault => self.set_as_default().await,
            Command::LoadKnownTags => match self.machine.query().known_tags().await {
                Ok(known) => self.app.open_quick_add(known),
                Err(err) => self.app.set_toast(format!("Loading tags failed: {err}"), true),
            },
            Command::Open(target) => {
                let host = &mut self.host;
                if let Err(err) = terminal.run_external_action(|| host.open(&target)) {
                    tracing::warn!(document = %target.document, error = %err, "open failed");
                    self.app.set_toast(format!("Open failed: {err}"), true);
                }
            }
            Command::Copy(text) => match host::copy_to_clipboard(&text) {
                Ok(()) => self.app.set_toast(format!("Copied {text}"), false),
                Err(err) => self.app.set_toast(format!("Clipboard error: {err}"), true),
            },
            Command::Quit => {}
        }
    }

    fn spawn_request<F, Fut>(&mut self, label: &'static str, request: F)
    where
        F: FnOnce(Arc<TerminalMap>) -> Fut,
        Fut: std::future::Future<Output = Result<CommitOutcome, MapError>> + Send + 'static,
    {
        self.app.in_flight += 1;
        let future = request(Arc::clone(&self.machine));
        let notices = self.notices.clone();
        tokio::spawn(async move {
            let _ = notices.send(Notice::from_request(label, future.await));
        });
    }

    async fn set_as_default(&mut self) {
        let settings = self.machine.set_as_default().await;
        let Some(file) = &self.settings_file else {
            self.app.set_toast("Default view updated (not persisted)", false);
            return;
        };
        match file.save(&settings) {
            Ok(()) => {
                let message = format!("Default view saved to {}", file.path().display());
                self.app.set_toast(message, false);
            }
            Err(err) => {
                tracing::warn!(error = %err, "saving settings failed");
                self.app.set_toast(format!("Saving settings failed: {err}"), true);
            }
        }
    }
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }

    /// Leaves the alternate screen while `action` runs (an external editor, typically).
    fn run_external_action(
        &mut self,
        action: impl FnOnce() -> Result<(), NavigationError>,
    ) -> Result<(), NavigationError> {
        let _suspend =
            TerminalSuspendGuard::new(&mut self.terminal).map_err(NavigationError::Terminal)?;
        action()
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

struct TerminalSuspendGuard<'a> {
    terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>,
}

impl<'a> TerminalSuspendGuard<'a> {
    fn new(terminal: &'a mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<Self> {
        terminal.show_cursor()?;
        disable_raw_mode()?;

        if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
            let _ = enable_raw_mode();
            let _ = execute!(terminal.backend_mut(), EnterAlternateScreen);
            let _ = terminal.hide_cursor();
            return Err(err);
        }
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSuspendGuard<'_> {
    fn drop(&mut self) {
        let _ = enable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), EnterAlternateScreen);
        let _ = self.terminal.clear();
        let _ = self.terminal.hide_cursor();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}
