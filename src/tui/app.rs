//! Main TUI application loop.
//!
//! Handles:
//! - Terminal setup/teardown
//! - Key bindings for select/load/predict/edit
//! - Draining remote events into the controller each tick

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};

use crate::adapters::HttpScoringClient;
use crate::application::LabController;
use crate::config::ClientConfig;
use crate::Result;

use super::ui::{panel::PanelEditorState, render_disclaimer, render_screen, Screen};

/// Main application state
pub struct App {
    controller: LabController<HttpScoringClient>,
    editor: PanelEditorState,
    should_quit: bool,
}

impl App {
    /// Create the application against the configured scoring service.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built from `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = HttpScoringClient::new(config)?;
        tracing::info!(api = %client.base_url(), "Scoring service configured");
        Ok(Self::with_controller(LabController::new(Arc::new(client))))
    }

    /// Create application around an existing controller.
    #[must_use]
    pub fn with_controller(controller: LabController<HttpScoringClient>) -> Self {
        Self {
            controller,
            editor: PanelEditorState::default(),
            should_quit: false,
        }
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns [`crate::LabRiskError::Io`] if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        self.controller.start();

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.drain_events();

            terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(2)])
                    .split(f.area());

                let view = self.controller.view();
                let screen = Screen {
                    view: &view,
                    directory: self.controller.directory(),
                    selected: self.controller.selected(),
                    loaded: self.controller.loaded_patient(),
                    status: self.controller.status(),
                    loading: self.controller.is_loading(),
                    scored_at: self.controller.scored_at(),
                    notice: self.controller.notice(),
                    editor: &self.editor,
                };
                render_screen(f, chunks[0], &screen);
                render_disclaimer(f, chunks[1]);
            })?;

            // Short poll keeps remote results flowing in while idle.
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn drain_events(&mut self) {
        let before = *self.controller.panel();
        if self.controller.poll() > 0 && *self.controller.panel() != before {
            // A loaded patient replaced the panel under the cursor.
            self.editor.reset();
        }
    }

    fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        if key == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // The notice blocks everything else until dismissed.
        if self.controller.notice().is_some() {
            if matches!(key, KeyCode::Esc | KeyCode::Enter) {
                self.controller.dismiss_notice();
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Left | KeyCode::Char('[') => self.controller.select_previous(),
            KeyCode::Right | KeyCode::Char(']') => self.controller.select_next(),
            KeyCode::Char('l') | KeyCode::Char('L') => {
                if !self.controller.load_patient() {
                    tracing::debug!("Load requested with no patient selected");
                }
            }
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Enter => {
                self.editor.reset();
                if !self.controller.predict() {
                    tracing::debug!("Scoring already in progress");
                }
            }
            KeyCode::Up | KeyCode::BackTab => self.editor.prev_field(),
            KeyCode::Down | KeyCode::Tab => self.editor.next_field(),
            KeyCode::Backspace => {
                self.editor.delete_char(self.controller.panel());
                self.commit_buffer();
            }
            KeyCode::Delete => {
                self.editor.clear_field();
                self.commit_buffer();
            }
            KeyCode::Char(c) => {
                if self.editor.input_char(c, self.controller.panel()) {
                    self.commit_buffer();
                }
            }
            _ => {}
        }
    }

    /// Push the edit buffer into the panel; partial input such as `-` or an
    /// empty field leaves the stored value untouched.
    fn commit_buffer(&mut self) {
        let code = self.editor.focused_code();
        let stored = self.controller.edit_value(code, self.editor.buffer());
        self.editor.rejected = !stored && !self.editor.buffer().is_empty();
    }
}
