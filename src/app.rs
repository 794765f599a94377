//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! Every labeling or navigation Action maps onto exactly one `Session`
//! operation; App only adds dialogs, status text and background export.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    draw_home_screen, ConfirmDialog, HelpDialog, HomeComponent, HomeRenderContext,
    OpenDatasetDialog, WelcomeComponent,
};
use crate::config::Config;
use crate::error::LoadError;
use crate::model::modal::{Modal, ModalStack};
use crate::model::ui::AppMode;
use crate::model::{Choice, LabelFile, LabelStore, Session, SessionEvent};
use crate::services::{self, ExportRunner, ExportSnapshot};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{layout::Rect, Frame};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Loaded dataset with its labels and cursor
    pub session: Option<Session>,

    /// Subscription to the current session's events
    session_events: Option<Receiver<SessionEvent>>,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Background export
    pub export_runner: ExportRunner,

    /// Persisted user settings
    pub config: Config,

    /// Holds config, labels and logs
    state_dir: PathBuf,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub welcome: WelcomeComponent,
    pub home: HomeComponent,
    pub quit_dialog: ConfirmDialog,
    pub reset_dialog: ConfirmDialog,
    pub open_dialog: OpenDatasetDialog,
    pub help_dialog: HelpDialog,
}

impl App {
    pub fn new(config: Config, state_dir: PathBuf) -> Self {
        Self {
            mode: AppMode::Welcome,
            session: None,
            session_events: None,
            modals: ModalStack::new(),
            export_runner: ExportRunner::new(),
            config,
            state_dir,
            should_quit: false,
            error: None,
            status_message: None,
            welcome: WelcomeComponent::default(),
            home: HomeComponent::new(),
            quit_dialog: ConfirmDialog::quit(),
            reset_dialog: ConfirmDialog::reset_labels(),
            open_dialog: OpenDatasetDialog,
            help_dialog: HelpDialog::default(),
        }
    }

    /// Load a dataset folder into a fresh session.
    ///
    /// On failure the current session, if any, is left exactly as it was.
    pub fn load_dataset_from(&mut self, path: &str) -> Result<usize, LoadError> {
        let dir = expand_home(path);
        let files = services::collect_dir(&dir)?;
        let dataset = services::load_dataset(files)?;

        let labels = LabelStore::open(LabelFile::in_dir(&self.state_dir));
        let mut session = Session::new(dataset, labels);
        self.session_events = Some(session.subscribe());

        let count = session.len();
        tracing::info!(
            path = %dir.display(),
            entries = count,
            assets = session.assets().len(),
            labeled = session.labeled_count(),
            "dataset loaded"
        );

        self.session = Some(session);
        self.home.reset();
        self.mode = AppMode::Labeling;

        self.config.last_dataset = Some(dir.display().to_string());
        if let Err(e) = self.config.save(&self.state_dir) {
            tracing::warn!(error = %e, "failed to remember last dataset");
        }

        Ok(count)
    }

    fn apply_choice(&mut self, choice: Choice) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = session.choose(choice) {
            tracing::error!(error = %e, choice = choice.name(), "label not persisted");
            self.error = Some(e.to_string());
        }
    }

    fn reset_labels(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = session.reset_labels() {
            tracing::error!(error = %e, "failed to clear stored labels");
            self.error = Some(e.to_string());
        }
    }

    fn start_export(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };

        if self.export_runner.is_running() {
            self.status_message = Some("An export is already running".to_string());
            return;
        }

        let snapshot = ExportSnapshot {
            entries: session.entries().to_vec(),
            labels: session.label_snapshot(),
            out_dir: self.config.export_dir(),
        };
        tracing::info!(
            labeled = snapshot.labels.len(),
            out_dir = %snapshot.out_dir.display(),
            "export started"
        );
        self.export_runner.spawn(snapshot);
        self.status_message = Some("Exporting…".to_string());
    }

    fn poll_export(&mut self) {
        let Some(outcome) = self.export_runner.poll() else {
            return;
        };

        match outcome.result {
            Ok(path) => {
                tracing::info!(
                    path = %path.display(),
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "export finished"
                );
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                tracing::warn!(error = %e, "export failed");
                self.status_message = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Log and surface everything the session published since the last tick
    fn drain_session_events(&mut self) {
        let events: Vec<SessionEvent> = match self.session_events {
            Some(ref rx) => rx.try_iter().collect(),
            None => return,
        };

        for event in events {
            match event {
                SessionEvent::Labeled { key, label } => {
                    tracing::info!(key = %key, label = label.0, "pair labeled");
                    self.status_message = Some(format!("{} → {}", key, label));
                }
                SessionEvent::Navigated { index } => {
                    tracing::debug!(index, "navigated");
                }
                SessionEvent::LabelsCleared => {
                    tracing::info!("labels cleared");
                    self.status_message = Some("All labels cleared".to_string());
                }
            }
        }
    }
}

/// `~/foo` becomes `$HOME/foo`
fn expand_home(path: &str) -> PathBuf {
    let trimmed = path.trim();
    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(trimmed)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        match self.mode {
            AppMode::Welcome => self.welcome.handle_key_event(key),
            AppMode::Labeling => self.home.handle_key_event(key),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if !self.modals.is_empty() || self.mode != AppMode::Labeling {
            return Ok(None);
        }
        self.home.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if !matches!(action, Action::Tick | Action::Resize(..)) && self.modals.is_empty() {
            self.error = None;
        }

        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                self.poll_export();
                self.drain_session_events();
            }
            Action::ForceQuit => {
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation (one Session call each)
            // ─────────────────────────────────────────────────────────────────
            Action::NextEntry => {
                if let Some(session) = self.session.as_mut() {
                    session.next();
                }
            }
            Action::PrevEntry => {
                if let Some(session) = self.session.as_mut() {
                    session.previous();
                }
            }
            Action::FirstEntry => {
                if let Some(session) = self.session.as_mut() {
                    session.first();
                }
            }
            Action::LastEntry => {
                if let Some(session) = self.session.as_mut() {
                    session.last();
                }
            }
            Action::SelectEntry(index) => {
                if let Some(session) = self.session.as_mut() {
                    session.select(index);
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Labeling
            // ─────────────────────────────────────────────────────────────────
            Action::ChooseLeft => self.apply_choice(Choice::Left),
            Action::ChooseRight => self.apply_choice(Choice::Right),
            Action::ChooseNoPreference => self.apply_choice(Choice::NoPreference),

            // ─────────────────────────────────────────────────────────────────
            // Dataset & Export
            // ─────────────────────────────────────────────────────────────────
            Action::LoadDataset(path) => match self.load_dataset_from(&path) {
                Ok(count) => {
                    if matches!(self.modals.top(), Some(Modal::OpenDataset { .. })) {
                        self.modals.pop();
                    }
                    self.error = None;
                    self.status_message = Some(format!("Loaded {} pairs", count));
                }
                Err(e) => {
                    tracing::warn!(path = %path, error = %e, "dataset load failed");
                    self.error = Some(e.to_string());
                }
            },
            Action::Export => self.start_export(),
            Action::ResetLabels => {
                if self.modals.top() == Some(&Modal::ResetConfirm) {
                    self.modals.pop();
                }
                self.reset_labels();
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenResetDialog => {
                if self.session.is_some() {
                    self.modals.push(Modal::ResetConfirm);
                }
            }
            Action::OpenDatasetDialog => {
                let input = self.config.last_dataset.clone().unwrap_or_default();
                self.modals.push(Modal::OpenDataset { input });
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
                self.error = None;
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match (self.mode, self.session.as_ref()) {
            (AppMode::Labeling, Some(session)) => {
                let ctx = HomeRenderContext {
                    session,
                    display_tags: &self.config.display_tags,
                    error: self.error.as_deref(),
                    status_message: self.status_message.as_deref(),
                    exporting: self.export_runner.is_running(),
                };
                draw_home_screen(frame, area, &mut self.home, &ctx)?;
            }
            _ => {
                self.welcome.error = if self.modals.is_empty() {
                    self.error.clone()
                } else {
                    None
                };
                self.welcome.draw(frame, area)?;
            }
        }

        // Draw modal overlay if active
        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::ResetConfirm => self.reset_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
            Modal::OpenDataset { input } => {
                let action = match key.code {
                    KeyCode::Esc => Some(Action::CloseModal),
                    KeyCode::Enter if !input.trim().is_empty() => {
                        Some(Action::LoadDataset(input.clone()))
                    }
                    KeyCode::Backspace => {
                        if let Some(Modal::OpenDataset { input }) = self.modals.top_mut() {
                            input.pop();
                        }
                        None
                    }
                    KeyCode::Char(c) => {
                        if let Some(Modal::OpenDataset { input }) = self.modals.top_mut() {
                            input.push(c);
                        }
                        None
                    }
                    _ => None,
                };
                Ok(action)
            }
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area)?,
            Modal::ResetConfirm => self.reset_dialog.draw(frame, area)?,
            Modal::Help => self.help_dialog.draw(frame, area)?,
            Modal::OpenDataset { input } => {
                self.open_dialog
                    .draw_with_input(frame, area, input, self.error.as_deref())?;
            }
        }
        Ok(())
    }
}
