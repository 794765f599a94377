//! pairpick - A terminal UI for pairwise caption preference labeling
//!
//! This is the main entry point. It uses the Component Architecture pattern
//! from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::Tui;
use anyhow::{anyhow, Result};
use clap::Parser;
use crossterm::event::Event;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "pairpick=info";

#[derive(Parser, Debug)]
#[command(name = "pairpick")]
#[command(about = "Label which of two captions better describes an image pair", long_about = None)]
#[command(version)]
struct Cli {
    /// Dataset folder to open (defaults to the last one used)
    #[arg(value_name = "DATASET_DIR")]
    dataset: Option<PathBuf>,

    /// Directory for config, stored labels and logs
    #[arg(long = "state-dir", value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Directory export archives are written to (remembered)
    #[arg(long = "export-dir", value_name = "DIR")]
    export_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let state_dir = cli
        .state_dir
        .or_else(Config::default_state_dir)
        .ok_or_else(|| anyhow!("cannot locate a home directory; pass --state-dir"))?;

    // Logs go to a file only; stdout belongs to the terminal UI
    let _log_guard = init_logging(&state_dir);

    let mut config = Config::load(&state_dir).unwrap_or_default();
    if let Some(export_dir) = cli.export_dir {
        config.export_dir = Some(export_dir.display().to_string());
    }

    let initial_dataset = cli
        .dataset
        .map(|p| p.display().to_string())
        .or_else(|| config.last_dataset.clone());

    tracing::info!(
        state_dir = %state_dir.display(),
        dataset = ?initial_dataset,
        "starting pairpick"
    );

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Create app state
    let mut app = App::new(config, state_dir);
    app.init()?;
    if let Some(path) = initial_dataset {
        app.update(Action::LoadDataset(path))?;
    }

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exiting after error");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("bye");
    Ok(())
}

/// Daily rolling log file under `<state dir>/logs`, filtered by `RUST_LOG`
fn init_logging(state_dir: &Path) -> Option<WorkerGuard> {
    let log_dir = state_dir.join("logs");
    if let Err(err) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: failed to create logs directory: {}", err);
        return None;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let file_appender = tracing_appender::rolling::daily(log_dir, "pairpick.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_filter(env_filter);

    if let Err(err) = tracing_subscriber::registry().with(file_layer).try_init() {
        eprintln!("Warning: failed to initialise logging: {}", err);
    }

    Some(guard)
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Mouse(mouse) => app.handle_mouse_event(mouse)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            if let Some(action) = action {
                tracing::trace!(%action, "action");
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
