//! pagecraft - a terminal page builder
//!
//! This is the main entry point. It wires the template library component into
//! the editor shell and runs the event loop.

mod app;
mod bus;
mod components;
mod config;
mod library;
mod model;
mod services;
mod tui;

use crate::app::App;
use crate::config::EditorConfig;
use crate::library::Location;
use crate::model::Document;
use crate::tui::Tui;
use anyhow::{Context, Result};
use crossterm::event::Event;
use std::path::PathBuf;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logs go to a file; stdout belongs to the terminal UI.
    let _log_guard = setup_logging();

    let (document_path, location) = parse_args();
    let config = EditorConfig::load().unwrap_or_default();

    let document = match &document_path {
        Some(path) => Document::load(path)
            .with_context(|| format!("failed to load document {}", path.display()))?,
        None => Document::sample(),
    };

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    // Create app state
    let mut app = App::new(config, document, location);
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| app.draw(frame))?;

        // Poll for events
        if let Some(event) = tui.next_event()? {
            if let Event::Key(key) = event {
                app.handle_key_event(key)?;
            }
        }

        // Settle background fetches and drain queued dispatches
        app.tick();
    }

    Ok(())
}

/// Command line arguments: an optional document path and an optional
/// `#library` fragment that opens the template library on startup.
fn parse_args() -> (Option<PathBuf>, Location) {
    let mut document_path = None;
    let mut location = Location::default();

    for arg in std::env::args().skip(1) {
        if let Some(fragment) = arg.strip_prefix('#') {
            location.fragment = Some(fragment.to_string());
        } else {
            document_path = Some(PathBuf::from(arg));
        }
    }

    (document_path, location)
}

/// File logging under the config directory. Returns the flush guard; logging
/// is silently disabled when the directory cannot be created.
fn setup_logging() -> Option<WorkerGuard> {
    let log_dir = EditorConfig::config_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::never(log_dir, "pagecraft.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pagecraft=debug")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Some(guard)
}
