//! Jamboree TUI - a terminal client for troop gear and roster management.
//!
//! This application provides a fast, keyboard-driven interface over the
//! inventory backend: equipment, leaders and the scout roster.

mod app;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jamboree_core::auth::{hash_password, ScoutGate};
use jamboree_core::sync::Dispatcher;
use jamboree_core::{ApiClient, Config};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to a daily file under the cache directory; the terminal belongs to the UI.
/// The returned guard must live until exit so buffered lines are flushed.
fn init_file_tracing(cache_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(cache_dir.join("logs"), "jamboree.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(env_filter())
        .init();

    guard
}

/// Command line sub-commands log to stderr
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--hash-password") => return hash_password_command(),
        Some("--import-csv") => {
            let Some(path) = args.get(2) else {
                bail!("Usage: jamboree --import-csv <path>");
            };
            return import_csv_command(Path::new(path)).await;
        }
        Some(other) if other.starts_with("--") => bail!("Unknown option: {}", other),
        _ => {}
    }

    let cache_dir = Config::load()
        .and_then(|c| c.cache_dir())
        .unwrap_or_else(|_| PathBuf::from("./cache"));
    let _log_guard = init_file_tracing(&cache_dir);
    info!("Jamboree TUI starting");

    // Create app before touching the terminal so config errors print normally
    let mut app = App::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.refresh_all();

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Jamboree TUI shutting down");
    Ok(())
}

/// Prompt for a new scout page password, print its hash and store it in the config
fn hash_password_command() -> Result<()> {
    let password = rpassword::prompt_password("New scout page password: ")?;
    let confirm = rpassword::prompt_password("Repeat password: ")?;
    if password != confirm {
        bail!("Passwords do not match");
    }
    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let hash = hash_password(&password)?;
    println!("{}", hash);

    let path = Config::store_scout_gate_hash(hash)?;
    eprintln!("Saved to {}", path.display());
    Ok(())
}

/// Upload a scout CSV without starting the UI
async fn import_csv_command(path: &Path) -> Result<()> {
    init_stderr_tracing();

    let config = Config::load()?;
    let cache_dir = config.cache_dir()?;

    let mut gate = ScoutGate::new(config.scout_gate_hash.clone(), cache_dir);
    if let Err(e) = gate.load() {
        warn!(error = %e, "Failed to restore scout page unlock");
    }
    if !gate.is_open() {
        let password = rpassword::prompt_password("Scout page password: ")?;
        if !gate.unlock(&password)? {
            bail!("Incorrect password");
        }
    }

    let dispatcher = Dispatcher::new(ApiClient::new(&config.resolved_base_url())?);
    match dispatcher.upload_scout_csv_file(path).await {
        Ok(report) => {
            println!("{}", report.message);
            Ok(())
        }
        Err(e) => {
            eprintln!("Upload failed: {}", e);
            bail!("Import of {} failed", path.display())
        }
    }
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks();

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
