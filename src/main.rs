mod api;
mod board_view;
mod config;
mod dashboard;
mod kanban_board;
mod loader;
mod palette;
mod task;
mod task_details;
#[cfg(test)]
mod test_support;
mod ui;

use crate::api::{FetchError, HttpDashboardSource};
use crate::config::Config;
use crate::kanban_board::KanbanBoard;
use crate::loader::Loader;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to start async runtime: {0}")]
    Runtime(io::Error),
    #[error("failed to initialise logging: {0}")]
    Logging(String),
    #[error("failed to build http client: {0}")]
    Client(#[from] FetchError),
}

fn init_logging(path: &Path) -> Result<(), AppError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::Logging(format!("{}: {e}", path.display())))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

fn main() -> Result<(), AppError> {
    let config = Config::parse();
    init_logging(&config.log_file)?;
    info!(base_url = %config.base_url, team_lead = %config.team_lead, "starting taskboard");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;
    let source = HttpDashboardSource::new(&config.base_url, config.timeout())?;
    let (tx, rx) = mpsc::channel();
    let loader = Loader::new(
        runtime.handle().clone(),
        Arc::new(source),
        config.team_lead.clone(),
        tx,
    );

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut board = KanbanBoard::new();
    let result = ui::run_app(&mut terminal, &mut board, &loader, &rx, &config.title);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // An in-flight fetch finds the receiver gone and drops its result.
    drop(rx);
    runtime.shutdown_background();

    if let Err(err) = result {
        error!(error = %err, "board loop failed");
        eprintln!("{:?}", err);
    }
    info!("taskboard stopped");
    Ok(())
}
