//! reMem - PIN and fingerprint protected notes in the terminal
//!
//! Shows a registration screen on first run, a login screen once a PIN is
//! stored, and the notes after a successful login.

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use remem_core::services::{FileSecureStore, MemorySecureStore};
use remem_core::SecureStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use remem_tui::app::TuiConfig;
use remem_tui::App;

/// reMem - notes behind a PIN or fingerprint
#[derive(Parser)]
#[command(name = "remem")]
#[command(about = "PIN and fingerprint protected notes")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Credential store file
    #[arg(long, conflicts_with = "ephemeral")]
    store: Option<PathBuf>,

    /// Keep the PIN in memory only, forgotten on exit
    #[arg(long)]
    ephemeral: bool,

    /// Log file (defaults to the user data dir)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Use the high contrast palette
    #[arg(long)]
    high_contrast: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    init_config: bool,
}

/// Application entry point with panic handling for terminal restoration
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before the config, so problems loading it are recorded
    init_logging(cli.log_file.clone().or_else(TuiConfig::default_log_path))?;

    let mut config = match &cli.config {
        Some(path) => TuiConfig::load_from(path),
        None => TuiConfig::load(),
    };

    if cli.init_config {
        let path = match &cli.config {
            Some(path) => {
                config.save_to(path)?;
                path.clone()
            }
            None => config.save()?,
        };
        println!("Wrote {}", path.display());
        return Ok(());
    }

    if cli.high_contrast {
        config.high_contrast = true;
    }

    let store: Arc<dyn SecureStore> = if cli.ephemeral {
        tracing::info!("Using in-memory credential store");
        Arc::new(MemorySecureStore::new())
    } else {
        let path = match cli.store {
            Some(path) => path,
            None => config.store_path()?,
        };
        let store = FileSecureStore::new(path);
        tracing::info!("Using credential store {:?}", store.path());
        Arc::new(store)
    };

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut app = App::with_config(&config, store);
    let result = run_app(&mut app).await;

    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }

    result
}

/// Send logs to a file so they don't draw over the UI
fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "remem_core=info,remem_tui=info".into());

    let Some(path) = path else {
        tracing_subscriber::registry().with(filter).init();
        return Ok(());
    };

    let file = open_log_file(&path)?;
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(filter)
        .init();

    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {:?}", parent))?;
    }
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {:?}", path))
}

/// Main application runner
async fn run_app(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(|e| anyhow::anyhow!("{}", e))
}
