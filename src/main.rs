//! Lantern: Timed color-vision screening
//!
//! Main entry point for the terminal application.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lantern::adapters::bank::{builtin_bank, load_bank};
use lantern::config::{AppConfig, LogMode};
use lantern::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen).
    // - interactive TTY: log to a file
    // - non-interactive: log to stdout
    let interactive = std::io::stdout().is_terminal();
    let use_file = match config.log_mode {
        LogMode::File => true,
        LogMode::Stdout => false,
        LogMode::Auto => interactive,
    };

    let (writer, _guard) = if use_file {
        if let Some(parent) = config.log_file.parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)
            .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    tracing::info!("Starting Lantern...");

    let bank = match &config.bank_path {
        Some(path) => load_bank(path)
            .with_context(|| format!("Failed to load question bank from {path:?}"))?,
        None => builtin_bank().context("Built-in question bank is corrupt")?,
    };

    let mut app = App::new(bank, config.engine)?;
    app.run()?;

    tracing::info!("Lantern shutdown complete.");
    Ok(())
}
