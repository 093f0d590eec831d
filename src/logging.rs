//! Tracing subscriber setup.
//!
//! The TUI owns the terminal, so interactive runs log only to a file (or not
//! at all). Non-interactive runs fall back to stderr.

use std::fs::{create_dir_all, OpenOptions};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingSettings;

/// Install the global subscriber. A usable `RUST_LOG` replaces the
/// configured level entirely.
pub fn init(settings: &LoggingSettings, interactive: bool) -> Result<()> {
    let level = settings
        .level
        .parse::<Level>()
        .with_context(|| format!("Invalid log level: {}", settings.level))?;
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), level);

    match &settings.file {
        Some(path) => {
            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                create_dir_all(dir)
                    .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Could not open log file {}", path.display()))?;

            fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
        None if interactive => {}
        None => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    Ok(())
}

/// `RUST_LOG` directives when set and valid, else the configured level.
fn build_filter(rust_log: Option<&str>, level: Level) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()))
}
