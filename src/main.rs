// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

mod app;
mod config;
mod data;
mod events;
mod logging;
mod source;
mod ui;

use app::App;
use config::Settings;
use data::{Dashboard, StatusClassMap};
use source::{DataSource, Fetcher, FileSource, HttpSource, Snapshot};

/// How often the UI checks the background fetch task for new results.
const CHANNEL_POLL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "status-board")]
#[command(about = "Terminal status dashboard for edge/origin health and response times")]
struct Args {
    /// Base URL serving the status document (fetches <url>/output.json)
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Read the status document from a local file instead of HTTP
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Refresh interval (e.g., "30s", "500ms"); "0s" fetches once
    #[arg(short, long)]
    refresh: Option<String>,

    /// Request timeout (e.g., "10s"); "0s" waits indefinitely
    #[arg(long)]
    timeout: Option<String>,

    /// Settings file (TOML); defaults to ./status-board.toml if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render once, export every container as JSON to this file, and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Layer command-line flags over the loaded settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(ref url) = self.url {
            settings.source.url = url.clone();
            settings.source.file = None;
        }
        if let Some(ref file) = self.file {
            settings.source.file = Some(file.clone());
        }
        if let Some(ref refresh) = self.refresh {
            settings.refresh = refresh.clone();
        }
        if let Some(ref timeout) = self.timeout {
            settings.timeout = timeout.clone();
        }
        if let Some(ref log_file) = self.log_file {
            settings.logging.file = Some(log_file.clone());
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    args.apply(&mut settings);

    logging::init(&settings.logging, args.export.is_none())?;

    let class_map = settings.class_map()?;
    let refresh = settings.refresh_interval()?;
    let timeout = settings.request_timeout()?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&settings, timeout, &class_map, export_path);
    }

    match settings.source.file {
        Some(ref path) => run_with_file(path, class_map, refresh),
        None => run_with_http(&settings, class_map, refresh, timeout),
    }
}

/// Run with a file-based data source, re-checking the file every refresh
/// interval.
fn run_with_file(
    path: &Path,
    class_map: StatusClassMap,
    refresh: Option<Duration>,
) -> Result<()> {
    tracing::info!(path = %path.display(), "watching status file");
    let source = Box::new(FileSource::new(path));
    run_tui(source, class_map, refresh, refresh)
}

/// Run with an HTTP polling source on a background runtime.
fn run_with_http(
    settings: &Settings,
    class_map: StatusClassMap,
    refresh: Option<Duration>,
    timeout: Option<Duration>,
) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let fetcher = Fetcher::new(&settings.source.url, &settings.source.resource, timeout)?;
    tracing::info!(url = %fetcher.url(), ?refresh, "polling status endpoint");

    let source = {
        let _guard = rt.enter();
        HttpSource::spawn(fetcher, refresh)
    };

    // The fetch task runs on the runtime; the UI only drains its channel
    run_tui(Box::new(source), class_map, refresh, Some(CHANNEL_POLL))
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    class_map: StatusClassMap,
    refresh: Option<Duration>,
    poll_interval: Option<Duration>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, class_map).with_refresh_interval(refresh);
    app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, poll_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poll_interval: Option<Duration>,
) -> Result<()> {
    let mut last_poll = Instant::now();

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        let due = poll_interval.is_some_and(|interval| last_poll.elapsed() >= interval);
        if due || app.refresh_requested {
            app.reload_data();
            last_poll = Instant::now();
        }
    }

    Ok(())
}

/// Fetch once, render, and write every container's descriptor to a file.
fn export_to_file(
    settings: &Settings,
    timeout: Option<Duration>,
    class_map: &StatusClassMap,
    export_path: &Path,
) -> Result<()> {
    let snapshot = match settings.source.file {
        Some(ref path) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
            Snapshot::from_slice(&bytes)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => {
            let rt = tokio::runtime::Runtime::new()?;
            let fetcher = Fetcher::new(&settings.source.url, &settings.source.resource, timeout)?;
            rt.block_on(fetcher.fetch())
                .with_context(|| format!("Failed to fetch {}", fetcher.url()))?
        }
    };

    let mut dashboard = Dashboard::new();
    dashboard.apply(&snapshot, class_map);

    let json = serde_json::to_string_pretty(&dashboard.to_json()?)?;
    let mut file = std::fs::File::create(export_path)?;
    file.write_all(json.as_bytes())?;

    println!("Exported dashboard to: {}", export_path.display());
    Ok(())
}
