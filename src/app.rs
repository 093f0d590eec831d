//! Application state and navigation logic.

use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};

use crate::data::{Dashboard, Side, StatusClassMap};
use crate::source::DataSource;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Edge and origin indicators plus the service status table.
    Overview,
    /// Edge response-time chart and per-region summary.
    Edge,
    /// Origin response-time chart and per-region summary.
    Origin,
}

impl View {
    pub const ALL: [View; 3] = [View::Overview, View::Edge, View::Origin];

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Edge,
            View::Edge => View::Origin,
            View::Origin => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Origin,
            View::Edge => View::Overview,
            View::Origin => View::Edge,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Edge => "Edge",
            View::Origin => "Origin",
        }
    }

    /// The side a latency view shows.
    pub fn side(&self) -> Option<Side> {
        match self {
            View::Overview => None,
            View::Edge => Some(Side::Edge),
            View::Origin => Some(Side::Origin),
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub dashboard: Dashboard,
    pub class_map: StatusClassMap,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,
    /// Shown in the status bar; `None` when the source fetches once.
    pub refresh_interval: Option<Duration>,
    /// Set by a manual refresh until the next poll of the source.
    pub refresh_requested: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App, detecting the theme from the terminal background.
    pub fn new(source: Box<dyn DataSource>, class_map: StatusClassMap) -> Self {
        Self::with_theme(source, class_map, Theme::auto_detect())
    }

    pub fn with_theme(
        source: Box<dyn DataSource>,
        class_map: StatusClassMap,
        theme: Theme,
    ) -> Self {
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            source,
            dashboard: Dashboard::new(),
            class_map,
            load_error: None,
            last_updated: None,
            refresh_interval: None,
            refresh_requested: false,
            theme,
            status_message: None,
        }
    }

    pub fn with_refresh_interval(mut self, interval: Option<Duration>) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source and apply whatever it produced.
    ///
    /// Returns true if a new snapshot was rendered. A reported source error
    /// marks the dashboard stale without clearing it.
    pub fn reload_data(&mut self) -> bool {
        self.refresh_requested = false;
        let updated = match self.source.poll() {
            Some(snapshot) => {
                self.dashboard.apply(&snapshot, &self.class_map);
                self.last_updated = Some(Instant::now());
                true
            }
            None => false,
        };

        match self.source.error() {
            Some(err) => {
                if self.load_error.as_deref() != Some(err) {
                    let source = self.source.description();
                    tracing::warn!(%source, error = %err, "refresh failed");
                }
                self.dashboard.mark_stale(err);
                self.load_error = Some(err.to_string());
            }
            None => self.load_error = None,
        }

        updated
    }

    /// Ask the source for an immediate refresh cycle.
    pub fn request_refresh(&mut self) {
        self.source.refresh();
        self.refresh_requested = true;
        self.set_status_message("Refreshing...".to_string());
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export every container's descriptor to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        if self.dashboard.is_blank() {
            bail!("No data to export");
        }

        let json = serde_json::to_string_pretty(&self.dashboard.to_json()?)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
