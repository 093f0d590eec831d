// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # status-board
//!
//! A terminal status dashboard for a two-tier (edge/origin) service.
//!
//! Each refresh cycle retrieves one JSON status document, reshapes it into
//! status indicators, a service status table, per-region response-time
//! charts and per-region summary tables, and renders them in a TUI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌───────────┐    ┌─────────┐   ┌──────────┐ │
//! │  │  app    │───▶│   data    │───▶│   ui    │──▶│ Terminal │ │
//! │  │ (state) │    │(Dashboard)│    │(ratatui)│   │          │ │
//! │  └────┬────┘    └───────────┘    └─────────┘   └──────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── HttpSource | FileSource | ChannelSource     │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation and export
//! - **[`source`]**: The [`Snapshot`] payload model and the [`DataSource`] trait,
//!   with HTTP polling, file polling and channel-based implementations
//! - **[`data`]**: Pure transforms from a snapshot to the [`Dashboard`] panels
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]** and **[`logging`]**: Layered settings and tracing setup
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll http://status.internal/output.json every 30s
//! status-board --url http://status.internal
//!
//! # Watch a local file instead
//! status-board --file output.json
//!
//! # Render once and write every container's descriptor as JSON
//! status-board --url http://status.internal --export dashboard.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use status_board::{Dashboard, Snapshot, StatusClassMap};
//!
//! let snapshot = Snapshot::parse(r#"{
//!     "edge_status": "Up",
//!     "services": [["api", "Up"], ["db", "Down"]]
//! }"#).unwrap();
//!
//! let mut dashboard = Dashboard::new();
//! dashboard.apply(&snapshot, &StatusClassMap::default());
//! assert_eq!(dashboard.services.ready().unwrap().rows().count(), 3);
//! ```
//!
//! ### With a channel source
//!
//! ```
//! use status_board::{App, ChannelSource, StatusClassMap};
//!
//! let (tx, source) = ChannelSource::create("in-process");
//! let app = App::new(Box::new(source), StatusClassMap::default());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{Dashboard, LineChart, Panel, StatusClass, StatusClassMap, SummaryTable};
pub use source::{
    ChannelSource, DataSource, FetchError, Fetcher, FileSource, HttpSource, Snapshot,
};
