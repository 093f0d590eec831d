//! Data source abstraction for receiving status snapshots.
//!
//! This module provides a trait-based abstraction for receiving status
//! payloads from various sources (HTTP polling, local files, in-memory
//! channels).

mod channel;
pub mod fetch;
mod file;
mod http;
mod snapshot;

pub use channel::ChannelSource;
pub use fetch::{FetchError, Fetcher};
pub use file::FileSource;
pub use http::HttpSource;
pub use snapshot::{
    keys, RegionSummary, RejectedSection, Sample, ServiceStatus, Snapshot, SummaryEntry,
    Timestamp,
};

use std::fmt::Debug;

/// Trait for receiving status snapshots from various sources.
///
/// # Example
///
/// ```
/// use status_board::{DataSource, FileSource};
///
/// let mut source = FileSource::new("output.json");
/// if let Some(snapshot) = source.poll() {
///     println!("edge is {:?}", snapshot.edge_status);
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<Snapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Returns the error from the most recent refresh cycle, if it failed.
    fn error(&self) -> Option<&str>;

    /// Ask the source to run a refresh cycle as soon as possible.
    fn refresh(&mut self) {}
}
