//! Channel-based data source.
//!
//! Receives status snapshots via a tokio watch channel. The HTTP poller
//! publishes into one of these, and library users can push snapshots
//! from their own transport the same way.

use tokio::sync::watch;

use super::{DataSource, Snapshot};

/// A data source that receives snapshots via a watch channel.
///
/// The channel carries `None` until the first snapshot arrives.
///
/// # Example
///
/// ```
/// use status_board::{ChannelSource, DataSource, Snapshot};
///
/// let (tx, mut source) = ChannelSource::create("in-memory");
/// tx.send(Some(Snapshot::default())).unwrap();
/// assert!(source.poll().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<Snapshot>>,
    description: String,
    /// Track if we've looked at the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - Where snapshots come from (e.g. a URL)
    pub fn new(receiver: watch::Receiver<Option<Snapshot>>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    pub fn create(source_description: &str) -> (watch::Sender<Option<Snapshot>>, Self) {
        let (tx, rx) = watch::channel(None);
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Snapshot> {
        // Surface a value that was already present when the source was built
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        if self.receiver.has_changed().unwrap_or(false) {
            self.receiver.borrow_and_update().clone()
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}
