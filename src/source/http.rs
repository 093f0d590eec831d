//! HTTP polling data source.
//!
//! A background task fetches the status document on a fixed interval and
//! publishes each decoded snapshot through a [`ChannelSource`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::{ChannelSource, DataSource, Fetcher, Snapshot};

/// A data source that polls an HTTP endpoint for snapshots.
///
/// Each refresh cycle is awaited to completion before the next one starts,
/// so cycles never overlap. With no refresh interval the source fetches
/// exactly once, plus once per [`DataSource::refresh`] request.
#[derive(Debug)]
pub struct HttpSource {
    channel: ChannelSource,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    error_view: Option<String>,
    wake: Arc<Notify>,
    task: JoinHandle<()>,
}

impl HttpSource {
    /// Spawn the polling task. Must be called from within a tokio runtime.
    pub fn spawn(fetcher: Fetcher, refresh: Option<Duration>) -> Self {
        let description = format!("http: {}", fetcher.url());
        let (tx, channel) = ChannelSource::create(fetcher.url());
        let last_error = Arc::new(Mutex::new(None));
        let wake = Arc::new(Notify::new());

        let task = tokio::spawn(poll_loop(
            fetcher,
            refresh,
            tx,
            last_error.clone(),
            wake.clone(),
        ));

        Self {
            channel,
            description,
            last_error,
            error_view: None,
            wake,
            task,
        }
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<Snapshot> {
        let snapshot = self.channel.poll();
        // Copy out so error() can hand back a borrow without holding the lock
        self.error_view = self.last_error.lock().clone();
        snapshot
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.error_view.as_deref()
    }

    fn refresh(&mut self) {
        self.wake.notify_one();
    }
}

impl Drop for HttpSource {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn poll_loop(
    fetcher: Fetcher,
    refresh: Option<Duration>,
    tx: watch::Sender<Option<Snapshot>>,
    last_error: Arc<Mutex<Option<String>>>,
    wake: Arc<Notify>,
) {
    let mut ticker = refresh.map(|period| {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    });

    loop {
        match fetcher.fetch().await {
            Ok(snapshot) => {
                *last_error.lock() = None;
                if tx.send(Some(snapshot)).is_err() {
                    // Receiver dropped
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(url = %fetcher.url(), error = %e, "refresh cycle failed");
                *last_error.lock() = Some(e.to_string());
            }
        }

        match ticker.as_mut() {
            Some(ticker) => tokio::select! {
                _ = ticker.tick() => {}
                _ = wake.notified() => {}
                _ = tx.closed() => break,
            },
            None => tokio::select! {
                _ = wake.notified() => {}
                _ = tx.closed() => break,
            },
        }
    }

    tracing::debug!(url = %fetcher.url(), "polling task stopped");
}
