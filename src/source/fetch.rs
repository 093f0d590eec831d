//! HTTP retrieval of the status document.
//!
//! One call to [`Fetcher::fetch`] issues exactly one `GET` for
//! `<base>/output.json` and decodes the body. There is no retry.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;

use super::Snapshot;

/// Resource fetched relative to the base URL when none is configured.
pub const DEFAULT_RESOURCE: &str = "output.json";

/// Errors that can occur while retrieving a snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Could not reach the server.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// Any other transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server answered with a non-success status code.
    #[error("Server returned status {0}")]
    Status(u16),

    /// The body was not a JSON object.
    #[error("Failed to parse snapshot: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else {
            FetchError::Http(err.to_string())
        }
    }
}

/// Retrieves status snapshots over HTTP.
///
/// ```no_run
/// use std::time::Duration;
/// use status_board::Fetcher;
///
/// # tokio_test::block_on(async {
/// let fetcher = Fetcher::new("http://localhost:8080", "output.json", Some(Duration::from_secs(10)))
///     .unwrap();
/// let snapshot = fetcher.fetch().await.unwrap();
/// println!("origin is {:?}", snapshot.origin_status);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    url: String,
}

impl Fetcher {
    /// Create a fetcher for `<base_url>/<resource>`.
    ///
    /// `timeout` of `None` waits indefinitely for the server.
    pub fn new(
        base_url: &str,
        resource: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: resource_url(base_url, resource),
        })
    }

    /// The full URL requested on each fetch.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Perform one request and decode the response body.
    pub async fn fetch(&self) -> Result<Snapshot, FetchError> {
        tracing::debug!(url = %self.url, "fetching snapshot");

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let snapshot =
            Snapshot::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        tracing::debug!(
            url = %self.url,
            bytes = body.len(),
            rejected = snapshot.rejected.len(),
            "snapshot received"
        );
        Ok(snapshot)
    }
}

/// Join a base URL and a relative resource path with exactly one slash.
fn resource_url(base_url: &str, resource: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let resource = resource.trim_start_matches('/');
    if base.is_empty() {
        resource.to_string()
    } else {
        format!("{}/{}", base, resource)
    }
}
