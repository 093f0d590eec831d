//! File-based data source.
//!
//! Polls a local `output.json` for status snapshots.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{DataSource, Snapshot};

/// A data source that reads status snapshots from a JSON file.
///
/// Useful when the collector writes `output.json` next to the viewer
/// instead of serving it over HTTP.
///
/// The source tracks the file's modification time and only returns
/// new data when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    force_reload: bool,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            force_reload: false,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn get_modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    /// Read and parse the file.
    fn read_file(&mut self) -> Option<Snapshot> {
        match fs::read(&self.path) {
            Ok(content) => match Snapshot::from_slice(&content) {
                Ok(snapshot) => {
                    self.last_error = None;
                    Some(snapshot)
                }
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "snapshot parse failed");
                    self.last_error = Some(format!("Parse error: {}", e));
                    None
                }
            },
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "snapshot read failed");
                self.last_error = Some(format!("Read error: {}", e));
                None
            }
        }
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<Snapshot> {
        let current_modified = self.get_modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            _ if self.force_reload => true,
            (None, _) => true,        // First poll, always read
            (Some(_), None) => false, // File disappeared, keep what we have
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }

        self.force_reload = false;
        let snapshot = self.read_file()?;
        self.last_modified = current_modified;
        Some(snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn refresh(&mut self) {
        self.force_reload = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, Write};
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "edge_status": "Up",
            "services": [["api", "Up"]]
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/output.json");
        assert_eq!(source.path(), Path::new("/tmp/output.json"));
        assert_eq!(source.description(), "file: /tmp/output.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.edge_status.as_deref(), Some("Up"));

        // Second poll without file change should return None
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_refresh_forces_reread() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());

        source.refresh();
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_detects_changes() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_some());

        file.rewind().unwrap();
        file.as_file().set_len(0).unwrap();
        writeln!(file, r#"{{"edge_status": "Down"}}"#).unwrap();
        file.flush().unwrap();
        // Move the mtime well ahead so coarse timestamp resolution can't hide the write
        let later = SystemTime::now() + std::time::Duration::from_secs(60);
        file.as_file().set_modified(later).unwrap();

        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.edge_status.as_deref(), Some("Down"));
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/output.json");

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.poll().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }

    #[test]
    fn test_file_source_recovers_after_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_none());
        assert!(source.error().is_some());

        file.rewind().unwrap();
        file.as_file().set_len(0).unwrap();
        writeln!(file, "{}", sample_json()).unwrap();
        file.flush().unwrap();

        // The failed read never recorded an mtime, so the next poll retries.
        assert!(source.poll().is_some());
        assert!(source.error().is_none());
    }
}
