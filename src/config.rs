//! Layered settings: built-in defaults, an optional TOML file, then
//! `STATUS_BOARD_*` environment variables. CLI flags are applied on top by
//! the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::duration::parse_optional_duration;
use crate::data::StatusClassMap;
use crate::source::fetch::DEFAULT_RESOURCE;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_NAME: &str = "status-board";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceSettings {
    /// Base URL the payload resource is fetched from.
    pub url: String,
    pub resource: String,
    /// Read the payload from a local file instead of over HTTP.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

/// Extra status string to class mapping, e.g. `Operational` → `state-up`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StatusAlias {
    pub status: String,
    pub class: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    pub source: SourceSettings,
    /// Refresh interval, e.g. "30s". Zero fetches once.
    pub refresh: String,
    /// Request timeout, e.g. "10s". Zero waits indefinitely.
    pub timeout: String,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub status_classes: Vec<StatusAlias>,
}

impl Settings {
    /// Load settings. An explicit `path` must exist; otherwise
    /// `status-board.toml` is read from the working directory if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = Config::builder()
            .set_default("source.url", "http://localhost:8080")?
            .set_default("source.resource", DEFAULT_RESOURCE)?
            .set_default("refresh", "30s")?
            .set_default("timeout", "10s")?
            .set_default("logging.level", "info")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("STATUS_BOARD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        Ok(settings)
    }

    pub fn refresh_interval(&self) -> Result<Option<Duration>> {
        parse_optional_duration(&self.refresh).context("Invalid refresh interval")
    }

    pub fn request_timeout(&self) -> Result<Option<Duration>> {
        parse_optional_duration(&self.timeout).context("Invalid request timeout")
    }

    /// The default class map extended with the configured aliases.
    pub fn class_map(&self) -> Result<StatusClassMap> {
        self.status_classes
            .iter()
            .try_fold(StatusClassMap::default(), |map, alias| {
                map.with_alias_tag(alias.status.clone(), &alias.class)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StatusClass;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.source.resource, "output.json");
        assert_eq!(settings.source.file, None);
        assert_eq!(settings.refresh_interval().unwrap(), Some(Duration::from_secs(30)));
        assert_eq!(settings.request_timeout().unwrap(), Some(Duration::from_secs(10)));
        assert!(settings.status_classes.is_empty());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = toml_file(
            r#"
refresh = "0s"

[source]
url = "http://status.internal"

[logging]
level = "debug"
file = "board.log"

[[status_classes]]
status = "Operational"
class = "state-up"
"#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.source.url, "http://status.internal");
        assert_eq!(settings.source.resource, "output.json");
        assert_eq!(settings.refresh_interval().unwrap(), None);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.file, Some(PathBuf::from("board.log")));

        let map = settings.class_map().unwrap();
        assert_eq!(map.lookup("Operational"), StatusClass::Up);
        assert_eq!(map.lookup("Down"), StatusClass::Down);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/status-board.toml"))).is_err());
    }

    #[test]
    fn test_bad_values_are_reported() {
        let file = toml_file(
            r#"
refresh = "soon"

[[status_classes]]
status = "Meh"
class = "state-meh"
"#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert!(settings.refresh_interval().is_err());
        assert!(settings.class_map().is_err());
    }
}
