//! Status classes, the service status table and the edge/origin indicators.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::{Serialize, Serializer};

use super::markup::{Element, Tag};
use crate::source::ServiceStatus;

/// Presentation class for a status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusClass {
    Up,
    MostlyUp,
    Degraded,
    Down,
    /// Fallback for status strings the map does not know.
    Unknown,
}

impl StatusClass {
    pub const ALL: [StatusClass; 5] = [
        StatusClass::Up,
        StatusClass::MostlyUp,
        StatusClass::Degraded,
        StatusClass::Down,
        StatusClass::Unknown,
    ];

    /// The class tag, e.g. `"state-up"`.
    pub fn tag(&self) -> &'static str {
        match self {
            StatusClass::Up => "state-up",
            StatusClass::MostlyUp => "state-mostlyup",
            StatusClass::Degraded => "state-degraded",
            StatusClass::Down => "state-down",
            StatusClass::Unknown => "state-unknown",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.tag() == tag)
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            StatusClass::Up => "●",
            StatusClass::MostlyUp => "◕",
            StatusClass::Degraded => "◑",
            StatusClass::Down => "○",
            StatusClass::Unknown => "?",
        }
    }
}

impl Serialize for StatusClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// Immutable mapping from status string to [`StatusClass`].
///
/// Lookups are exact string matches. Anything unmapped gets
/// [`StatusClass::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusClassMap {
    classes: HashMap<String, StatusClass>,
}

impl Default for StatusClassMap {
    fn default() -> Self {
        let classes = [
            ("Up", StatusClass::Up),
            ("Mostly Up", StatusClass::MostlyUp),
            ("Degraded", StatusClass::Degraded),
            ("Down", StatusClass::Down),
        ]
        .into_iter()
        .map(|(status, class)| (status.to_string(), class))
        .collect();

        Self { classes }
    }
}

impl StatusClassMap {
    /// Add or replace the class for one status string.
    pub fn with_alias(mut self, status: impl Into<String>, class: StatusClass) -> Self {
        self.classes.insert(status.into(), class);
        self
    }

    /// Add an alias given as a class tag such as `"state-degraded"`.
    pub fn with_alias_tag(self, status: impl Into<String>, tag: &str) -> Result<Self> {
        let class =
            StatusClass::from_tag(tag).ok_or_else(|| anyhow!("unknown status class: {}", tag))?;
        Ok(self.with_alias(status, class))
    }

    pub fn lookup(&self, status: &str) -> StatusClass {
        self.classes.get(status).copied().unwrap_or(StatusClass::Unknown)
    }

    pub fn is_known(&self, status: &str) -> bool {
        self.classes.contains_key(status)
    }
}

/// Text and class for one of the two headline indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    pub text: String,
    pub class: StatusClass,
}

impl StatusIndicator {
    pub fn new(status: &str, class_map: &StatusClassMap) -> Self {
        if !class_map.is_known(status) {
            tracing::debug!(status, "unmapped status, using fallback class");
        }
        Self {
            text: status.to_string(),
            class: class_map.lookup(status),
        }
    }
}

/// Build the service status table: a header row, then one row per service.
///
/// Rows keep input order; duplicate names are kept.
pub fn build_status_table(services: &[ServiceStatus], class_map: &StatusClassMap) -> Element {
    let header = Element::new(Tag::Row)
        .with_child(Element::new(Tag::HeaderCell).with_text("Service"))
        .with_child(Element::new(Tag::HeaderCell).with_text("Status"));

    services.iter().fold(
        Element::new(Tag::Table).with_child(header),
        |table, service| {
            let row = Element::new(Tag::Row)
                .with_child(Element::new(Tag::Cell).with_text(service.name()))
                .with_child(
                    Element::new(Tag::Cell)
                        .with_class(class_map.lookup(service.status()))
                        .with_text(service.status()),
                );
            table.with_child(row)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_class_map() {
        let map = StatusClassMap::default();
        assert_eq!(map.lookup("Up").tag(), "state-up");
        assert_eq!(map.lookup("Mostly Up").tag(), "state-mostlyup");
        assert_eq!(map.lookup("Degraded").tag(), "state-degraded");
        assert_eq!(map.lookup("Down").tag(), "state-down");
    }

    #[test]
    fn test_unmapped_status_uses_fallback() {
        let map = StatusClassMap::default();
        assert_eq!(map.lookup("Unknown"), StatusClass::Unknown);
        assert_eq!(map.lookup("up"), StatusClass::Unknown);
        assert_eq!(map.lookup("").tag(), "state-unknown");
        assert!(!map.is_known("Unknown"));
    }

    #[test]
    fn test_aliases() {
        let map = StatusClassMap::default()
            .with_alias("Operational", StatusClass::Up)
            .with_alias_tag("Partial Outage", "state-degraded")
            .unwrap();
        assert_eq!(map.lookup("Operational"), StatusClass::Up);
        assert_eq!(map.lookup("Partial Outage"), StatusClass::Degraded);

        assert!(StatusClassMap::default()
            .with_alias_tag("Meh", "state-meh")
            .is_err());
    }

    #[test]
    fn test_tag_round_trip() {
        for class in StatusClass::ALL {
            assert_eq!(StatusClass::from_tag(class.tag()), Some(class));
        }
        assert_eq!(StatusClass::from_tag("up"), None);
    }

    #[test]
    fn test_status_table_rows() {
        let services = vec![ServiceStatus::new("api", "Up"), ServiceStatus::new("db", "Down")];
        let table = build_status_table(&services, &StatusClassMap::default());

        assert_eq!(table.tag, Tag::Table);
        let rows: Vec<&Element> = table.rows().collect();
        assert_eq!(rows.len(), 3);

        assert!(rows[0].is_header_row());
        assert_eq!(rows[0].children[0].text(), "Service");
        assert_eq!(rows[0].children[1].text(), "Status");

        assert_eq!(rows[1].children[0].text(), "api");
        assert_eq!(rows[1].children[1].class, Some(StatusClass::Up));

        assert_eq!(rows[2].children[0].text(), "db");
        assert_eq!(rows[2].children[1].text(), "Down");
        assert_eq!(rows[2].children[1].class.unwrap().tag(), "state-down");
    }

    #[test]
    fn test_status_table_keeps_duplicates_and_unknowns() {
        let services = vec![
            ServiceStatus::new("cdn", "Exploded"),
            ServiceStatus::new("cdn", "Up"),
        ];
        let table = build_status_table(&services, &StatusClassMap::default());
        let rows: Vec<&Element> = table.rows().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].children[1].class, Some(StatusClass::Unknown));
        assert_eq!(rows[1].children[1].text(), "Exploded");
        assert_eq!(rows[2].children[0].text(), "cdn");
    }

    #[test]
    fn test_status_table_empty_has_header_only() {
        let table = build_status_table(&[], &StatusClassMap::default());
        assert_eq!(table.rows().count(), 1);
    }

    #[test]
    fn test_indicator() {
        let map = StatusClassMap::default();
        let indicator = StatusIndicator::new("Mostly Up", &map);
        assert_eq!(indicator.text, "Mostly Up");
        assert_eq!(indicator.class, StatusClass::MostlyUp);

        let unknown = StatusIndicator::new("Maintenance", &map);
        assert_eq!(unknown.class, StatusClass::Unknown);
    }
}
