//! Snapshot types for the status payload.
//!
//! These types match the `output.json` document written by the upstream
//! collector. Every top-level key is optional: the reduced deployment only
//! publishes the two response-time series.
//!
//! Each top-level section is decoded on its own. A section with the wrong
//! shape is recorded in [`Snapshot::rejected`] and left empty, so one bad
//! section never hides the others.

use std::fmt;

use serde::de::{self, DeserializeOwned, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Top-level payload keys.
pub mod keys {
    pub const EDGE_STATUS: &str = "edge_status";
    pub const ORIGIN_STATUS: &str = "origin_status";
    pub const SERVICES: &str = "services";
    pub const EDGE_RESPONSE_TIMES: &str = "edge_response_times";
    pub const ORIGIN_RESPONSE_TIMES: &str = "origin_response_times";
    pub const EDGE_RESPONSES_BY_REGION: &str = "edge_responses_by_region";
    pub const ORIGIN_RESPONSES_BY_REGION: &str = "origin_responses_by_region";
}

/// A timestamp-like value attached to a sample.
///
/// The collector emits RFC 3339 strings, but plain numbers are accepted too.
/// The value is passed through untouched; only the chart converts it into an
/// axis position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Number(serde_json::Number),
    Text(String),
}

impl Timestamp {
    /// Position on a chart axis, in seconds for RFC 3339 strings.
    ///
    /// Returns `None` for strings that are neither RFC 3339 nor numeric.
    pub fn axis_value(&self) -> Option<f64> {
        match self {
            Timestamp::Number(n) => n.as_f64(),
            Timestamp::Text(s) => chrono::DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.timestamp_millis() as f64 / 1000.0)
                .ok()
                .or_else(|| s.trim().parse().ok()),
        }
    }

    /// Returns true if this timestamp is a calendar time rather than a number.
    pub fn is_calendar(&self) -> bool {
        matches!(self, Timestamp::Text(s) if chrono::DateTime::parse_from_rfc3339(s).is_ok())
    }
}

impl From<i64> for Timestamp {
    fn from(n: i64) -> Self {
        Timestamp::Number(n.into())
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Timestamp::Text(s.to_string())
    }
}

/// One response-time measurement.
///
/// Duplicates and out-of-order times are legal and kept as-is. A `null`
/// response time is a gap in the series; the key itself must be present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub region: String,
    pub time: Timestamp,
    #[serde(deserialize_with = "Option::deserialize")]
    pub response_time: Option<f64>,
}

/// Precomputed response-time statistics for one region, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p95: f64,
}

/// A region summary row as it arrived on the wire.
///
/// Rows that do not match [`RegionSummary`] are kept verbatim so the table
/// can fail that single row instead of the whole section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SummaryEntry {
    Valid(RegionSummary),
    Malformed(Value),
}

/// A `[name, status]` pair from the `services` list.
///
/// Entries longer than two elements keep the first two and drop the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus(pub String, pub String);

impl<'de> Deserialize<'de> for ServiceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PairVisitor;

        impl<'de> Visitor<'de> for PairVisitor {
            type Value = ServiceStatus;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a [name, status] array")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let name: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let status: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(ServiceStatus(name, status))
            }
        }

        deserializer.deserialize_seq(PairVisitor)
    }
}

impl ServiceStatus {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self(name.into(), status.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn status(&self) -> &str {
        &self.1
    }
}

/// A top-level section that was present but could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedSection {
    pub key: &'static str,
    pub reason: String,
}

/// One decoded status payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub edge_status: Option<String>,
    pub origin_status: Option<String>,
    pub services: Option<Vec<ServiceStatus>>,
    pub edge_response_times: Option<Vec<Sample>>,
    pub origin_response_times: Option<Vec<Sample>>,
    pub edge_responses_by_region: Option<Vec<SummaryEntry>>,
    pub origin_responses_by_region: Option<Vec<SummaryEntry>>,
    /// Sections present in the payload that had the wrong shape.
    pub rejected: Vec<RejectedSection>,
}

impl Snapshot {
    /// Decode a snapshot from raw JSON bytes.
    ///
    /// Fails only if the document is not valid JSON or not an object.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let map: Map<String, Value> = serde_json::from_slice(bytes)?;
        Ok(Self::from_map(map))
    }

    /// Decode a snapshot from a JSON string.
    pub fn parse(content: &str) -> serde_json::Result<Self> {
        Self::from_slice(content.as_bytes())
    }

    /// Build a snapshot from an already-parsed JSON object.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let mut rejected = Vec::new();

        Self {
            edge_status: section(&mut map, keys::EDGE_STATUS, &mut rejected),
            origin_status: section(&mut map, keys::ORIGIN_STATUS, &mut rejected),
            services: section(&mut map, keys::SERVICES, &mut rejected),
            edge_response_times: section(&mut map, keys::EDGE_RESPONSE_TIMES, &mut rejected),
            origin_response_times: section(&mut map, keys::ORIGIN_RESPONSE_TIMES, &mut rejected),
            edge_responses_by_region: section(
                &mut map,
                keys::EDGE_RESPONSES_BY_REGION,
                &mut rejected,
            ),
            origin_responses_by_region: section(
                &mut map,
                keys::ORIGIN_RESPONSES_BY_REGION,
                &mut rejected,
            ),
            rejected,
        }
    }

    /// Look up the rejection for a top-level key, if that section was malformed.
    pub fn rejection(&self, key: &str) -> Option<&RejectedSection> {
        self.rejected.iter().find(|r| r.key == key)
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        Ok(Self::from_map(map))
    }
}

/// Remove and decode one section. `null` counts as absent.
fn section<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    key: &'static str,
    rejected: &mut Vec<RejectedSection>,
) -> Option<T> {
    match map.remove(key) {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(section = key, error = %e, "rejecting malformed snapshot section");
                rejected.push(RejectedSection {
                    key,
                    reason: e.to_string(),
                });
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_snapshot() {
        let json = r#"{
            "edge_status": "Up",
            "origin_status": "Degraded",
            "services": [["api", "Up"], ["db", "Down"]],
            "edge_response_times": [
                {"region": "us", "time": "2024-03-01T12:00:00Z", "response_time": 10.5}
            ],
            "origin_response_times": [
                {"region": "eu", "time": 1, "response_time": 30}
            ],
            "edge_responses_by_region": [
                {"region": "us", "min": 1.0, "max": 2.0, "mean": 1.5, "p95": 1.9}
            ],
            "origin_responses_by_region": []
        }"#;

        let snapshot = Snapshot::parse(json).unwrap();
        assert_eq!(snapshot.edge_status.as_deref(), Some("Up"));
        assert_eq!(snapshot.origin_status.as_deref(), Some("Degraded"));

        let services = snapshot.services.as_ref().unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[1].name(), "db");
        assert_eq!(services[1].status(), "Down");

        let edge = snapshot.edge_response_times.as_ref().unwrap();
        assert_eq!(edge[0].time, Timestamp::from("2024-03-01T12:00:00Z"));
        assert_eq!(edge[0].response_time, Some(10.5));

        let origin = snapshot.origin_response_times.as_ref().unwrap();
        assert_eq!(origin[0].time, Timestamp::from(1));

        assert!(matches!(
            snapshot.edge_responses_by_region.as_ref().unwrap()[0],
            SummaryEntry::Valid(_)
        ));
        assert!(snapshot.origin_responses_by_region.as_ref().unwrap().is_empty());
        assert!(snapshot.rejected.is_empty());
    }

    #[test]
    fn test_reduced_deployment_only_has_series() {
        let json = r#"{
            "edge_response_times": [],
            "origin_response_times": []
        }"#;

        let snapshot = Snapshot::parse(json).unwrap();
        assert!(snapshot.edge_response_times.is_some());
        assert!(snapshot.origin_response_times.is_some());
        assert!(snapshot.edge_status.is_none());
        assert!(snapshot.services.is_none());
        assert!(snapshot.edge_responses_by_region.is_none());
        assert!(snapshot.rejected.is_empty());
    }

    #[test]
    fn test_null_section_is_absent() {
        let snapshot = Snapshot::parse(r#"{"services": null}"#).unwrap();
        assert!(snapshot.services.is_none());
        assert!(snapshot.rejected.is_empty());
    }

    #[test]
    fn test_malformed_section_does_not_hide_others() {
        let json = r#"{
            "edge_status": "Up",
            "services": {"api": "Up"},
            "edge_response_times": [{"region": "us", "time": 1}]
        }"#;

        let snapshot = Snapshot::parse(json).unwrap();
        assert_eq!(snapshot.edge_status.as_deref(), Some("Up"));
        assert!(snapshot.services.is_none());
        assert!(snapshot.edge_response_times.is_none());
        assert_eq!(snapshot.rejected.len(), 2);
        assert!(snapshot.rejection(keys::SERVICES).is_some());
        assert!(snapshot
            .rejection(keys::EDGE_RESPONSE_TIMES)
            .unwrap()
            .reason
            .contains("response_time"));
        assert!(snapshot.rejection(keys::EDGE_STATUS).is_none());
    }

    #[test]
    fn test_summary_row_missing_field_is_kept_as_malformed() {
        let json = r#"{
            "edge_responses_by_region": [
                {"region": "us", "min": 1.0, "max": 2.0, "mean": 1.5, "p95": 1.9},
                {"region": "eu", "min": 1.0, "max": 2.0, "mean": 1.5}
            ]
        }"#;

        let snapshot = Snapshot::parse(json).unwrap();
        let rows = snapshot.edge_responses_by_region.unwrap();
        assert!(matches!(rows[0], SummaryEntry::Valid(_)));
        assert!(matches!(rows[1], SummaryEntry::Malformed(_)));
    }

    #[test]
    fn test_null_response_time_is_a_gap() {
        let json = r#"{
            "edge_response_times": [
                {"region": "us", "time": 1, "response_time": 10},
                {"region": "us", "time": 2, "response_time": null}
            ]
        }"#;

        let snapshot = Snapshot::parse(json).unwrap();
        let samples = snapshot.edge_response_times.unwrap();
        assert_eq!(samples[0].response_time, Some(10.0));
        assert_eq!(samples[1].response_time, None);
        assert!(snapshot.rejected.is_empty());
    }

    #[test]
    fn test_service_entry_extra_fields_are_dropped() {
        let json = r#"{"services": [["api", "Up", "since 09:00"], ["db", "Down"]]}"#;

        let snapshot = Snapshot::parse(json).unwrap();
        let services = snapshot.services.unwrap();
        assert_eq!(services[0], ServiceStatus::new("api", "Up"));
        assert_eq!(services[1], ServiceStatus::new("db", "Down"));
        assert!(snapshot.rejected.is_empty());
    }

    #[test]
    fn test_short_service_entry_rejects_section() {
        let snapshot = Snapshot::parse(r#"{"services": [["api"]]}"#).unwrap();
        assert!(snapshot.services.is_none());
        assert!(snapshot.rejection(keys::SERVICES).is_some());
    }

    #[test]
    fn test_non_object_payload_is_an_error() {
        assert!(Snapshot::parse("[1, 2, 3]").is_err());
        assert!(Snapshot::parse("not json").is_err());
    }

    #[test]
    fn test_timestamp_axis_value() {
        assert_eq!(Timestamp::from(2).axis_value(), Some(2.0));
        assert_eq!(
            Timestamp::from("1970-01-01T00:01:00Z").axis_value(),
            Some(60.0)
        );
        assert_eq!(Timestamp::from("12.5").axis_value(), Some(12.5));
        assert_eq!(Timestamp::from("yesterday").axis_value(), None);
        assert!(Timestamp::from("1970-01-01T00:01:00Z").is_calendar());
        assert!(!Timestamp::from(5).is_calendar());
    }

    #[test]
    fn test_serde_entry_point_matches_from_slice() {
        let json = r#"{"edge_status": "Down"}"#;
        let via_serde: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(via_serde, Snapshot::parse(json).unwrap());
    }
}
