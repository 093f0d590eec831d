//! The assembled dashboard: every panel, keyed by its container.
//!
//! [`Dashboard::apply`] runs each transform against its own payload section.
//! The steps share nothing, so a failure in one never stops another:
//!
//! ```text
//! Snapshot ──┬── edge_status ─────────────── StatusIndicator ──▶ edgestatus
//!            ├── origin_status ───────────── StatusIndicator ──▶ originstatus
//!            ├── services ────────────────── Element tree ─────▶ servicestatuses
//!            ├── edge_response_times ─────── LineChart ────────▶ response_times
//!            ├── origin_response_times ───── LineChart ────────▶ origin_response_times
//!            ├── edge_responses_by_region ── SummaryTable ─────▶ edge_response_by_region
//!            └── origin_responses_by_region  SummaryTable ─────▶ origin_response_by_region
//! ```

use serde::Serialize;
use serde_json::{json, Map, Value};

use super::markup::Element;
use super::series::LineChart;
use super::status::{build_status_table, StatusClassMap, StatusIndicator};
use super::summary::SummaryTable;
use crate::source::{keys, Snapshot};

/// Container identifiers.
pub mod containers {
    pub const EDGE_STATUS: &str = "edgestatus";
    pub const ORIGIN_STATUS: &str = "originstatus";
    pub const SERVICE_STATUSES: &str = "servicestatuses";
    pub const EDGE_RESPONSE_TIMES: &str = "response_times";
    pub const ORIGIN_RESPONSE_TIMES: &str = "origin_response_times";
    pub const EDGE_RESPONSE_BY_REGION: &str = "edge_response_by_region";
    pub const ORIGIN_RESPONSE_BY_REGION: &str = "origin_response_by_region";
}

/// Content attached to one container.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Panel<T> {
    /// Nothing has been rendered here yet.
    #[default]
    Empty,
    Ready(T),
    /// The payload section was present but unusable.
    Failed(String),
}

impl<T> Panel<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            Panel::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl<T: Serialize> Panel<T> {
    fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            Panel::Empty => Ok(Value::Null),
            Panel::Ready(value) => serde_json::to_value(value),
            Panel::Failed(reason) => Ok(json!({ "error": reason })),
        }
    }
}

/// Which half of the deployment a panel describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Edge,
    Origin,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Edge => "Edge",
            Side::Origin => "Origin",
        }
    }

    pub fn chart_container(&self) -> &'static str {
        match self {
            Side::Edge => containers::EDGE_RESPONSE_TIMES,
            Side::Origin => containers::ORIGIN_RESPONSE_TIMES,
        }
    }

    pub fn table_container(&self) -> &'static str {
        match self {
            Side::Edge => containers::EDGE_RESPONSE_BY_REGION,
            Side::Origin => containers::ORIGIN_RESPONSE_BY_REGION,
        }
    }
}

/// Everything currently on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub edge_status: Panel<StatusIndicator>,
    pub origin_status: Panel<StatusIndicator>,
    pub services: Panel<Element>,
    pub edge_chart: Panel<LineChart>,
    pub origin_chart: Panel<LineChart>,
    pub edge_summary: Panel<SummaryTable>,
    pub origin_summary: Panel<SummaryTable>,
    /// Why the displayed data may be out of date, if the last refresh failed.
    pub stale: Option<String>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one snapshot into the dashboard.
    ///
    /// Absent sections leave their panel as it was; rejected sections mark
    /// their panel failed. Each panel is replaced wholesale, so applying the
    /// same snapshot twice yields the same dashboard.
    pub fn apply(&mut self, snapshot: &Snapshot, class_map: &StatusClassMap) {
        self.stale = None;

        attach(&mut self.edge_status, keys::EDGE_STATUS, snapshot, || {
            snapshot.edge_status.as_deref().map(|s| StatusIndicator::new(s, class_map))
        });
        attach(&mut self.origin_status, keys::ORIGIN_STATUS, snapshot, || {
            snapshot.origin_status.as_deref().map(|s| StatusIndicator::new(s, class_map))
        });
        attach(&mut self.services, keys::SERVICES, snapshot, || {
            snapshot.services.as_deref().map(|s| build_status_table(s, class_map))
        });
        attach(&mut self.edge_chart, keys::EDGE_RESPONSE_TIMES, snapshot, || {
            snapshot.edge_response_times.as_deref().map(LineChart::from_samples)
        });
        attach(&mut self.origin_chart, keys::ORIGIN_RESPONSE_TIMES, snapshot, || {
            snapshot.origin_response_times.as_deref().map(LineChart::from_samples)
        });
        attach(&mut self.edge_summary, keys::EDGE_RESPONSES_BY_REGION, snapshot, || {
            snapshot.edge_responses_by_region.as_deref().map(SummaryTable::assemble)
        });
        attach(&mut self.origin_summary, keys::ORIGIN_RESPONSES_BY_REGION, snapshot, || {
            snapshot.origin_responses_by_region.as_deref().map(SummaryTable::assemble)
        });
    }

    /// Record a failed refresh. The last rendered state stays in place.
    pub fn mark_stale(&mut self, reason: impl Into<String>) {
        self.stale = Some(reason.into());
    }

    pub fn is_stale(&self) -> bool {
        self.stale.is_some()
    }

    /// True until the first snapshot with any usable section is applied.
    pub fn is_blank(&self) -> bool {
        *self == Self { stale: self.stale.clone(), ..Self::default() }
    }

    pub fn status(&self, side: Side) -> &Panel<StatusIndicator> {
        match side {
            Side::Edge => &self.edge_status,
            Side::Origin => &self.origin_status,
        }
    }

    pub fn chart(&self, side: Side) -> &Panel<LineChart> {
        match side {
            Side::Edge => &self.edge_chart,
            Side::Origin => &self.origin_chart,
        }
    }

    pub fn summary(&self, side: Side) -> &Panel<SummaryTable> {
        match side {
            Side::Edge => &self.edge_summary,
            Side::Origin => &self.origin_summary,
        }
    }

    /// Export every container as the descriptor handed to its renderer.
    ///
    /// Charts are lists of traces and summary tables are one-element trace
    /// lists, matching what a plotting library takes.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let mut out = Map::new();

        out.insert(containers::EDGE_STATUS.to_string(), self.edge_status.to_json()?);
        out.insert(containers::ORIGIN_STATUS.to_string(), self.origin_status.to_json()?);
        out.insert(containers::SERVICE_STATUSES.to_string(), self.services.to_json()?);
        out.insert(containers::EDGE_RESPONSE_TIMES.to_string(), self.edge_chart.to_json()?);
        out.insert(containers::ORIGIN_RESPONSE_TIMES.to_string(), self.origin_chart.to_json()?);

        for (container, panel) in [
            (containers::EDGE_RESPONSE_BY_REGION, &self.edge_summary),
            (containers::ORIGIN_RESPONSE_BY_REGION, &self.origin_summary),
        ] {
            let value = match panel.to_json()? {
                table @ Value::Object(_) if panel.ready().is_some() => json!([table]),
                other => other,
            };
            out.insert(container.to_string(), value);
        }

        out.insert("stale".to_string(), json!(self.stale));
        Ok(Value::Object(out))
    }
}

fn attach<T>(
    panel: &mut Panel<T>,
    key: &str,
    snapshot: &Snapshot,
    build: impl FnOnce() -> Option<T>,
) {
    if let Some(rejected) = snapshot.rejection(key) {
        *panel = Panel::Failed(rejected.reason.clone());
        return;
    }

    match build() {
        Some(content) => *panel = Panel::Ready(content),
        None => tracing::trace!(section = key, "section absent, keeping previous panel"),
    }
}
