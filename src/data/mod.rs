//! Transforms from a [`Snapshot`](crate::source::Snapshot) to dashboard panels.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "30s", "500ms")
//! - [`series`]: Grouping response-time samples into per-region line series
//! - [`summary`]: Per-region summary table descriptors and two-decimal formatting
//! - [`status`]: Status classes, the indicators and the service status table
//! - [`markup`]: The declarative element tree the status table is built as
//! - [`dashboard`]: The [`Dashboard`] that ties every panel together
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (decoded JSON)
//!        │
//!        ▼
//! Dashboard::apply()
//!        │
//!        ├──▶ StatusIndicator x2   (status::StatusClassMap lookup)
//!        ├──▶ Element table        (status::build_status_table)
//!        ├──▶ LineChart x2         (series::group_by_region)
//!        └──▶ SummaryTable x2      (summary::SummaryTable::assemble)
//! ```

pub mod dashboard;
pub mod duration;
pub mod markup;
pub mod series;
pub mod status;
pub mod summary;

pub use dashboard::{containers, Dashboard, Panel, Side};
pub use markup::{Element, Tag};
pub use series::{group_by_region, LineChart, Series, SeriesGroups, TraceMode};
pub use status::{build_status_table, StatusClass, StatusClassMap, StatusIndicator};
pub use summary::{format_fixed, Column, SummaryTable};
