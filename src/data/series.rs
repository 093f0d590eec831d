//! Time-series grouping for the response-time charts.
//!
//! Samples are grouped by region in a single pass. Groups are emitted in the
//! order their region was first seen, and points keep their encounter order.
//! No sorting, bucketing or downsampling happens here.

use std::collections::HashMap;

use serde::Serialize;

use crate::source::{Sample, Timestamp};

/// Drawing mode of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    #[default]
    Lines,
}

/// One named series of `(x, y)` points.
///
/// `x[i]` and `y[i]` always come from the same sample. A missing `y` is a
/// gap in the line and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub x: Vec<Timestamp>,
    pub y: Vec<Option<f64>>,
    pub name: String,
    pub mode: TraceMode,
}

impl Series {
    fn new(name: &str) -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            name: name.to_string(),
            mode: TraceMode::Lines,
        }
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Points with a plottable x position and a value, in encounter order.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x
            .iter()
            .zip(&self.y)
            .filter_map(|(x, y)| Some((x.axis_value()?, (*y)?)))
            .collect()
    }
}

/// Insertion-ordered mapping from region name to its series.
#[derive(Debug, Clone, Default)]
pub struct SeriesGroups {
    index: HashMap<String, usize>,
    series: Vec<Series>,
}

impl SeriesGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample to its region's series, creating it on first sight.
    pub fn push(&mut self, sample: &Sample) {
        let slot = match self.index.get(&sample.region) {
            Some(&slot) => slot,
            None => {
                self.series.push(Series::new(&sample.region));
                self.index.insert(sample.region.clone(), self.series.len() - 1);
                self.series.len() - 1
            }
        };

        let series = &mut self.series[slot];
        series.x.push(sample.time.clone());
        series.y.push(sample.response_time);
    }

    pub fn get(&self, region: &str) -> Option<&Series> {
        self.index.get(region).map(|&slot| &self.series[slot])
    }

    /// Number of distinct regions seen.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn into_series(self) -> Vec<Series> {
        self.series
    }
}

/// Group samples by region, preserving first-seen region order.
pub fn group_by_region(samples: &[Sample]) -> Vec<Series> {
    let mut groups = SeriesGroups::new();
    for sample in samples {
        groups.push(sample);
    }
    groups.into_series()
}

/// Input for a multi-series line chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LineChart {
    pub traces: Vec<Series>,
}

impl LineChart {
    pub fn from_samples(samples: &[Sample]) -> Self {
        Self {
            traces: group_by_region(samples),
        }
    }

    /// Total number of points across all traces.
    pub fn point_count(&self) -> usize {
        self.traces.iter().map(Series::len).sum()
    }

    /// True when every x value is an RFC 3339 time.
    pub fn has_calendar_axis(&self) -> bool {
        let mut xs = self.traces.iter().flat_map(|s| s.x.iter()).peekable();
        xs.peek().is_some() && xs.all(Timestamp::is_calendar)
    }
}
