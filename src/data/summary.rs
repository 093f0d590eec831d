//! Per-region summary tables.
//!
//! Turns a list of [`RegionSummary`] rows into a column-oriented table
//! descriptor: five parallel columns, a fixed header and fixed styling.
//! Row `i` of every column always comes from input row `i`.
//!
//! ## Number formatting
//!
//! Numeric cells use [`format_fixed`]: the exact binary value is rounded to
//! two decimals, and exact ties round half away from zero. `1.005` is stored
//! as `1.00499…` and therefore prints as `"1.00"`, while `0.125` is an exact
//! tie and prints as `"0.13"`.

use serde::Serialize;
use serde_json::Value;

use crate::source::{RegionSummary, SummaryEntry};

/// Header labels, in column order.
pub const HEADERS: [&str; 5] = ["Region", "Min (ms)", "Max (ms)", "Mean (ms)", "P95 (ms)"];

/// Cell text used for values of a failed row.
pub const PLACEHOLDER: &str = "-";

const NUMERIC_FIELDS: [&str; 4] = ["min", "max", "mean", "p95"];

/// A column of the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Region,
    Min,
    Max,
    Mean,
    P95,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Region,
        Column::Min,
        Column::Max,
        Column::Mean,
        Column::P95,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn header(self) -> &'static str {
        HEADERS[self.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    pub width: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: &'static str,
    pub size: u8,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderSpec {
    pub values: Vec<Vec<String>>,
    pub align: &'static str,
    pub line: LineStyle,
    pub fill: Fill,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSpec {
    pub values: Vec<Vec<String>>,
    pub align: &'static str,
    pub line: LineStyle,
    pub font: Font,
}

/// A row that could not be formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    pub row: usize,
    pub reason: String,
}

/// Table descriptor for one `*_responses_by_region` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub header: HeaderSpec,
    pub cells: CellSpec,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_rows: Vec<RowFailure>,
}

impl SummaryTable {
    /// Assemble the table from wire rows, failing malformed rows one at a time.
    pub fn assemble(entries: &[SummaryEntry]) -> Self {
        let mut columns: Vec<Vec<String>> = vec![Vec::with_capacity(entries.len()); 5];
        let mut failed_rows = Vec::new();

        for (row, entry) in entries.iter().enumerate() {
            let cells = match entry {
                SummaryEntry::Valid(summary) => format_row(summary),
                SummaryEntry::Malformed(raw) => {
                    let reason = describe_malformed(raw);
                    tracing::warn!(row, %reason, "region summary row failed");
                    failed_rows.push(RowFailure { row, reason });
                    placeholder_row(raw)
                }
            };

            for (column, cell) in columns.iter_mut().zip(cells) {
                column.push(cell);
            }
        }

        Self {
            kind: "table",
            header: HeaderSpec {
                values: HEADERS.iter().map(|h| vec![h.to_string()]).collect(),
                align: "center",
                line: LineStyle {
                    color: None,
                    width: 1,
                },
                fill: Fill { color: "grey" },
                font: Font {
                    family: "Arial",
                    size: 12,
                    color: "white",
                },
            },
            cells: CellSpec {
                values: columns,
                align: "center",
                line: LineStyle {
                    color: Some("black"),
                    width: 1,
                },
                font: Font {
                    family: "Arial",
                    size: 11,
                    color: "black",
                },
            },
            failed_rows,
        }
    }

    pub fn column(&self, column: Column) -> &[String] {
        &self.cells.values[column.index()]
    }

    pub fn row_count(&self) -> usize {
        self.column(Column::Region).len()
    }

    /// Cells of one row, in column order.
    pub fn row(&self, row: usize) -> Option<Vec<&str>> {
        Column::ALL
            .iter()
            .map(|&c| self.column(c).get(row).map(String::as_str))
            .collect()
    }

    pub fn is_failed(&self, row: usize) -> bool {
        self.failed_rows.iter().any(|f| f.row == row)
    }
}

fn format_row(summary: &RegionSummary) -> [String; 5] {
    [
        summary.region.clone(),
        format_fixed(summary.min),
        format_fixed(summary.max),
        format_fixed(summary.mean),
        format_fixed(summary.p95),
    ]
}

fn placeholder_row(raw: &Value) -> [String; 5] {
    let region = raw
        .get("region")
        .and_then(Value::as_str)
        .unwrap_or(PLACEHOLDER)
        .to_string();
    [
        region,
        PLACEHOLDER.to_string(),
        PLACEHOLDER.to_string(),
        PLACEHOLDER.to_string(),
        PLACEHOLDER.to_string(),
    ]
}

fn describe_malformed(raw: &Value) -> String {
    let Some(object) = raw.as_object() else {
        return format!("expected an object, got {}", raw);
    };

    let mut problems: Vec<&str> = NUMERIC_FIELDS
        .iter()
        .copied()
        .filter(|field| !object.get(*field).is_some_and(Value::is_number))
        .collect();
    if !object.get("region").is_some_and(Value::is_string) {
        problems.insert(0, "region");
    }

    if problems.is_empty() {
        "unrecognised row".to_string()
    } else {
        format!("missing or invalid: {}", problems.join(", "))
    }
}

/// Format a number with exactly two decimals.
pub fn format_fixed(value: f64) -> String {
    let scaled = value * 100.0;
    // Odd multiples of 1/8 are the only exact ties; they round away from zero
    if (value * 8.0).fract() == 0.0 && scaled.fract().abs() == 0.5 {
        let rounded = scaled.trunc() + scaled.signum();
        return format!("{:.2}", rounded / 100.0);
    }
    format!("{:.2}", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid(region: &str, min: f64, max: f64, mean: f64, p95: f64) -> SummaryEntry {
        SummaryEntry::Valid(RegionSummary {
            region: region.to_string(),
            min,
            max,
            mean,
            p95,
        })
    }

    #[test]
    fn test_format_fixed_rounding() {
        // 1.005 is really 1.00499999999999989... in binary
        assert_eq!(format_fixed(1.005), "1.00");
        assert_eq!(format_fixed(2.675), "2.67");
        // exact ties
        assert_eq!(format_fixed(0.125), "0.13");
        assert_eq!(format_fixed(1.375), "1.38");
        assert_eq!(format_fixed(-0.125), "-0.13");
        // plain values
        assert_eq!(format_fixed(0.0), "0.00");
        assert_eq!(format_fixed(2.5), "2.50");
        assert_eq!(format_fixed(10.0), "10.00");
        assert_eq!(format_fixed(123.456), "123.46");
    }

    #[test]
    fn test_columns_preserve_row_order() {
        let entries = vec![
            valid("us", 1.0, 9.0, 4.0, 8.0),
            valid("eu", 2.0, 8.0, 5.0, 7.5),
            valid("ap", 3.0, 7.0, 6.0, 6.25),
        ];

        let table = SummaryTable::assemble(&entries);
        assert_eq!(table.row_count(), 3);
        for (i, entry) in entries.iter().enumerate() {
            let SummaryEntry::Valid(summary) = entry else {
                unreachable!()
            };
            assert_eq!(table.column(Column::Region)[i], summary.region);
        }
        assert_eq!(table.row(1).unwrap(), vec!["eu", "2.00", "8.00", "5.00", "7.50"]);
        assert!(table.row(3).is_none());
        assert!(table.failed_rows.is_empty());
    }

    #[test]
    fn test_fixed_header_and_style() {
        let table = SummaryTable::assemble(&[]);
        assert_eq!(table.kind, "table");
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.cells.values.len(), 5);

        let labels: Vec<&str> = table.header.values.iter().map(|v| v[0].as_str()).collect();
        assert_eq!(labels, HEADERS);
        assert_eq!(Column::P95.header(), "P95 (ms)");
        assert_eq!(table.header.fill.color, "grey");
        assert_eq!(table.header.font.color, "white");
        assert_eq!(table.cells.font.size, 11);
    }

    #[test]
    fn test_malformed_row_fails_alone() {
        let entries = vec![
            valid("us", 1.0, 2.0, 1.5, 1.9),
            SummaryEntry::Malformed(json!({"region": "eu", "min": 1.0, "max": 2.0, "mean": 1.5})),
            valid("ap", 3.0, 4.0, 3.5, 3.9),
        ];

        let table = SummaryTable::assemble(&entries);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.row(0).unwrap(), vec!["us", "1.00", "2.00", "1.50", "1.90"]);
        assert_eq!(table.row(1).unwrap(), vec!["eu", "-", "-", "-", "-"]);
        assert_eq!(table.row(2).unwrap()[0], "ap");

        assert!(table.is_failed(1));
        assert!(!table.is_failed(0));
        assert_eq!(table.failed_rows[0].reason, "missing or invalid: p95");
    }

    #[test]
    fn test_malformed_row_without_region() {
        let table = SummaryTable::assemble(&[SummaryEntry::Malformed(json!("oops"))]);
        assert_eq!(table.row(0).unwrap(), vec!["-", "-", "-", "-", "-"]);
        assert!(table.failed_rows[0].reason.starts_with("expected an object"));

        let table = SummaryTable::assemble(&[SummaryEntry::Malformed(json!({"min": "x"}))]);
        assert_eq!(
            table.failed_rows[0].reason,
            "missing or invalid: region, min, max, mean, p95"
        );
    }

    #[test]
    fn test_serializes_as_table_trace() {
        let table = SummaryTable::assemble(&[valid("us", 1.0, 2.0, 1.5, 1.9)]);
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json["type"], "table");
        assert_eq!(json["header"]["values"][0], json!(["Region"]));
        assert_eq!(json["cells"]["values"][1], json!(["1.00"]));
        assert_eq!(json["cells"]["line"], json!({"color": "black", "width": 1}));
        assert!(json.get("failed_rows").is_none());
    }
}
