//! Edge/origin latency view: the response-time chart above the per-region
//! summary table.

use chrono::DateTime;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Row, Table},
    Frame,
};

use super::common::render_placeholder;
use crate::app::App;
use crate::data::{Column, LineChart, Panel, Side, SummaryTable};

pub fn render(frame: &mut Frame, app: &App, side: Side, area: Rect) {
    let summary_height = match app.dashboard.summary(side) {
        Panel::Ready(table) => {
            let rows = u16::try_from(table.row_count()).unwrap_or(u16::MAX);
            rows.saturating_add(3).min(area.height / 2)
        }
        _ => 3,
    };
    let chunks =
        Layout::vertical([Constraint::Min(6), Constraint::Length(summary_height)]).split(area);

    let chart_title = format!("{} response times", side.label());
    match app.dashboard.chart(side) {
        Panel::Ready(chart) if chart.point_count() > 0 => {
            render_chart(frame, app, chart, &chart_title, chunks[0])
        }
        other => render_placeholder(frame, app, chunks[0], &chart_title, other),
    }

    let table_title = format!("{} response by region", side.label());
    match app.dashboard.summary(side) {
        Panel::Ready(table) => render_summary(frame, app, table, &table_title, chunks[1]),
        other => render_placeholder(frame, app, chunks[1], &table_title, other),
    }
}

/// Min and max over `values`, widened so the range is never empty.
fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if min == max {
        return [min - 1.0, max + 1.0];
    }
    [min, max]
}

/// Label for an x position: wall-clock time on calendar axes, else the number.
fn x_label(x: f64, calendar: bool) -> String {
    if calendar {
        if let Some(time) = DateTime::from_timestamp(x.floor() as i64, 0) {
            return time.format("%H:%M:%S").to_string();
        }
    }
    format!("{}", x)
}

fn render_chart(frame: &mut Frame, app: &App, chart: &LineChart, title: &str, area: Rect) {
    let points: Vec<Vec<(f64, f64)>> = chart.traces.iter().map(|s| s.points()).collect();

    let datasets: Vec<Dataset> = chart
        .traces
        .iter()
        .zip(&points)
        .enumerate()
        .map(|(i, (series, data))| {
            Dataset::default()
                .name(series.name.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(app.theme.series_color(i)))
                .data(data)
        })
        .collect();

    let x_bounds = bounds(points.iter().flatten().map(|(x, _)| *x));
    let y_bounds = bounds(points.iter().flatten().map(|(_, y)| *y));
    let calendar = chart.has_calendar_axis();
    let dim = Style::default().add_modifier(Modifier::DIM);

    let widget = Chart::new(datasets)
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled("time", dim))
                .bounds(x_bounds)
                .labels(vec![
                    Line::from(x_label(x_bounds[0], calendar)),
                    Line::from(x_label(x_bounds[1], calendar)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("ms", dim))
                .bounds(y_bounds)
                .labels(vec![
                    Line::from(format!("{:.1}", y_bounds[0])),
                    Line::from(format!("{:.1}", y_bounds[1])),
                ]),
        );

    frame.render_widget(widget, area);
}

fn render_summary(frame: &mut Frame, app: &App, table: &SummaryTable, title: &str, area: Rect) {
    let header = Row::new(Column::ALL.iter().map(|c| Cell::from(c.header())))
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = (0..table.row_count())
        .filter_map(|i| {
            let cells = table.row(i)?;
            let style = if table.is_failed(i) {
                Style::default().fg(app.theme.degraded).add_modifier(Modifier::DIM)
            } else {
                Style::default()
            };
            Some(Row::new(cells.into_iter().map(|c| Cell::from(c.to_string()))).style(style))
        })
        .collect();

    let widget = Table::new(rows, [Constraint::Ratio(1, 5); 5])
        .header(header)
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );

    frame.render_widget(widget, area);
}
