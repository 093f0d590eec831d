//! Overview rendering: the two headline indicators and the service table.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::common::{indicator_spans, render_placeholder};
use crate::app::App;
use crate::data::{containers, Element, Panel, Side};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(5), Constraint::Min(4)]).split(area);
    let indicators = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    render_indicator(frame, app, Side::Edge, indicators[0]);
    render_indicator(frame, app, Side::Origin, indicators[1]);

    match &app.dashboard.services {
        Panel::Ready(table) => render_service_table(frame, app, table, chunks[1]),
        other => render_placeholder(frame, app, chunks[1], "Services", other),
    }
}

fn render_indicator(frame: &mut Frame, app: &App, side: Side, area: Rect) {
    let panel = app.dashboard.status(side);
    let title = format!(" {} status ", side.label());

    if let Panel::Failed(_) = panel {
        render_placeholder(frame, app, area, title.trim(), panel);
        return;
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let line = Line::from(indicator_spans(app, panel))
        .patch_style(Style::default().add_modifier(Modifier::BOLD));
    let paragraph = Paragraph::new(vec![Line::from(""), line])
        .alignment(Alignment::Center)
        .block(block);

    frame.render_widget(paragraph, area);
}

/// Draw the status table element tree as a ratatui table.
fn render_service_table(frame: &mut Frame, app: &App, table: &Element, area: Rect) {
    let to_row = |row: &Element| {
        let cells: Vec<Cell> = row
            .children
            .iter()
            .map(|cell| {
                let style = cell
                    .class
                    .map(|class| app.theme.status_style(class))
                    .unwrap_or_default();
                let text = match cell.class {
                    Some(class) => format!("{} {}", class.symbol(), cell.text()),
                    None => cell.text().to_string(),
                };
                Cell::from(text).style(style)
            })
            .collect();
        Row::new(cells)
    };

    let (headers, rows): (Vec<&Element>, Vec<&Element>) =
        table.rows().partition(|row| row.is_header_row());

    let mut widget = Table::new(
        rows.into_iter().map(to_row),
        [Constraint::Percentage(60), Constraint::Percentage(40)],
    )
    .block(
        Block::default()
            .title(format!(" Services [{}] ", containers::SERVICE_STATUSES))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );

    if let Some(header) = headers.first() {
        widget = widget.header(to_row(header).style(app.theme.header));
    }

    frame.render_widget(widget, area);
}
