//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, help overlay
//! and the placeholder shown in panels without content.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::format_duration;
use crate::data::{Panel, Side, StatusIndicator};

/// Render the header bar with the edge and origin indicators.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " STATUS BOARD ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    for side in [Side::Edge, Side::Origin] {
        spans.push(Span::raw("│ "));
        spans.push(Span::raw(format!("{} ", side.label())));
        spans.extend(indicator_spans(app, app.dashboard.status(side)));
        spans.push(Span::raw(" "));
    }

    if app.dashboard.is_stale() {
        spans.push(Span::styled(
            "│ STALE",
            Style::default().fg(app.theme.stale).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Symbol and text for one indicator, styled by its class.
pub fn indicator_spans<'a>(app: &App, panel: &'a Panel<StatusIndicator>) -> Vec<Span<'a>> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    match panel {
        Panel::Ready(indicator) => {
            let style = app.theme.status_style(indicator.class);
            vec![
                Span::styled(format!("{} ", indicator.class.symbol()), style),
                Span::styled(indicator.text.as_str(), style),
            ]
        }
        Panel::Failed(_) => vec![Span::styled("✗ invalid", Style::default().fg(app.theme.down))],
        Panel::Empty => vec![Span::styled("-", dim)],
    }
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!(" {}:{} ", i + 1, view.label())))
        .collect();

    let selected = View::ALL
        .iter()
        .position(|v| *v == app.current_view)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: source, time since last update, refresh interval and controls.
/// Temporary messages and fetch errors take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "Tab:switch r:refresh e:export ?:help q:quit";

    if let Some(ref err) = app.load_error {
        let status = match app.last_updated {
            Some(_) => format!(" Stale: {} | showing last good data | {}", err, controls),
            None => format!(" Error: {} | r:retry q:quit", err),
        };
        let paragraph = Paragraph::new(status).style(Style::default().fg(app.theme.stale));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = match app.last_updated {
        Some(at) => {
            let refresh = match app.refresh_interval {
                Some(interval) => format!("every {}", format_duration(interval)),
                None => "manual".to_string(),
            };
            format!(
                " {} | Updated {:.1}s ago | Refresh {} | {}",
                app.source_description(),
                at.elapsed().as_secs_f64(),
                refresh,
                controls,
            )
        }
        None => format!(" {} | Loading... | q:quit", app.source_description()),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render a bordered panel holding only a message: no data yet, or why the
/// section could not be shown.
pub fn render_placeholder<T>(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    panel: &Panel<T>,
) {
    let (text, style) = match panel {
        Panel::Failed(reason) => (
            format!("Unavailable: {}", reason),
            Style::default().fg(app.theme.down),
        ),
        _ => (
            "No data".to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  Tab ←/→ h/l  Switch views"),
        Line::from("  1 2 3        Overview / Edge / Origin"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Refresh now"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 14u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
