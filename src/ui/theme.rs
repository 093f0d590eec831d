//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::StatusClass;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    pub up: Color,
    pub mostly_up: Color,
    pub degraded: Color,
    pub down: Color,
    /// Color for statuses with no configured class.
    pub unknown: Color,
    /// Color for the stale-data warning.
    pub stale: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
    /// Line colors assigned to chart series in order.
    pub series: Vec<Color>,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            up: Color::Green,
            mostly_up: Color::LightGreen,
            degraded: Color::Yellow,
            down: Color::Red,
            unknown: Color::Gray,
            stale: Color::Yellow,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
            series: vec![
                Color::Cyan,
                Color::Magenta,
                Color::Yellow,
                Color::LightBlue,
                Color::LightRed,
                Color::LightGreen,
            ],
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            up: Color::Green,
            mostly_up: Color::LightGreen,
            degraded: Color::Yellow,
            down: Color::Red,
            unknown: Color::DarkGray,
            stale: Color::Magenta,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
            series: vec![
                Color::Blue,
                Color::Magenta,
                Color::Red,
                Color::Green,
                Color::DarkGray,
                Color::Cyan,
            ],
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a status class
    pub fn status_style(&self, class: StatusClass) -> Style {
        match class {
            StatusClass::Up => Style::default().fg(self.up),
            StatusClass::MostlyUp => Style::default().fg(self.mostly_up),
            StatusClass::Degraded => Style::default().fg(self.degraded),
            StatusClass::Down => Style::default().fg(self.down).add_modifier(Modifier::BOLD),
            StatusClass::Unknown => Style::default().fg(self.unknown).add_modifier(Modifier::DIM),
        }
    }

    /// Line color for the `index`-th series, wrapping around the palette.
    pub fn series_color(&self, index: usize) -> Color {
        if self.series.is_empty() {
            return self.highlight;
        }
        self.series[index % self.series.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_palette_wraps() {
        let theme = Theme::dark();
        let n = theme.series.len();
        assert_eq!(theme.series_color(0), theme.series_color(n));
        assert_ne!(theme.series_color(0), theme.series_color(1));
    }

    #[test]
    fn test_down_is_emphasised() {
        let theme = Theme::light();
        let style = theme.status_style(StatusClass::Down);
        assert_eq!(style.fg, Some(Color::Red));
        assert!(style.add_modifier.contains(Modifier::BOLD));
    }
}
