//! Common view rendering helpers.

use quotewatch_core::Timestamp;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rectangle centered in `area` taking the given share of each axis.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Fixed-height rectangle centered in `area`.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_optional(ts: Option<&Timestamp>) -> String {
    ts.map(format_timestamp).unwrap_or_else(|| "-".to_string())
}

/// Title with a loading marker.
pub fn list_title(title: &str, loading: bool) -> String {
    if loading {
        format!("{} (loading...)", title)
    } else {
        title.to_string()
    }
}

/// First line of `text`, cut to `max` characters.
pub fn preview(text: &str, max: usize) -> String {
    let first = text.lines().next().unwrap_or("");
    let multiline = text.lines().nth(1).is_some();
    if first.chars().count() > max {
        let cut: String = first.chars().take(max.saturating_sub(1)).collect();
        format!("{}\u{2026}", cut)
    } else if multiline {
        format!("{}\u{2026}", first)
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_marks_truncation() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdefghijkl", 5), "abcd\u{2026}");
        assert_eq!(preview("one\ntwo", 10), "one\u{2026}");
    }

    #[test]
    fn centered_box_fits_small_areas() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_box(40, 3, area);
        assert_eq!(rect.width, 20);
        assert_eq!(rect.y, 1);
    }
}
