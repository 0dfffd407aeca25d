use std::ops::Range;

use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Produce a rectangle centered within `area` that spans the requested
/// percent of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Card body row: dimmed label, plain value.
pub(crate) fn labeled_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value.to_string()),
    ])
}

/// Window of rows to render so the selected card stays visible. `capacity`
/// is how many cards fit in the viewport.
pub(crate) fn visible_range(selected: usize, capacity: usize, len: usize) -> Range<usize> {
    if len == 0 || capacity == 0 {
        return 0..0;
    }
    let start = if selected >= capacity {
        selected + 1 - capacity
    } else {
        0
    };
    let end = (start + capacity).min(len);
    start..end
}

#[cfg(test)]
mod tests {
    use super::visible_range;

    #[test]
    fn window_tracks_selection() {
        assert_eq!(visible_range(0, 3, 10), 0..3);
        assert_eq!(visible_range(2, 3, 10), 0..3);
        assert_eq!(visible_range(5, 3, 10), 3..6);
        assert_eq!(visible_range(9, 3, 10), 7..10);
    }

    #[test]
    fn window_handles_degenerate_sizes() {
        assert_eq!(visible_range(0, 3, 0), 0..0);
        assert_eq!(visible_range(0, 0, 5), 0..0);
        assert_eq!(visible_range(1, 10, 2), 0..2);
    }
}
