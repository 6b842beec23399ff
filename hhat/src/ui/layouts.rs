//! Reusable layout builders for consistent screen structure.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::theme::{HELP_BAR_HEIGHT, SCREEN_MARGIN, TITLE_HEIGHT};

/// Standard screen layout with title, content area, and help bar.
///
/// Returns a tuple of (title_area, content_area, help_area)
pub fn screen_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(SCREEN_MARGIN)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(6),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Split a title area into title text and loading indicator.
///
/// Returns (title_text_area, loading_indicator_area)
pub fn title_with_loading(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    (chunks[0], chunks[1])
}

/// Stack fixed-height rows from the top of `area`; the rest is left over.
pub fn stack(area: Rect, heights: &[u16]) -> Vec<Rect> {
    let mut constraints: Vec<Constraint> = heights.iter().map(|h| Constraint::Length(*h)).collect();
    constraints.push(Constraint::Min(0));

    let mut rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec();
    rows.pop();
    rows
}

/// Center a rectangle of fixed width inside `area`.
pub fn centered_width(width: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Create a centered popup rectangle.
///
/// # Arguments
/// * `percent_x` - Width as percentage of parent (0-100)
/// * `percent_y` - Height as percentage of parent (0-100)
/// * `area` - The parent area to center within
pub fn centered_popup(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}

/// Standard popup sizes
pub mod popup_sizes {
    /// Large popup (80% x 80%) - for help screens
    pub const LARGE: (u16, u16) = (80, 80);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_heights() {
        let rows = stack(Rect::new(0, 0, 40, 20), &[3, 2, 3]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], Rect::new(0, 0, 40, 3));
        assert_eq!(rows[1], Rect::new(0, 3, 40, 2));
        assert_eq!(rows[2], Rect::new(0, 5, 40, 3));
    }

    #[test]
    fn test_centered_width() {
        assert_eq!(centered_width(20, Rect::new(0, 5, 40, 3)), Rect::new(10, 5, 20, 3));
        assert_eq!(centered_width(60, Rect::new(2, 0, 40, 3)), Rect::new(2, 0, 40, 3));
    }
}
