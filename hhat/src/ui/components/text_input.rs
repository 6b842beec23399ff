//! Single-line text input with a visible cursor.

use ratatui::prelude::Rect;
use ratatui::{
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

/// Render `value` in a bordered field and place the terminal cursor after it.
///
/// Values wider than the field scroll so the end stays visible. With `masked`
/// every character is drawn as `•`.
pub fn render_text_input(f: &mut Frame, area: Rect, title: &str, value: &str, masked: bool) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let shown = visible_tail(value, inner_width.saturating_sub(1));
    let text = if masked {
        "•".repeat(shown.chars().count())
    } else {
        shown.to_string()
    };

    let input = Paragraph::new(text.clone())
        .style(theme::input_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::accent_border_style())
                .title(title),
        );
    f.render_widget(input, area);

    let cursor_x = area.x + 1 + text.chars().count() as u16;
    f.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
}

/// Last `width` characters of `value`
pub fn visible_tail(value: &str, width: usize) -> &str {
    let count = value.chars().count();
    if count <= width {
        return value;
    }
    let skip = count - width;
    let start = value
        .char_indices()
        .nth(skip)
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    &value[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_tail() {
        assert_eq!(visible_tail("abc", 5), "abc");
        assert_eq!(visible_tail("abcdef", 3), "def");
        assert_eq!(visible_tail("тестовый", 3), "вый");
        assert_eq!(visible_tail("abc", 0), "");
    }
}
