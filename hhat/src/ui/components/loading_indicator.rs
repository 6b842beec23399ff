use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Span,
    widgets::Paragraph,
    Frame,
};
use throbber_widgets_tui::{Throbber, ThrobberState, BRAILLE_EIGHT};

use crate::state::LoadingState;
use crate::ui::theme;

/// Render a loading indicator in the top-right corner
/// Shows current loading state with color coding
pub fn render_loading_indicator(f: &mut Frame, area: Rect, loading_state: &LoadingState) {
    let (text, color) = match loading_state {
        LoadingState::NotStarted => return,
        LoadingState::Loading(throbber_state) => {
            render_throbber(f, area, throbber_state, None);
            return;
        }
        LoadingState::Loaded => ("✓", Color::Green),
        LoadingState::Error(_) => ("x", Color::Red),
    };

    let indicator =
        Paragraph::new(Span::styled(text, Style::default().fg(color))).alignment(Alignment::Right);

    f.render_widget(indicator, area);
}

/// Spinner with an optional label next to it
pub fn render_throbber(f: &mut Frame, area: Rect, throbber_state: &ThrobberState, label: Option<&str>) {
    let mut throbber = Throbber::default()
        .throbber_set(BRAILLE_EIGHT)
        .style(theme::loading_style());
    if let Some(label) = label {
        throbber = throbber.label(label.to_string());
    }
    f.render_stateful_widget(throbber, area, &mut throbber_state.clone());
}
