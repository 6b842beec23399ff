//! Shared help bar component for consistent bottom navigation hints.

use ratatui::prelude::Rect;
use ratatui::{
    layout::Alignment,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

/// Render a standard help bar with the given text.
pub fn render_help_bar(f: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text)
        .style(theme::help_text_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, area);
}

/// Help text for screens that are not capturing text input
pub const HELP_TEXT_DEFAULT: &str = "Press ? for help, q to quit";

/// Help text while a text field has the keyboard
pub const HELP_TEXT_INPUT: &str = "Enter: submit  Esc: clear  F1: help  Ctrl-C: quit";
