//! Centralized theme constants and style functions for consistent UI styling.

use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// Colors
// =============================================================================

/// Color for success messages
pub const COLOR_SUCCESS: Color = Color::Green;

/// Color for error messages
pub const COLOR_ERROR: Color = Color::Red;

/// Color for field labels
pub const COLOR_HEADER: Color = Color::Yellow;

/// Color for help text and secondary information
pub const COLOR_HELP_TEXT: Color = Color::Gray;

/// Color for screen titles and accent text
pub const COLOR_TITLE: Color = Color::Cyan;

/// Color for loading/status messages
pub const COLOR_LOADING: Color = Color::Yellow;

/// Border color for informational popups
pub const COLOR_BORDER_INFO: Color = Color::Blue;

/// Border color for accent/highlighted elements
pub const COLOR_BORDER_ACCENT: Color = Color::Cyan;

/// Color for input fields when focused
pub const COLOR_INPUT_FOCUSED: Color = Color::Yellow;

/// Background of an enabled button
pub const COLOR_BUTTON_BG: Color = Color::Blue;

/// Background of a disabled button
pub const COLOR_BUTTON_DISABLED_BG: Color = Color::DarkGray;

// =============================================================================
// Layout Constants
// =============================================================================

/// Standard margin around screen content
pub const SCREEN_MARGIN: u16 = 2;

/// Height of the title/header area
pub const TITLE_HEIGHT: u16 = 1;

/// Height of the help bar at the bottom
pub const HELP_BAR_HEIGHT: u16 = 3;

/// Height of a bordered single-line input
pub const INPUT_HEIGHT: u16 = 3;

/// Height of the status line under inputs and buttons
pub const STATUS_HEIGHT: u16 = 2;

/// Height of the trigger button
pub const BUTTON_HEIGHT: u16 = 3;

// =============================================================================
// Style Functions
// =============================================================================

/// Style for field labels
pub fn header_style() -> Style {
    Style::default()
        .fg(COLOR_HEADER)
        .add_modifier(Modifier::BOLD)
}

/// Style for help bar text
pub fn help_text_style() -> Style {
    Style::default().fg(COLOR_HELP_TEXT)
}

/// Style for screen titles
pub fn title_style() -> Style {
    Style::default()
        .fg(COLOR_TITLE)
        .add_modifier(Modifier::BOLD)
}

/// Style for loading/status messages
pub fn loading_style() -> Style {
    Style::default().fg(COLOR_LOADING)
}

pub fn success_style() -> Style {
    Style::default()
        .fg(COLOR_SUCCESS)
        .add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(COLOR_ERROR)
}

/// Style for the text inside a focused input
pub fn input_style() -> Style {
    Style::default().fg(COLOR_INPUT_FOCUSED)
}

pub fn button_style(enabled: bool) -> Style {
    if enabled {
        Style::default()
            .fg(Color::White)
            .bg(COLOR_BUTTON_BG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(COLOR_HELP_TEXT)
            .bg(COLOR_BUTTON_DISABLED_BG)
    }
}

/// Style for info borders
pub fn info_border_style() -> Style {
    Style::default()
        .fg(COLOR_BORDER_INFO)
        .add_modifier(Modifier::BOLD)
}

/// Style for accent borders
pub fn accent_border_style() -> Style {
    Style::default().fg(COLOR_BORDER_ACCENT)
}
