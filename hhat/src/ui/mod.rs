pub mod components;
pub mod layouts;
pub mod screens;
pub mod theme;

use crate::state::AppState;
use ratatui::{
    layout::Rect,
    widgets::{Paragraph, Wrap},
    Frame,
};
use screens::*;

/// Pure render dispatcher - routes to appropriate screen renderer
/// This function is read-only and never mutates state
pub fn render_app(f: &mut Frame, state: &AppState) {
    match state.current_screen() {
        Screen::SystemLogin(login_state) => system_login_screen::render(f, login_state),
        Screen::OAuth(oauth_state) => oauth_screen::render(f, oauth_state),
        Screen::TokenDisplay(display_state) => token_display_screen::render(f, display_state),
    }

    if let Some(error) = &state.storage_error {
        render_storage_error(f, error);
    }

    // Render help popup on top if visible
    if state.help_visible {
        components::help_popup::render_help_popup(f, state.current_screen());
    }
}

/// One line over the top margin so it does not cover the screen
fn render_storage_error(f: &mut Frame, error: &str) {
    let area = f.area();
    let line = Rect {
        height: 1.min(area.height),
        ..area
    };
    f.render_widget(
        Paragraph::new(error)
            .style(theme::error_style())
            .wrap(Wrap { trim: true }),
        line,
    );
}
