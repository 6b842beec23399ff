use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::state::{LoadingState, SystemLoginState};
use crate::ui::{
    components::{help_bar, loading_indicator, screen_title, text_input},
    layouts, theme,
};

pub fn render(f: &mut Frame, state: &SystemLoginState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    screen_title::render_screen_title(f, title_area, "System login", &state.status);
    render_content(f, content_area, state);
    help_bar::render_help_bar(f, help_area, help_bar::HELP_TEXT_INPUT);
}

fn render_content(f: &mut Frame, area: Rect, state: &SystemLoginState) {
    let rows = layouts::stack(area, &[3, theme::INPUT_HEIGHT, theme::STATUS_HEIGHT]);

    let intro = Paragraph::new("Enter the authorization token issued by the system to continue.")
        .wrap(Wrap { trim: true });
    f.render_widget(intro, rows[0]);

    text_input::render_text_input(f, rows[1], "Authorization token", &state.input, true);

    match &state.status {
        LoadingState::NotStarted => {}
        LoadingState::Loading(throbber_state) => {
            loading_indicator::render_throbber(f, rows[2], throbber_state, Some("Checking token..."));
        }
        LoadingState::Loaded => {
            f.render_widget(
                Paragraph::new("Signed in").style(theme::success_style()),
                rows[2],
            );
        }
        LoadingState::Error(error) => {
            f.render_widget(
                Paragraph::new(error.as_str())
                    .style(theme::error_style())
                    .wrap(Wrap { trim: true }),
                rows[2],
            );
        }
    }
}
