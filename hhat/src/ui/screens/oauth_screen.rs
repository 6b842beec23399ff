use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::state::{OAuthState, OAuthView, RedirectPrompt};
use crate::ui::{
    components::{help_bar, loading_indicator, text_input},
    layouts, theme,
};

const BUTTON_WIDTH: u16 = 24;

pub fn render(f: &mut Frame, state: &OAuthState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    render_title(f, title_area, &state.view);
    render_content(f, content_area, state);

    let help = if state.prompt.is_some() {
        "Enter: submit redirect  Esc: cancel  F1: help  Ctrl-C: quit"
    } else {
        "Enter: get tokens  ?: help  q: quit"
    };
    help_bar::render_help_bar(f, help_area, help);
}

fn render_title(f: &mut Frame, area: Rect, view: &OAuthView) {
    let (title_area, indicator_area) = layouts::title_with_loading(area);
    f.render_widget(
        Paragraph::new("HH authorization").style(theme::title_style()),
        title_area,
    );
    if let OAuthView::Loading(throbber_state) | OAuthView::Sending(throbber_state) = view {
        loading_indicator::render_throbber(f, indicator_area, throbber_state, None);
    }
}

fn render_content(f: &mut Frame, area: Rect, state: &OAuthState) {
    let rows = layouts::stack(area, &[theme::BUTTON_HEIGHT, theme::STATUS_HEIGHT]);

    render_button(f, rows[0], &state.view);
    render_status(f, rows[1], &state.view);

    if let Some(prompt) = &state.prompt {
        let rest = Rect {
            y: rows[1].bottom(),
            height: area.bottom().saturating_sub(rows[1].bottom()),
            ..area
        };
        render_prompt(f, rest, prompt);
    }
}

fn render_button(f: &mut Frame, area: Rect, view: &OAuthView) {
    let enabled = !view.is_busy();
    let button = Paragraph::new(view.button_label())
        .alignment(Alignment::Center)
        .style(theme::button_style(enabled))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, layouts::centered_width(BUTTON_WIDTH, area));
}

fn render_status(f: &mut Frame, area: Rect, view: &OAuthView) {
    match view {
        OAuthView::Idle => {}
        OAuthView::Loading(throbber_state) => {
            loading_indicator::render_throbber(
                f,
                area,
                throbber_state,
                Some("Waiting for authorization..."),
            );
        }
        OAuthView::Sending(throbber_state) => {
            loading_indicator::render_throbber(f, area, throbber_state, Some("Sending tokens..."));
        }
        OAuthView::Done(token) => {
            let line = Line::from(vec![
                Span::styled("Tokens received ", theme::success_style()),
                Span::styled(
                    format!("({})", token.access_token_hint()),
                    theme::help_text_style(),
                ),
            ]);
            f.render_widget(Paragraph::new(line), area);
        }
        OAuthView::Error(error) => {
            f.render_widget(
                Paragraph::new(format!("Error: {}", error))
                    .style(theme::error_style())
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
    }
}

fn render_prompt(f: &mut Frame, area: Rect, prompt: &RedirectPrompt) {
    let rows = layouts::stack(area, &[1, 4, theme::INPUT_HEIGHT]);

    f.render_widget(
        Paragraph::new("The authorization page was opened in your browser. If it did not open, visit:")
            .style(theme::help_text_style()),
        rows[0],
    );
    f.render_widget(
        Paragraph::new(prompt.authorize_url.as_str())
            .style(theme::header_style())
            .wrap(Wrap { trim: false }),
        rows[1],
    );
    text_input::render_text_input(
        f,
        rows[2],
        "Paste the hhandroid://oauthresponse URL you were redirected to",
        &prompt.input,
        false,
    );
}
