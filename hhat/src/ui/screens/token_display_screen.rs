use chrono::{Local, Utc};
use hh_auth::TokenRecord;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::state::TokenDisplayState;
use crate::ui::{components::help_bar, layouts, theme};

pub fn render(f: &mut Frame, state: &TokenDisplayState) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    f.render_widget(
        Paragraph::new("HH tokens").style(theme::title_style()),
        title_area,
    );
    render_content(f, content_area, &state.token);
    help_bar::render_help_bar(f, help_area, "Enter: continue  ?: help  q: quit");
}

fn render_content(f: &mut Frame, area: Rect, token: &TokenRecord) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(theme::BUTTON_HEIGHT)])
        .split(area);

    let details = Paragraph::new(token_lines(token))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::info_border_style())
                .title("Received tokens"),
        );
    f.render_widget(details, chunks[0]);

    let button = Paragraph::new("Continue")
        .alignment(Alignment::Center)
        .style(theme::button_style(true))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(button, layouts::centered_width(16, chunks[1]));
}

fn token_lines(token: &TokenRecord) -> Vec<Line<'static>> {
    let created_at = token.created_at.with_timezone(&Local);
    let expires_at = token
        .expires_at()
        .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let expiry_note = if token.is_expired(Utc::now()) {
        Span::styled(" (expired)", theme::error_style())
    } else {
        Span::raw("")
    };

    vec![
        field("Access token", token.access_token.clone()),
        field("Refresh token", token.refresh_token.clone()),
        Line::from(vec![
            Span::styled(format!("{:15}", "Expires in"), theme::header_style()),
            Span::raw(format!("{} s, until {}", token.expires_in, expires_at)),
            expiry_note,
        ]),
        field(
            "Created at",
            created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        field("Token type", token.token_type.clone()),
    ]
}

fn field(label: &'static str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:15}", label), theme::header_style()),
        Span::raw(value),
    ])
}
