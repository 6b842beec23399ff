use ratatui::{
    prelude::*,
    widgets::{List, ListItem},
    Frame,
};

use crate::ui::{layouts, screens::Screen, theme};

pub fn render_help_popup(f: &mut Frame, screen: &Screen) {
    let help_items = get_help_items(screen);

    let inner = super::popup::render_popup_frame(
        f,
        f.area(),
        layouts::popup_sizes::LARGE,
        " Help (press ?, F1 or Esc to close) ",
        theme::accent_border_style(),
    );

    let items: Vec<ListItem> = help_items
        .iter()
        .map(|(key, description)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:15}", key), theme::header_style()),
                Span::raw(*description),
            ]))
        })
        .collect();

    let list = List::new(items).style(Style::default().fg(Color::White));

    f.render_widget(list, inner);
}

fn get_help_items(screen: &Screen) -> Vec<(&'static str, &'static str)> {
    let mut items = vec![];

    match screen {
        Screen::SystemLogin(_) => {
            items.push(("Type/paste", "Enter the system authorization token"));
            items.push(("Enter", "Sign in"));
            items.push(("Esc/Ctrl-U", "Clear the field"));
        }
        Screen::OAuth(state) => {
            if state.prompt.is_some() {
                items.push(("Type/paste", "URL the browser was sent to after login"));
                items.push(("Enter", "Submit the redirect URL"));
                items.push(("Esc", "Close the authorization tab (cancel)"));
            } else {
                items.push(("Enter/g", "Get HH tokens"));
            }
        }
        Screen::TokenDisplay(_) => {
            items.push(("Enter/c", "Continue (forget the shown token)"));
        }
    }

    items.push(("", ""));
    items.push(("--- Global ---", ""));
    items.push(("?/F1", "Toggle this help (F1 inside text fields)"));
    items.push(("q", "Quit application"));
    items.push(("Ctrl-C", "Quit from anywhere"));

    items
}
