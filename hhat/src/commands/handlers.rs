use crate::events::AppCommand;
use crate::input::{Key, KeyEvent};
use crate::state::{AppState, OAuthState};
use crate::ui::screens::Screen;

/// Map user input (KeyEvent) to AppCommand based on current UI state
/// Returns None if the key should be ignored
pub fn handle_key_input(event: KeyEvent, state: &AppState) -> Option<AppCommand> {
    let key = event.key;

    // Priority 0: Ctrl-C quits from anywhere, including text fields
    if event.modifiers.ctrl {
        return match key {
            Key::Char('c') => Some(AppCommand::Quit),
            Key::Char('u') if state.active_input().is_some() => Some(AppCommand::ClearInput),
            _ => None,
        };
    }

    // F1 works even while a text field has the keyboard
    if key == Key::F1 {
        return Some(AppCommand::ToggleHelp);
    }

    // Priority 1: Help popup
    if state.help_visible {
        return match key {
            Key::Char('?') | Key::Esc => Some(AppCommand::ToggleHelp),
            Key::Char('q') => Some(AppCommand::Quit),
            _ => None,
        };
    }

    match state.current_screen() {
        Screen::SystemLogin(_) => match key {
            Key::Enter => Some(AppCommand::SubmitSystemLogin),
            Key::Esc => Some(AppCommand::ClearInput),
            _ => handle_text_keys(key),
        },
        Screen::OAuth(oauth_state) => handle_oauth_keys(key, oauth_state),
        Screen::TokenDisplay(_) => match key {
            Key::Enter | Key::Char('c') => Some(AppCommand::ContinueFromTokenDisplay),
            Key::Char('?') => Some(AppCommand::ToggleHelp),
            Key::Char('q') | Key::Esc => Some(AppCommand::Quit),
            _ => None,
        },
    }
}

/// Pasted text goes to whichever field is active
pub fn handle_paste(text: String, state: &AppState) -> Option<AppCommand> {
    if state.help_visible || state.active_input().is_none() {
        return None;
    }
    Some(AppCommand::AppendInput(text))
}

fn handle_oauth_keys(key: Key, oauth_state: &OAuthState) -> Option<AppCommand> {
    // The redirect prompt owns the keyboard while an attempt is waiting
    if oauth_state.prompt.is_some() {
        return match key {
            Key::Enter => Some(AppCommand::SubmitRedirect),
            Key::Esc => Some(AppCommand::CloseAuthorizationTab),
            _ => handle_text_keys(key),
        };
    }

    match key {
        Key::Enter | Key::Char('g') if !oauth_state.view.is_busy() => {
            Some(AppCommand::StartAuthorization)
        }
        Key::Char('?') => Some(AppCommand::ToggleHelp),
        Key::Char('q') | Key::Esc => Some(AppCommand::Quit),
        _ => None,
    }
}

fn handle_text_keys(key: Key) -> Option<AppCommand> {
    match key {
        Key::Backspace | Key::Delete => Some(AppCommand::DeleteInputChar),
        Key::Char('\0') => None,
        Key::Char(c) => Some(AppCommand::AppendInput(c.to_string())),
        _ => None,
    }
}
