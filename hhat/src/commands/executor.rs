use hh_auth::TabId;
use throbber_widgets_tui::ThrobberState;

use crate::background::{worker::AuthWorker, BackgroundTaskManager};
use crate::events::AppCommand;
use crate::state::*;
use crate::ui::screens::Screen;

const OAUTH_TASK: &str = "oauth";

/// Side effect requested by a command once its state change is applied
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadFlags,
    Login(String),
    Authorize,
    Navigate { tab_id: TabId, url: String },
    CloseTab(TabId),
    ClearToken,
}

/// Execute a command: update state, then spawn whatever it asks for
pub fn execute_command(
    command: AppCommand,
    state: &mut AppState,
    task_manager: &mut BackgroundTaskManager,
    worker: &AuthWorker,
) {
    // The previous attempt may still be delivering or waiting to show its tokens
    if command == AppCommand::StartAuthorization && task_manager.is_running(OAUTH_TASK) {
        tracing::debug!("Authorization task still running");
        return;
    }

    let Some(effect) = apply_command(command, state) else {
        return;
    };

    match effect {
        Effect::LoadFlags => {
            let worker = worker.clone();
            task_manager.spawn_task("flags", async move { worker.load_flags().await });
        }
        Effect::Login(system_token) => {
            let worker = worker.clone();
            task_manager.spawn_task("system_login", async move {
                worker.login(system_token).await
            });
        }
        Effect::Authorize => {
            let worker = worker.clone();
            task_manager.spawn_task(OAUTH_TASK, async move { worker.authorize().await });
        }
        Effect::Navigate { tab_id, url } => worker.navigate(tab_id, &url),
        Effect::CloseTab(tab_id) => worker.close_tab(tab_id),
        Effect::ClearToken => {
            let worker = worker.clone();
            task_manager.spawn_task("clear_token", async move { worker.clear_token().await });
        }
    }
}

/// Execute a command synchronously without side effects (for tests)
pub fn execute_command_sync(command: AppCommand, state: &mut AppState) {
    let _ = apply_command(command, state);
}

/// Apply the state change of a command and return the effect it needs
pub fn apply_command(command: AppCommand, state: &mut AppState) -> Option<Effect> {
    match command {
        AppCommand::Quit => {
            state.should_quit = true;
            None
        }
        AppCommand::ToggleHelp => {
            state.help_visible = !state.help_visible;
            None
        }

        AppCommand::AppendInput(text) => {
            if let Some(input) = state.active_input_mut() {
                input.extend(text.chars().filter(|c| !c.is_control()));
            }
            None
        }
        AppCommand::DeleteInputChar => {
            if let Some(input) = state.active_input_mut() {
                input.pop();
            }
            None
        }
        AppCommand::ClearInput => {
            if let Some(input) = state.active_input_mut() {
                input.clear();
            }
            None
        }

        AppCommand::ReloadFlags => Some(Effect::LoadFlags),

        AppCommand::SubmitSystemLogin => {
            let Screen::SystemLogin(login_state) = state.current_screen_mut() else {
                return None;
            };
            if matches!(login_state.status, LoadingState::Loading(_)) {
                return None;
            }

            let system_token = login_state.input.trim().to_string();
            if system_token.is_empty() {
                login_state.status = LoadingState::Error(EMPTY_SYSTEM_TOKEN.to_string());
                return None;
            }

            login_state.status = LoadingState::Loading(ThrobberState::default());
            Some(Effect::Login(system_token))
        }

        AppCommand::StartAuthorization => {
            let Screen::OAuth(oauth_state) = state.current_screen_mut() else {
                return None;
            };
            if oauth_state.view.is_busy() {
                tracing::debug!("Authorization already in progress");
                return None;
            }

            oauth_state.view = OAuthView::Loading(ThrobberState::default());
            oauth_state.prompt = None;
            Some(Effect::Authorize)
        }

        AppCommand::SubmitRedirect => {
            let Screen::OAuth(oauth_state) = state.current_screen_mut() else {
                return None;
            };
            let prompt = oauth_state.prompt.as_mut()?;

            let url = prompt.input.trim().to_string();
            prompt.input.clear();
            if url.is_empty() {
                return None;
            }
            Some(Effect::Navigate {
                tab_id: prompt.tab_id,
                url,
            })
        }

        AppCommand::CloseAuthorizationTab => {
            let Screen::OAuth(oauth_state) = state.current_screen() else {
                return None;
            };
            oauth_state
                .prompt
                .as_ref()
                .map(|prompt| Effect::CloseTab(prompt.tab_id))
        }

        AppCommand::ContinueFromTokenDisplay => match state.current_screen() {
            Screen::TokenDisplay(_) => Some(Effect::ClearToken),
            _ => None,
        },
    }
}
