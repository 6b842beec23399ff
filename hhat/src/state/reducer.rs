use throbber_widgets_tui::ThrobberState;

use super::{AppState, LoadingState, OAuthView, RedirectPrompt};
use crate::events::DataEvent;
use crate::ui::screens::Screen;

/// Pure state transition function for data events
pub fn reduce_data_event(state: &mut AppState, event: DataEvent) {
    match event {
        DataEvent::FlagsLoaded(flags) => {
            state.storage_error = None;
            state.apply_flags(flags);
        }

        DataEvent::StorageError { error } => {
            state.storage_error = Some(error);
        }

        DataEvent::SystemLoginSucceeded => {
            if let Screen::SystemLogin(login_state) = state.current_screen_mut() {
                login_state.input.clear();
                login_state.status = LoadingState::Loaded;
            }
        }

        DataEvent::SystemLoginFailed { error } => {
            if let Screen::SystemLogin(login_state) = state.current_screen_mut() {
                login_state.status = LoadingState::Error(error);
            }
        }

        DataEvent::AuthorizationTabOpened { tab_id, url } => {
            if let Screen::OAuth(oauth_state) = state.current_screen_mut() {
                if matches!(oauth_state.view, OAuthView::Loading(_)) {
                    oauth_state.prompt = Some(RedirectPrompt::new(tab_id, url));
                }
            }
        }

        DataEvent::AuthorizationTabClosed { tab_id } => {
            if let Screen::OAuth(oauth_state) = state.current_screen_mut() {
                if oauth_state.prompt.as_ref().map(|p| p.tab_id) == Some(tab_id) {
                    oauth_state.prompt = None;
                }
            }
        }

        DataEvent::OauthResponded(response) => {
            if let Screen::OAuth(oauth_state) = state.current_screen_mut() {
                oauth_state.prompt = None;
                oauth_state.view = match response.into_result() {
                    Ok(Some(_)) => OAuthView::Sending(ThrobberState::default()),
                    Ok(None) => OAuthView::Error("Token missing from response".to_string()),
                    Err(error) => OAuthView::Error(error),
                };
            }
        }

        DataEvent::TokensDelivered { token } => {
            if let Screen::OAuth(oauth_state) = state.current_screen_mut() {
                oauth_state.view = OAuthView::Done(token);
            }
        }

        DataEvent::DeliveryFailed { error } => {
            if let Screen::OAuth(oauth_state) = state.current_screen_mut() {
                oauth_state.view = OAuthView::Error(error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::token;
    use crate::state::{ScreenKind, StoredFlags};
    use hh_auth::Response;

    fn oauth_state() -> AppState {
        let mut state = AppState::from_flags(StoredFlags {
            system_auth: true,
            ..Default::default()
        });
        if let Screen::OAuth(oauth) = state.current_screen_mut() {
            oauth.view = OAuthView::Loading(ThrobberState::default());
        }
        state
    }

    fn oauth(state: &AppState) -> &crate::state::OAuthState {
        let Screen::OAuth(oauth) = state.current_screen() else {
            panic!("Expected OAuth screen");
        };
        oauth
    }

    #[test]
    fn test_tab_opened_shows_prompt_only_while_loading() {
        let mut state = oauth_state();
        reduce_data_event(
            &mut state,
            DataEvent::AuthorizationTabOpened {
                tab_id: 4,
                url: "https://hh.ru/oauth/authorize?client_id=x".to_string(),
            },
        );
        assert_eq!(oauth(&state).prompt.as_ref().map(|p| p.tab_id), Some(4));

        let mut idle = AppState::from_flags(StoredFlags {
            system_auth: true,
            ..Default::default()
        });
        reduce_data_event(
            &mut idle,
            DataEvent::AuthorizationTabOpened {
                tab_id: 4,
                url: String::new(),
            },
        );
        assert!(oauth(&idle).prompt.is_none());
    }

    #[test]
    fn test_tab_closed_hides_matching_prompt() {
        let mut state = oauth_state();
        reduce_data_event(
            &mut state,
            DataEvent::AuthorizationTabOpened {
                tab_id: 4,
                url: String::new(),
            },
        );

        reduce_data_event(&mut state, DataEvent::AuthorizationTabClosed { tab_id: 5 });
        assert!(oauth(&state).prompt.is_some());

        reduce_data_event(&mut state, DataEvent::AuthorizationTabClosed { tab_id: 4 });
        assert!(oauth(&state).prompt.is_none());
    }

    #[test]
    fn test_successful_oauth_moves_to_sending() {
        let mut state = oauth_state();
        reduce_data_event(&mut state, DataEvent::OauthResponded(Response::token(token())));
        assert!(matches!(oauth(&state).view, OAuthView::Sending(_)));

        reduce_data_event(&mut state, DataEvent::TokensDelivered { token: token() });
        assert!(matches!(oauth(&state).view, OAuthView::Done(_)));
    }

    #[test]
    fn test_failed_oauth_shows_error() {
        let mut state = oauth_state();
        reduce_data_event(
            &mut state,
            DataEvent::OauthResponded(Response::error("Auth window closed")),
        );
        match &oauth(&state).view {
            OAuthView::Error(msg) => assert_eq!(msg, "Auth window closed"),
            other => panic!("Expected Error view, got {:?}", other),
        }
    }

    #[test]
    fn test_delivery_failure_shows_error() {
        let mut state = oauth_state();
        reduce_data_event(&mut state, DataEvent::OauthResponded(Response::token(token())));
        reduce_data_event(
            &mut state,
            DataEvent::DeliveryFailed {
                error: "Token upload failed: HTTP 502".to_string(),
            },
        );
        assert!(matches!(oauth(&state).view, OAuthView::Error(ref msg) if msg.contains("502")));
    }

    #[test]
    fn test_login_events() {
        let mut state = AppState::new();
        if let Screen::SystemLogin(login) = state.current_screen_mut() {
            login.input = "sys".to_string();
            login.status = LoadingState::Loading(ThrobberState::default());
        }

        reduce_data_event(
            &mut state,
            DataEvent::SystemLoginFailed {
                error: "System authorization rejected: HTTP 401".to_string(),
            },
        );
        let Screen::SystemLogin(login) = state.current_screen() else {
            panic!("Expected SystemLogin screen");
        };
        assert!(matches!(login.status, LoadingState::Error(_)));
        assert_eq!(login.input, "sys");

        reduce_data_event(&mut state, DataEvent::SystemLoginSucceeded);
        reduce_data_event(
            &mut state,
            DataEvent::FlagsLoaded(StoredFlags {
                system_auth: true,
                ..Default::default()
            }),
        );
        assert_eq!(state.current_screen().kind(), ScreenKind::OAuth);
    }

    #[test]
    fn test_storage_error_cleared_by_next_load() {
        let mut state = AppState::new();
        reduce_data_event(
            &mut state,
            DataEvent::StorageError {
                error: "Storage unavailable: disk full".to_string(),
            },
        );
        assert!(state.storage_error.is_some());

        reduce_data_event(&mut state, DataEvent::FlagsLoaded(StoredFlags::default()));
        assert!(state.storage_error.is_none());
    }
}
