pub mod reducer;

use hh_auth::{TabId, TokenRecord};
use throbber_widgets_tui::ThrobberState;

pub use crate::ui::screens::Screen;

/// Message shown when the system token field is submitted empty
pub const EMPTY_SYSTEM_TOKEN: &str = "enter the authorization token";

#[derive(Default, Debug, Clone)]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading(ThrobberState),
    Loaded,
    Error(String),
}

/// Persisted keys that decide which screen is shown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredFlags {
    pub system_auth: bool,
    pub token: Option<TokenRecord>,
    pub show_token_display: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    SystemLogin,
    OAuth,
    TokenDisplay,
}

impl StoredFlags {
    pub fn screen_kind(&self) -> ScreenKind {
        if !self.system_auth {
            ScreenKind::SystemLogin
        } else if self.token.is_some() && self.show_token_display {
            ScreenKind::TokenDisplay
        } else {
            ScreenKind::OAuth
        }
    }

    fn initial_screen(&self) -> Screen {
        match (self.screen_kind(), &self.token) {
            (ScreenKind::SystemLogin, _) => Screen::SystemLogin(SystemLoginState::default()),
            (ScreenKind::TokenDisplay, Some(token)) => Screen::TokenDisplay(TokenDisplayState {
                token: token.clone(),
            }),
            _ => Screen::OAuth(OAuthState::default()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemLoginState {
    pub input: String,
    pub status: LoadingState,
}

/// Progress of one `oauth` request, including the upload that follows it
#[derive(Debug, Clone, Default)]
pub enum OAuthView {
    #[default]
    Idle,
    Loading(ThrobberState),
    Sending(ThrobberState),
    Done(TokenRecord),
    Error(String),
}

impl OAuthView {
    /// The trigger is disabled while a request is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, OAuthView::Loading(_) | OAuthView::Sending(_))
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            OAuthView::Done(_) => "Refresh HH tokens",
            _ => "Get HH tokens",
        }
    }
}

/// Where the user pastes the URL the provider redirected to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPrompt {
    pub tab_id: TabId,
    pub authorize_url: String,
    pub input: String,
}

impl RedirectPrompt {
    pub fn new(tab_id: TabId, authorize_url: String) -> Self {
        Self {
            tab_id,
            authorize_url,
            input: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OAuthState {
    pub view: OAuthView,
    pub prompt: Option<RedirectPrompt>,
}

#[derive(Debug, Clone)]
pub struct TokenDisplayState {
    pub token: TokenRecord,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub flags: StoredFlags,

    // UI state
    pub help_visible: bool,
    pub storage_error: Option<String>,

    // System
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::from_flags(StoredFlags::default())
    }

    pub fn from_flags(flags: StoredFlags) -> Self {
        Self {
            screen: flags.initial_screen(),
            flags,
            help_visible: false,
            storage_error: None,
            should_quit: false,
        }
    }

    pub fn current_screen(&self) -> &Screen {
        &self.screen
    }

    pub fn current_screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// Switch screens when the flags point somewhere else.
    /// Staying on the same kind of screen keeps its in-progress state.
    pub fn apply_flags(&mut self, flags: StoredFlags) {
        if flags.screen_kind() != self.screen.kind() {
            tracing::debug!(
                "Switching screen: {:?} -> {:?}",
                self.screen.kind(),
                flags.screen_kind()
            );
            self.screen = flags.initial_screen();
            self.help_visible = false;
        }
        self.flags = flags;
    }

    /// The text field currently receiving typed or pasted input
    pub fn active_input(&self) -> Option<&String> {
        match &self.screen {
            Screen::SystemLogin(state) => Some(&state.input),
            Screen::OAuth(state) => state.prompt.as_ref().map(|p| &p.input),
            Screen::TokenDisplay(_) => None,
        }
    }

    pub fn active_input_mut(&mut self) -> Option<&mut String> {
        match &mut self.screen {
            Screen::SystemLogin(state) => Some(&mut state.input),
            Screen::OAuth(state) => state.prompt.as_mut().map(|p| &mut p.input),
            Screen::TokenDisplay(_) => None,
        }
    }

    /// Get the throbber of the current screen if it is loading
    pub fn loading_state(&mut self) -> Option<&mut ThrobberState> {
        match &mut self.screen {
            Screen::SystemLogin(state) => {
                if let LoadingState::Loading(ref mut throbber_state) = state.status {
                    return Some(throbber_state);
                }
            }
            Screen::OAuth(state) => match state.view {
                OAuthView::Loading(ref mut throbber_state)
                | OAuthView::Sending(ref mut throbber_state) => return Some(throbber_state),
                _ => {}
            },
            Screen::TokenDisplay(_) => {}
        }
        None
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
