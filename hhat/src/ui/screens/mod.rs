pub mod oauth_screen;
pub mod system_login_screen;
pub mod token_display_screen;

use crate::state::{OAuthState, ScreenKind, SystemLoginState, TokenDisplayState};

#[derive(Debug, Clone)]
pub enum Screen {
    SystemLogin(SystemLoginState),
    OAuth(OAuthState),
    TokenDisplay(TokenDisplayState),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::SystemLogin(_) => ScreenKind::SystemLogin,
            Screen::OAuth(_) => ScreenKind::OAuth,
            Screen::TokenDisplay(_) => ScreenKind::TokenDisplay,
        }
    }
}
