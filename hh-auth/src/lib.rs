// Types shared between the popup and the background
pub mod common;

pub mod client;
mod error;

pub use client::{
    load_settings, AuthorizationFlow, Background, BrowserHost, ExternalBrowser, ListenerId, LocalStore,
    Settings, SystemApi, TabId, TokenClient, WindowHost, WindowId, WindowSession, REDIRECT_URI,
};
pub use common::{Message, Response, TokenRecord, TokenResponse};
pub use error::AuthError;
