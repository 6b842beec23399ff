pub mod background;
pub mod browser;
pub mod capture;
mod config;
pub mod flow;
pub mod local_store;
mod system_api;
mod token_client;
pub mod window;

pub use background::Background;
pub use browser::{BrowserHost, ExternalBrowser, ListenerId, TabId, WindowHost, WindowId};
pub use config::{Settings, REDIRECT_URI};
pub use flow::AuthorizationFlow;
pub use local_store::LocalStore;
pub use system_api::SystemApi;
pub use token_client::TokenClient;
pub use window::WindowSession;

use crate::error::AuthError;

/// Load and validate settings before the popup starts
pub fn load_settings() -> Result<Settings, AuthError> {
    let settings = Settings::new().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("\nConfiguration is read from hhat.toml (or $HHAT_CONFIG) and HHAT__* variables,");
        eprintln!("for example:");
        eprintln!("\nclient_id = \"...\"");
        eprintln!("token_url = \"https://hh.ru/oauth/token\"");
        AuthError::Configuration(e.to_string())
    })?;

    settings.validate().map_err(|e| {
        eprintln!("Configuration validation failed: {}", e);
        AuthError::Configuration(e)
    })?;

    Ok(settings)
}
