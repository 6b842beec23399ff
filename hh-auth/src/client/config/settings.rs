use config::{Config, ConfigError, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

use crate::client::browser::UrlPattern;
use crate::error::AuthError;

/// Callback registered for the hh.ru Android client. Desktop browsers cannot
/// follow it, which is why the redirect is captured instead of served.
pub const REDIRECT_URI: &str = "hhandroid://oauthresponse";

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default = "default_client_id")]
    pub client_id: String,

    #[serde(default = "default_client_secret")]
    pub client_secret: SecretString,

    #[serde(default = "default_authorize_url")]
    pub authorize_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Match pattern for requests whose redirects are observed
    #[serde(default = "default_redirect_filter")]
    pub redirect_filter: String,

    /// Where freshly issued tokens are delivered; skipped when unset
    #[serde(default)]
    pub upload_url: Option<String>,

    /// Endpoint that validates the system token; any non-empty token is accepted when unset
    #[serde(default)]
    pub system_verify_url: Option<String>,

    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
}

fn default_client_id() -> String {
    "HIOMIAS39CA9DICTA7JIO64LQKQJF5AGIK74G9ITJKLNEDAOH5FHS5G1JI7FOEGD".to_string()
}

fn default_client_secret() -> SecretString {
    SecretString::from(
        "V9M870DE342BGHFRUJ5FTCGCUA1482AN0DI8C5TFI9ULMA89H10N60NOP8I4JMVS".to_string(),
    )
}

fn default_authorize_url() -> String {
    "https://hh.ru/oauth/authorize".to_string()
}

fn default_token_url() -> String {
    "https://hh.ru/oauth/token".to_string()
}

fn default_redirect_filter() -> String {
    "*://*.hh.ru/oauth/authorize*".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_id: default_client_id(),
            client_secret: default_client_secret(),
            authorize_url: default_authorize_url(),
            token_url: default_token_url(),
            redirect_filter: default_redirect_filter(),
            upload_url: None,
            system_verify_url: None,
            storage_dir: None,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("HHAT_CONFIG").unwrap_or_else(|_| "hhat.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("HHAT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.client_id.is_empty() {
            return Err("client_id is required".to_string());
        }
        for (name, value) in [
            ("authorize_url", Some(&self.authorize_url)),
            ("token_url", Some(&self.token_url)),
            ("upload_url", self.upload_url.as_ref()),
            ("system_verify_url", self.system_verify_url.as_ref()),
        ] {
            if let Some(value) = value {
                if !value.starts_with("http") {
                    return Err(format!("{} must be a valid HTTP(S) URL", name));
                }
            }
        }
        UrlPattern::parse(&self.redirect_filter).map_err(|e| e.to_string())?;
        Ok(())
    }

    /// Directory holding `storage.json`
    pub fn storage_dir(&self) -> Result<PathBuf, AuthError> {
        match &self.storage_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::cache_dir()
                .map(|dir| dir.join("hhat"))
                .ok_or_else(|| {
                    AuthError::Configuration("Could not find cache directory".to_string())
                }),
        }
    }
}
