use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::client::config::Settings;
use crate::client::local_store::LocalStore;
use crate::common::TokenRecord;
use crate::error::AuthError;

/// Body posted to the upload endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    system_token: &'a str,
    access_token: &'a str,
    refresh_token: &'a str,
    expires_in: i64,
    created_at: i64,
}

/// The service the popup logs into, and which receives issued tokens
pub struct SystemApi {
    http_client: Client,
    verify_url: Option<String>,
    upload_url: Option<String>,
}

impl SystemApi {
    pub fn new(settings: &Settings) -> Result<Self, AuthError> {
        let http_client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http_client,
            verify_url: settings.system_verify_url.clone(),
            upload_url: settings.upload_url.clone(),
        })
    }

    pub async fn verify(&self, system_token: &str) -> Result<(), AuthError> {
        let system_token = system_token.trim();
        if system_token.is_empty() {
            return Err(AuthError::SystemAuthRejected(
                "enter the authorization token".to_string(),
            ));
        }

        let Some(url) = &self.verify_url else {
            tracing::debug!("No verify endpoint configured, accepting system token");
            return Ok(());
        };

        let status = self
            .http_client
            .get(url)
            .bearer_auth(system_token)
            .send()
            .await?
            .status();
        if !status.is_success() {
            return Err(AuthError::SystemAuthRejected(format!("HTTP {}", status.as_u16())));
        }
        Ok(())
    }

    /// Verify the system token and remember the login
    pub async fn login(&self, store: &LocalStore, system_token: &str) -> Result<(), AuthError> {
        self.verify(system_token).await?;
        store.set_system_auth(system_token.trim())?;
        tracing::info!("System login stored");
        Ok(())
    }

    /// Hand a freshly issued token to the system and switch the popup to the
    /// token display
    pub async fn deliver(&self, store: &LocalStore, token: &TokenRecord) -> Result<(), AuthError> {
        let system_token = store.system_token()?.ok_or_else(|| {
            AuthError::SystemAuthRejected("system token not found".to_string())
        })?;

        self.upload(&system_token, token).await?;
        store.set_show_token_display(true)?;
        Ok(())
    }

    async fn upload(&self, system_token: &str, token: &TokenRecord) -> Result<(), AuthError> {
        let Some(url) = &self.upload_url else {
            tracing::debug!("No upload endpoint configured, skipping token upload");
            return Ok(());
        };

        let body = UploadRequest {
            system_token,
            access_token: &token.access_token,
            refresh_token: &token.refresh_token,
            expires_in: token.expires_in,
            created_at: token.created_at.timestamp(),
        };

        let status = self
            .http_client
            .post(url)
            .bearer_auth(system_token)
            .json(&body)
            .send()
            .await?
            .status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token upload rejected");
            return Err(AuthError::UploadFailed {
                status: status.as_u16(),
            });
        }

        tracing::info!("Tokens sent successfully");
        Ok(())
    }
}
