mod models;

use chrono::Utc;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::time::Duration;

use crate::client::config::{Settings, REDIRECT_URI};
use crate::common::{TokenRecord, TokenResponse};
use crate::error::AuthError;
use models::{AuthorizationCodeGrant, RefreshTokenGrant};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client for the hh.ru token endpoint
pub struct TokenClient {
    http_client: Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
}

impl TokenClient {
    pub fn new(settings: &Settings) -> Result<Self, AuthError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            token_url: settings.token_url.clone(),
            client_id: settings.client_id.clone(),
            client_secret: SecretString::from(settings.client_secret.expose_secret().to_string()),
        })
    }

    /// Trade an authorization code for a token
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, AuthError> {
        let form = AuthorizationCodeGrant::new(
            &self.client_id,
            self.client_secret.expose_secret(),
            code,
            REDIRECT_URI,
        );
        let token = self.request_token(&form).await?;

        tracing::info!(
            access_token = %token.access_token_hint(),
            expires_in = token.expires_in,
            "Exchanged authorization code for token"
        );
        Ok(token)
    }

    /// Trade a refresh token for a new token
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord, AuthError> {
        let token = self
            .request_token(&RefreshTokenGrant::new(refresh_token))
            .await?;

        tracing::info!(expires_in = token.expires_in, "Refreshed token");
        Ok(token)
    }

    async fn request_token<F: Serialize + ?Sized>(&self, form: &F) -> Result<TokenRecord, AuthError> {
        let resp = self
            .http_client
            .post(&self.token_url)
            .form(form)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token endpoint rejected the request");
            return Err(AuthError::TokenExchangeFailed {
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await?;
        let response: TokenResponse = serde_json::from_slice(&body)?;

        Ok(TokenRecord::issued_at(response, Utc::now()))
    }
}
