use std::sync::Arc;
use url::Url;

use super::browser::{BrowserHost, RedirectDetails, RequestFilter, TabId, UrlPattern};
use super::capture::{RedirectCapture, Terminal};
use super::config::{Settings, REDIRECT_URI};
use super::token_client::TokenClient;
use crate::common::TokenRecord;
use crate::error::AuthError;

/// OAuth authorization-code flow driven through a [`BrowserHost`]
///
/// Each call to [`AuthorizationFlow::begin_authorization`] opens its own tab
/// and tracks only that tab. Concurrent calls are not deduplicated.
pub struct AuthorizationFlow<H> {
    host: Arc<H>,
    token_client: TokenClient,
    authorize_url: String,
    client_id: String,
    redirect_filter: UrlPattern,
}

impl<H: BrowserHost + 'static> AuthorizationFlow<H> {
    pub fn new(host: Arc<H>, settings: &Settings) -> Result<Self, AuthError> {
        Ok(Self {
            host,
            token_client: TokenClient::new(settings)?,
            authorize_url: settings.authorize_url.clone(),
            client_id: settings.client_id.clone(),
            redirect_filter: UrlPattern::parse(&settings.redirect_filter)?,
        })
    }

    pub fn authorization_url(&self) -> Result<Url, AuthError> {
        let mut url = Url::parse(&self.authorize_url)?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("response_type", "code");
        Ok(url)
    }

    /// Open the authorization page, capture the code and exchange it.
    /// Storage is left to the caller.
    pub async fn begin_authorization(&self) -> Result<TokenRecord, AuthError> {
        let code = self.capture_code().await?;
        self.token_client.exchange_code(&code).await
    }

    /// Open the authorization page and wait for the callback redirect.
    ///
    /// There is no timeout: the attempt ends on the callback redirect or when
    /// the tab is closed.
    pub async fn capture_code(&self) -> Result<String, AuthError> {
        let url = self.authorization_url()?;
        tracing::info!(url = %url, "Opening authorization page");

        let tab_id = self
            .host
            .create_tab(&url, true)
            .await?
            .ok_or(AuthError::TabCreationFailed)?;

        let (capture, outcome) = RedirectCapture::new(tab_id, REDIRECT_URI);
        let capture = Arc::new(capture);

        let filter = RequestFilter {
            urls: vec![self.redirect_filter.clone()],
            tab_id: Some(tab_id),
        };
        let redirect_id = {
            let capture = capture.clone();
            self.host.add_redirect_listener(
                filter,
                Arc::new(move |details: &RedirectDetails| capture.on_redirect(details)),
            )
        };
        let removed_id = {
            let capture = capture.clone();
            self.host
                .add_tab_removed_listener(Arc::new(move |closed: TabId| capture.on_tab_removed(closed)))
        };

        let host = self.host.clone();
        capture.install_cleanup(move || {
            host.remove_redirect_listener(redirect_id);
            host.remove_tab_removed_listener(removed_id);
            tracing::debug!(tab_id, "Authorization listeners removed");
        });

        // Listeners go away even if the caller stops waiting
        let _guard = CleanupOnDrop(capture.clone());

        let terminal = outcome.await.map_err(|_| AuthError::UserCancelled)?;

        if terminal.closes_tab() {
            if let Err(e) = self.host.remove_tab(tab_id).await {
                tracing::debug!(tab_id, "Failed to close authorization tab: {}", e);
            }
        }

        match terminal {
            Terminal::Code(code) => Ok(code),
            Terminal::CodeMissing => {
                tracing::warn!(tab_id, "Callback redirect carried no code");
                Err(AuthError::CodeMissing)
            }
            Terminal::Cancelled => {
                tracing::info!(tab_id, "Authorization tab closed by user");
                Err(AuthError::UserCancelled)
            }
        }
    }
}

struct CleanupOnDrop(Arc<RedirectCapture>);

impl Drop for CleanupOnDrop {
    fn drop(&mut self) {
        self.0.cleanup();
    }
}
