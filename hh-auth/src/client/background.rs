use std::sync::Arc;
use tokio::sync::Mutex;

use super::browser::{BrowserHost, WindowHost, WindowId};
use super::config::Settings;
use super::flow::AuthorizationFlow;
use super::local_store::LocalStore;
use super::window::WindowSession;
use crate::common::{Message, Response, TokenRecord};
use crate::error::AuthError;

pub const POPUP_URL: &str = "hhat://popup";

/// Answers the popup's messages: opens the popup window and runs the
/// authorization flow, persisting the token it yields
pub struct Background<H> {
    host: Arc<H>,
    flow: AuthorizationFlow<H>,
    store: Arc<LocalStore>,
    window: Mutex<WindowSession>,
}

impl<H: BrowserHost + WindowHost + 'static> Background<H> {
    pub fn new(host: Arc<H>, settings: &Settings, store: Arc<LocalStore>) -> Result<Self, AuthError> {
        Ok(Self {
            flow: AuthorizationFlow::new(host.clone(), settings)?,
            host,
            store,
            window: Mutex::new(WindowSession::new()),
        })
    }

    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    pub async fn handle(&self, message: Message) -> Response {
        match message {
            Message::Open => match self.open_window().await {
                Ok(_) => Response::ok(),
                Err(e) => {
                    tracing::error!("Failed to open popup window: {}", e);
                    Response::error(e.to_string())
                }
            },
            Message::Oauth => match self.authorize().await {
                Ok(token) => Response::token(token),
                Err(e) => {
                    tracing::error!("Authorization failed: {}", e);
                    Response::error(e.to_string())
                }
            },
        }
    }

    pub async fn open_window(&self) -> Result<WindowId, AuthError> {
        self.window
            .lock()
            .await
            .open_or_focus(self.host.as_ref(), POPUP_URL)
            .await
    }

    pub async fn on_window_removed(&self, id: WindowId) {
        self.window.lock().await.on_window_removed(id);
    }

    pub async fn window_id(&self) -> Option<WindowId> {
        self.window.lock().await.window_id()
    }

    async fn authorize(&self) -> Result<TokenRecord, AuthError> {
        let token = self.flow.begin_authorization().await?;
        self.store.set_token(&token)?;
        tracing::info!(access_token = %token.access_token_hint(), "Token stored");
        Ok(token)
    }
}
