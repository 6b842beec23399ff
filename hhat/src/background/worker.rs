use hh_auth::{
    AuthError, Background, BrowserHost, ExternalBrowser, ListenerId, LocalStore, Message,
    SystemApi, TabId, WindowId,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::events::DataEvent;
use crate::state::StoredFlags;

/// Pause between "done" and switching to the token display
pub const TOKEN_DISPLAY_DELAY: Duration = Duration::from_millis(500);

/// Runs the popup's side effects and reports results as [`DataEvent`]s
#[derive(Clone)]
pub struct AuthWorker {
    pub background: Arc<Background<ExternalBrowser>>,
    pub store: Arc<LocalStore>,
    pub system_api: Arc<SystemApi>,
    pub data_tx: mpsc::UnboundedSender<DataEvent>,
}

impl AuthWorker {
    pub fn new(
        background: Arc<Background<ExternalBrowser>>,
        store: Arc<LocalStore>,
        system_api: Arc<SystemApi>,
        data_tx: mpsc::UnboundedSender<DataEvent>,
    ) -> Self {
        Self {
            background,
            store,
            system_api,
            data_tx,
        }
    }

    pub fn host(&self) -> &Arc<ExternalBrowser> {
        self.background.host()
    }

    /// Forward tab open/close notifications to the UI
    pub fn watch_tabs(&self) -> (ListenerId, ListenerId) {
        let tx = self.data_tx.clone();
        let created = self
            .host()
            .add_tab_created_listener(Arc::new(move |tab_id: TabId, url: &str| {
                let _ = tx.send(DataEvent::AuthorizationTabOpened {
                    tab_id,
                    url: url.to_string(),
                });
            }));

        let tx = self.data_tx.clone();
        let removed = self
            .host()
            .add_tab_removed_listener(Arc::new(move |tab_id: TabId| {
                let _ = tx.send(DataEvent::AuthorizationTabClosed { tab_id });
            }));

        (created, removed)
    }

    pub fn unwatch_tabs(&self, (created, removed): (ListenerId, ListenerId)) {
        self.host().remove_tab_created_listener(created);
        self.host().remove_tab_removed_listener(removed);
    }

    pub async fn open_window(&self) -> Option<WindowId> {
        let response = self.background.handle(Message::Open).await;
        if let Err(e) = response.into_result() {
            tracing::warn!("Popup window not registered: {}", e);
        }
        self.background.window_id().await
    }

    pub async fn close_window(&self) {
        if let Some(id) = self.background.window_id().await {
            self.host().remove_window(id);
            self.background.on_window_removed(id).await;
        }
    }

    pub async fn load_flags(&self) {
        match read_flags(&self.store) {
            Ok(flags) => {
                tracing::debug!(screen = ?flags.screen_kind(), "Flags loaded");
                let _ = self.data_tx.send(DataEvent::FlagsLoaded(flags));
            }
            Err(e) => {
                tracing::error!("Failed to read storage: {}", e);
                let _ = self.data_tx.send(DataEvent::StorageError {
                    error: e.to_string(),
                });
            }
        }
    }

    pub async fn login(&self, system_token: String) {
        match self.system_api.login(&self.store, &system_token).await {
            Ok(()) => {
                tracing::info!("System login succeeded");
                let _ = self.data_tx.send(DataEvent::SystemLoginSucceeded);
                self.load_flags().await;
            }
            Err(e) => {
                tracing::warn!("System login failed: {}", e);
                let _ = self.data_tx.send(DataEvent::SystemLoginFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Send `oauth` to the background, then hand the token to the system
    pub async fn authorize(&self) {
        let response = self.background.handle(Message::Oauth).await;
        let token = response.token.clone().filter(|_| response.ok);
        let _ = self.data_tx.send(DataEvent::OauthResponded(response));

        let Some(token) = token else {
            return;
        };

        match self.system_api.deliver(&self.store, &token).await {
            Ok(()) => {
                let _ = self.data_tx.send(DataEvent::TokensDelivered { token });
                tokio::time::sleep(TOKEN_DISPLAY_DELAY).await;
                self.load_flags().await;
            }
            Err(e) => {
                tracing::error!("Failed to deliver tokens: {}", e);
                let _ = self.data_tx.send(DataEvent::DeliveryFailed {
                    error: e.to_string(),
                });
            }
        }
    }

    /// Report the URL the user landed on as a redirect of the tracked tab
    pub fn navigate(&self, tab_id: TabId, url: &str) {
        tracing::debug!(tab_id, "Redirect pasted");
        self.host().navigate(tab_id, url);
    }

    pub fn close_tab(&self, tab_id: TabId) {
        self.host().close_tab(tab_id);
    }

    /// Leave the token display: forget the token and go back to the trigger
    pub async fn clear_token(&self) {
        if let Err(e) = self.store.clear_token() {
            tracing::error!("Failed to clear token: {}", e);
            let _ = self.data_tx.send(DataEvent::StorageError {
                error: e.to_string(),
            });
            return;
        }
        self.load_flags().await;
    }
}

pub fn read_flags(store: &LocalStore) -> Result<StoredFlags, AuthError> {
    Ok(StoredFlags {
        system_auth: store.system_auth()?,
        token: store.token()?,
        show_token_display: store.show_token_display()?,
    })
}
