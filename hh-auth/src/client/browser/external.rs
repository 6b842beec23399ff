use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use url::Url;

use super::{
    BrowserHost, ListenerId, ListenerRegistry, PopupOptions, RedirectDetails, RedirectListener,
    RequestFilter, TabId, TabRemovedListener, WindowHost, WindowId,
};
use crate::error::AuthError;

type Opener = Box<dyn Fn(&str) -> std::io::Result<()> + Send + Sync>;

/// Called with the id and URL of every newly opened tab
pub type TabCreatedListener = std::sync::Arc<dyn Fn(TabId, &str) + Send + Sync>;

/// Host backed by the system browser
///
/// Opening a tab launches the URL in the default browser. The browser cannot
/// report its navigations back, so whoever owns the UI feeds them in through
/// [`ExternalBrowser::navigate`] and [`ExternalBrowser::close_tab`]. A
/// navigation is reported as a redirect of the request the tab was opened with.
pub struct ExternalBrowser {
    opener: Opener,
    next_id: AtomicU64,
    tabs: Mutex<HashMap<TabId, String>>,
    windows: Mutex<HashSet<WindowId>>,
    redirect_listeners: ListenerRegistry<(RequestFilter, RedirectListener)>,
    tab_removed_listeners: ListenerRegistry<TabRemovedListener>,
    tab_created_listeners: ListenerRegistry<TabCreatedListener>,
}

impl ExternalBrowser {
    pub fn new() -> Self {
        Self::with_opener(|url| open::that(url))
    }

    pub fn with_opener<F>(opener: F) -> Self
    where
        F: Fn(&str) -> std::io::Result<()> + Send + Sync + 'static,
    {
        Self {
            opener: Box::new(opener),
            next_id: AtomicU64::new(1),
            tabs: Mutex::new(HashMap::new()),
            windows: Mutex::new(HashSet::new()),
            redirect_listeners: ListenerRegistry::new(),
            tab_removed_listeners: ListenerRegistry::new(),
            tab_created_listeners: ListenerRegistry::new(),
        }
    }

    pub fn open_tabs(&self) -> Vec<TabId> {
        let mut tabs: Vec<TabId> = self
            .tabs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        tabs.sort_unstable();
        tabs
    }

    pub fn tab_url(&self, tab_id: TabId) -> Option<String> {
        self.tabs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&tab_id)
            .cloned()
    }

    /// Report that the page in `tab_id` redirected to `destination`
    pub fn navigate(&self, tab_id: TabId, destination: &str) {
        let Some(url) = self.tab_url(tab_id) else {
            tracing::warn!(tab_id, "Navigation reported for unknown tab");
            return;
        };

        let details = RedirectDetails {
            tab_id,
            url,
            redirect_url: Some(destination.to_string()),
        };

        for (filter, listener) in self.redirect_listeners.snapshot() {
            if filter.matches(&details) {
                listener(&details);
            }
        }
    }

    /// Report that the user closed `tab_id`
    pub fn close_tab(&self, tab_id: TabId) {
        let removed = self
            .tabs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&tab_id)
            .is_some();

        if removed {
            tracing::debug!(tab_id, "Tab closed");
            for listener in self.tab_removed_listeners.snapshot() {
                listener(tab_id);
            }
        }
    }

    pub fn add_tab_created_listener(&self, listener: TabCreatedListener) -> ListenerId {
        self.tab_created_listeners.add(listener)
    }

    pub fn remove_tab_created_listener(&self, id: ListenerId) {
        self.tab_created_listeners.remove(id);
    }

    pub fn remove_window(&self, id: WindowId) {
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }

    pub fn redirect_listener_count(&self) -> usize {
        self.redirect_listeners.len()
    }

    pub fn tab_removed_listener_count(&self) -> usize {
        self.tab_removed_listeners.len()
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for ExternalBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserHost for ExternalBrowser {
    async fn create_tab(&self, url: &Url, active: bool) -> Result<Option<TabId>, AuthError> {
        if active {
            // The URL is shown in the popup as well, so a failed launch is not fatal
            if let Err(e) = (self.opener)(url.as_str()) {
                tracing::warn!("Failed to open browser automatically: {}", e);
            }
        }

        let tab_id = self.next_id();
        self.tabs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(tab_id, url.to_string());
        tracing::debug!(tab_id, "Tab created");

        for listener in self.tab_created_listeners.snapshot() {
            listener(tab_id, url.as_str());
        }

        Ok(Some(tab_id))
    }

    async fn remove_tab(&self, tab_id: TabId) -> Result<(), AuthError> {
        if self.tab_url(tab_id).is_none() {
            return Err(AuthError::Browser(format!("No tab with id: {}", tab_id)));
        }
        self.close_tab(tab_id);
        Ok(())
    }

    fn add_redirect_listener(
        &self,
        filter: RequestFilter,
        listener: RedirectListener,
    ) -> ListenerId {
        self.redirect_listeners.add((filter, listener))
    }

    fn remove_redirect_listener(&self, id: ListenerId) {
        self.redirect_listeners.remove(id);
    }

    fn add_tab_removed_listener(&self, listener: TabRemovedListener) -> ListenerId {
        self.tab_removed_listeners.add(listener)
    }

    fn remove_tab_removed_listener(&self, id: ListenerId) {
        self.tab_removed_listeners.remove(id);
    }
}

impl WindowHost for ExternalBrowser {
    async fn get_window(&self, id: WindowId) -> Result<bool, AuthError> {
        let known = self
            .windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id);
        if known {
            Ok(true)
        } else {
            Err(AuthError::Browser(format!("No window with id: {}", id)))
        }
    }

    async fn focus_window(&self, id: WindowId) -> Result<(), AuthError> {
        tracing::debug!(window_id = id, "Focusing window");
        Ok(())
    }

    async fn create_popup(&self, options: &PopupOptions) -> Result<Option<WindowId>, AuthError> {
        let id = self.next_id();
        self.windows
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id);
        tracing::debug!(
            window_id = id,
            url = %options.url,
            width = options.width,
            height = options.height,
            "Popup window created"
        );
        Ok(Some(id))
    }
}
