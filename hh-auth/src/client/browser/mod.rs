//! Browser host seam: tab management, redirect interception and popup windows.
//!
//! The authorization flow only talks to these traits, so it runs the same way
//! against [`ExternalBrowser`] (system browser + redirects fed in by the popup)
//! and against in-memory hosts in tests.

mod external;
mod pattern;
mod registry;

pub use external::{ExternalBrowser, TabCreatedListener};
pub use pattern::UrlPattern;
pub use registry::{ListenerId, ListenerRegistry};

use std::future::Future;
use std::sync::Arc;
use url::Url;

use crate::error::AuthError;

pub type TabId = u64;
pub type WindowId = u64;

/// A request that was answered with a redirect
#[derive(Debug, Clone, PartialEq)]
pub struct RedirectDetails {
    pub tab_id: TabId,
    /// URL of the request that was redirected
    pub url: String,
    /// Where the request is being sent next
    pub redirect_url: Option<String>,
}

/// Which requests a redirect listener wants to hear about
#[derive(Debug, Clone)]
pub struct RequestFilter {
    pub urls: Vec<UrlPattern>,
    pub tab_id: Option<TabId>,
}

impl RequestFilter {
    pub fn matches(&self, details: &RedirectDetails) -> bool {
        if let Some(tab_id) = self.tab_id {
            if tab_id != details.tab_id {
                return false;
            }
        }
        self.urls.iter().any(|pattern| pattern.matches(&details.url))
    }
}

pub type RedirectListener = Arc<dyn Fn(&RedirectDetails) + Send + Sync>;
pub type TabRemovedListener = Arc<dyn Fn(TabId) + Send + Sync>;

/// Tabs and navigation events
pub trait BrowserHost: Send + Sync {
    /// Open `url` in a new tab. `None` means the host could not hand out an id.
    fn create_tab(
        &self,
        url: &Url,
        active: bool,
    ) -> impl Future<Output = Result<Option<TabId>, AuthError>> + Send;

    fn remove_tab(&self, tab_id: TabId) -> impl Future<Output = Result<(), AuthError>> + Send;

    fn add_redirect_listener(&self, filter: RequestFilter, listener: RedirectListener)
        -> ListenerId;

    fn remove_redirect_listener(&self, id: ListenerId);

    fn add_tab_removed_listener(&self, listener: TabRemovedListener) -> ListenerId;

    fn remove_tab_removed_listener(&self, id: ListenerId);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupOptions {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub focused: bool,
}

/// Popup window management
pub trait WindowHost: Send + Sync {
    /// Look a window up. An error means the lookup itself failed.
    fn get_window(&self, id: WindowId) -> impl Future<Output = Result<bool, AuthError>> + Send;

    fn focus_window(&self, id: WindowId) -> impl Future<Output = Result<(), AuthError>> + Send;

    fn create_popup(
        &self,
        options: &PopupOptions,
    ) -> impl Future<Output = Result<Option<WindowId>, AuthError>> + Send;
}
