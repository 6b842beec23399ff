//! Redirect capture for a single authorization attempt.
//!
//! Two independent event sources (redirects and tab closure) race to end the
//! attempt. Whichever arrives first moves the capture out of `Pending`; every
//! later event is ignored. Listener cleanup runs at most once no matter which
//! path triggers it.

use std::sync::{Mutex, PoisonError};
use tokio::sync::oneshot;
use url::Url;

use super::browser::{RedirectDetails, TabId};

type Cleanup = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Pending,
    /// Callback redirect carried a code
    Resolved,
    /// Callback redirect arrived without a code
    Failed,
    /// Tab closed before the callback redirect
    Cancelled,
}

/// How an attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    Code(String),
    CodeMissing,
    Cancelled,
}

impl Terminal {
    fn state(&self) -> CaptureState {
        match self {
            Terminal::Code(_) => CaptureState::Resolved,
            Terminal::CodeMissing => CaptureState::Failed,
            Terminal::Cancelled => CaptureState::Cancelled,
        }
    }

    /// Whether the tab is still open and should be closed by the flow
    pub fn closes_tab(&self) -> bool {
        !matches!(self, Terminal::Cancelled)
    }
}

struct Inner {
    state: CaptureState,
    cleanup: Option<Cleanup>,
    outcome: Option<oneshot::Sender<Terminal>>,
}

pub struct RedirectCapture {
    tab_id: TabId,
    redirect_prefix: String,
    inner: Mutex<Inner>,
}

impl RedirectCapture {
    pub fn new(
        tab_id: TabId,
        redirect_prefix: impl Into<String>,
    ) -> (Self, oneshot::Receiver<Terminal>) {
        let (tx, rx) = oneshot::channel();
        let capture = Self {
            tab_id,
            redirect_prefix: redirect_prefix.into(),
            inner: Mutex::new(Inner {
                state: CaptureState::Pending,
                cleanup: None,
                outcome: Some(tx),
            }),
        };
        (capture, rx)
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn state(&self) -> CaptureState {
        self.lock().state
    }

    /// Install the listener unregistration. Runs immediately if the attempt
    /// already ended.
    pub fn install_cleanup<F>(&self, cleanup: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let run_now = {
            let mut inner = self.lock();
            if inner.state == CaptureState::Pending {
                inner.cleanup = Some(Box::new(cleanup));
                None
            } else {
                Some(cleanup)
            }
        };
        if let Some(cleanup) = run_now {
            cleanup();
        }
    }

    /// Unregister listeners. Safe to call any number of times.
    pub fn cleanup(&self) {
        let cleanup = self.lock().cleanup.take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }

    pub fn on_redirect(&self, details: &RedirectDetails) {
        if details.tab_id != self.tab_id {
            return;
        }

        let location = details.redirect_url.as_deref().unwrap_or("");
        if !location.starts_with(&self.redirect_prefix) {
            // Intermediate hop (login page, consent screen...)
            tracing::debug!(tab_id = self.tab_id, "Ignoring intermediate redirect");
            return;
        }

        let terminal = match extract_code(location) {
            Some(code) => Terminal::Code(code),
            None => Terminal::CodeMissing,
        };
        self.settle(terminal);
    }

    pub fn on_tab_removed(&self, tab_id: TabId) {
        if tab_id == self.tab_id {
            self.settle(Terminal::Cancelled);
        }
    }

    /// Returns false if the attempt had already ended
    fn settle(&self, terminal: Terminal) -> bool {
        let (cleanup, outcome) = {
            let mut inner = self.lock();
            if inner.state != CaptureState::Pending {
                return false;
            }
            inner.state = terminal.state();
            (inner.cleanup.take(), inner.outcome.take())
        };

        tracing::debug!(tab_id = self.tab_id, state = ?terminal.state(), "Authorization attempt settled");

        if let Some(cleanup) = cleanup {
            cleanup();
        }
        if let Some(outcome) = outcome {
            // The receiver may be gone if the caller stopped waiting
            let _ = outcome.send(terminal);
        }
        true
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Non-empty `code` query parameter of the callback URL
fn extract_code(location: &str) -> Option<String> {
    let url = Url::parse(location).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const PREFIX: &str = "hhandroid://oauthresponse";

    fn redirect(tab_id: TabId, to: &str) -> RedirectDetails {
        RedirectDetails {
            tab_id,
            url: "https://hh.ru/oauth/authorize?client_id=x".to_string(),
            redirect_url: Some(to.to_string()),
        }
    }

    fn capture_with_counter() -> (RedirectCapture, oneshot::Receiver<Terminal>, Arc<AtomicUsize>) {
        let (capture, rx) = RedirectCapture::new(1, PREFIX);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        capture.install_cleanup(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (capture, rx, count)
    }

    #[test]
    fn test_intermediate_redirects_are_invisible() {
        let (capture, mut rx, cleanups) = capture_with_counter();

        capture.on_redirect(&redirect(1, "https://hh.ru/account/login?backurl=/oauth"));
        capture.on_redirect(&redirect(1, "https://hh.ru/oauth/authorize?confirmed=1"));
        capture.on_redirect(&RedirectDetails {
            redirect_url: None,
            ..redirect(1, "")
        });

        assert_eq!(capture.state(), CaptureState::Pending);
        assert_eq!(cleanups.load(Ordering::SeqCst), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_callback_with_code_resolves_once() {
        let (capture, mut rx, cleanups) = capture_with_counter();

        capture.on_redirect(&redirect(1, "hhandroid://oauthresponse?code=abc123"));
        capture.on_redirect(&redirect(1, "hhandroid://oauthresponse?code=other"));
        capture.on_tab_removed(1);

        assert_eq!(capture.state(), CaptureState::Resolved);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
        assert_eq!(rx.try_recv().unwrap(), Terminal::Code("abc123".to_string()));
    }

    #[test]
    fn test_callback_without_code_fails() {
        let (capture, mut rx, cleanups) = capture_with_counter();

        capture.on_redirect(&redirect(1, "hhandroid://oauthresponse?error=access_denied"));

        assert_eq!(capture.state(), CaptureState::Failed);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
        let terminal = rx.try_recv().unwrap();
        assert_eq!(terminal, Terminal::CodeMissing);
        assert!(terminal.closes_tab());
    }

    #[test]
    fn test_empty_code_counts_as_missing() {
        let (capture, mut rx, _) = capture_with_counter();

        capture.on_redirect(&redirect(1, "hhandroid://oauthresponse?code="));

        assert_eq!(rx.try_recv().unwrap(), Terminal::CodeMissing);
    }

    #[test]
    fn test_tab_closed_cancels() {
        let (capture, mut rx, cleanups) = capture_with_counter();

        capture.on_tab_removed(2);
        assert_eq!(capture.state(), CaptureState::Pending);

        capture.on_tab_removed(1);
        capture.on_redirect(&redirect(1, "hhandroid://oauthresponse?code=late"));

        assert_eq!(capture.state(), CaptureState::Cancelled);
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
        let terminal = rx.try_recv().unwrap();
        assert_eq!(terminal, Terminal::Cancelled);
        assert!(!terminal.closes_tab());
    }

    #[test]
    fn test_redirects_from_other_tabs_are_ignored() {
        let (capture, mut rx, _) = capture_with_counter();

        capture.on_redirect(&redirect(9, "hhandroid://oauthresponse?code=abc"));

        assert_eq!(capture.state(), CaptureState::Pending);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let (capture, mut rx, cleanups) = capture_with_counter();

        capture.cleanup();
        capture.cleanup();
        assert_eq!(cleanups.load(Ordering::SeqCst), 1);

        capture.on_redirect(&redirect(1, "hhandroid://oauthresponse?code=abc"));
        capture.cleanup();

        assert_eq!(cleanups.load(Ordering::SeqCst), 1);
        assert_eq!(rx.try_recv().unwrap(), Terminal::Code("abc".to_string()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_cleanup_installed_after_settle_runs_immediately() {
        let (capture, _rx) = RedirectCapture::new(1, PREFIX);
        capture.on_tab_removed(1);

        let ran = Arc::new(AtomicUsize::new(0));
        let counter = ran.clone();
        capture.install_cleanup(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_extract_code() {
        assert_eq!(
            extract_code("hhandroid://oauthresponse?code=abc123&state=x"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_code("hhandroid://oauthresponse"), None);
        assert_eq!(extract_code("not a url"), None);
    }
}
