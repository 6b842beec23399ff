use super::browser::{PopupOptions, WindowHost, WindowId};
use crate::error::AuthError;

pub const POPUP_WIDTH: u32 = 400;
pub const POPUP_HEIGHT: u32 = 600;

/// Tracks the popup window so a second `open` focuses it instead of
/// creating another one
#[derive(Debug, Default)]
pub struct WindowSession {
    window_id: Option<WindowId>,
}

impl WindowSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn init(&mut self, id: WindowId) {
        self.window_id = Some(id);
    }

    pub fn clear(&mut self) {
        self.window_id = None;
    }

    pub fn window_id(&self) -> Option<WindowId> {
        self.window_id
    }

    pub fn on_window_removed(&mut self, id: WindowId) {
        if self.window_id == Some(id) {
            tracing::debug!(window_id = id, "Popup window closed");
            self.clear();
        }
    }

    pub async fn open_or_focus<H: WindowHost>(
        &mut self,
        host: &H,
        popup_url: &str,
    ) -> Result<WindowId, AuthError> {
        if let Some(id) = self.window_id {
            match focus_existing(host, id).await {
                Ok(true) => return Ok(id),
                Ok(false) => self.clear(),
                Err(e) => {
                    tracing::debug!(window_id = id, "Popup window lookup failed: {}", e);
                    self.clear();
                }
            }
        }

        let options = PopupOptions {
            url: popup_url.to_string(),
            width: POPUP_WIDTH,
            height: POPUP_HEIGHT,
            focused: true,
        };
        let id = host
            .create_popup(&options)
            .await?
            .ok_or_else(|| AuthError::Browser("Popup window has no id".to_string()))?;
        self.init(id);
        Ok(id)
    }
}

async fn focus_existing<H: WindowHost>(host: &H, id: WindowId) -> Result<bool, AuthError> {
    if !host.get_window(id).await? {
        return Ok(false);
    }
    host.focus_window(id).await?;
    Ok(true)
}
