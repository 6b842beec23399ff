use hh_auth::{Response, TabId, TokenRecord};

use crate::state::StoredFlags;

/// Commands to execute (user actions → background tasks)
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    // Text input (system token, pasted redirect)
    AppendInput(String),
    DeleteInputChar,
    ClearInput,

    // Persisted flags
    ReloadFlags,

    // System login
    SubmitSystemLogin,

    // Authorization
    StartAuthorization,
    SubmitRedirect,
    CloseAuthorizationTab,

    // Token display
    ContinueFromTokenDisplay,

    // UI state
    ToggleHelp,
    Quit,
}

/// Data events (background tasks → UI state)
#[derive(Debug, Clone)]
pub enum DataEvent {
    FlagsLoaded(StoredFlags),
    StorageError {
        error: String,
    },

    SystemLoginSucceeded,
    SystemLoginFailed {
        error: String,
    },

    AuthorizationTabOpened {
        tab_id: TabId,
        url: String,
    },
    AuthorizationTabClosed {
        tab_id: TabId,
    },
    /// Reply to the `oauth` message
    OauthResponded(Response),

    TokensDelivered {
        token: TokenRecord,
    },
    DeliveryFailed {
        error: String,
    },
}
