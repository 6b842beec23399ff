use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Tab ID is undefined, cannot track redirect")]
    TabCreationFailed,

    #[error("code not found in redirect")]
    CodeMissing,

    #[error("Auth window closed")]
    UserCancelled,

    #[error("Token exchange failed: HTTP {status}")]
    TokenExchangeFailed { status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Token upload failed: HTTP {status}")]
    UploadFailed { status: u16 },

    #[error("System authorization rejected: {0}")]
    SystemAuthRejected(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}

impl From<url::ParseError> for AuthError {
    fn from(err: url::ParseError) -> Self {
        AuthError::Configuration(format!("Invalid URL: {}", err))
    }
}
