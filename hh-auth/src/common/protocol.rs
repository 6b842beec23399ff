use serde::{Deserialize, Serialize};

use super::TokenRecord;

/// Commands the popup sends to the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum Message {
    /// Open or focus the popup window
    Open,
    /// Run the redirect-capture flow end to end
    Oauth,
}

/// Reply to a [`Message`]
///
/// Serializes as `{"ok":true}`, `{"ok":true,"token":{..}}` or
/// `{"ok":false,"error":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            ok: true,
            token: None,
            error: None,
        }
    }

    pub fn token(token: TokenRecord) -> Self {
        Self {
            ok: true,
            token: Some(token),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            token: None,
            error: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<Option<TokenRecord>, String> {
        if self.ok {
            Ok(self.token)
        } else {
            Err(self.error.unwrap_or_else(|| "unknown error".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_wire_format() {
        assert_eq!(serde_json::to_value(Message::Open).unwrap(), json!({"cmd": "open"}));
        assert_eq!(serde_json::to_value(Message::Oauth).unwrap(), json!({"cmd": "oauth"}));

        let parsed: Message = serde_json::from_value(json!({"cmd": "oauth"})).unwrap();
        assert_eq!(parsed, Message::Oauth);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(serde_json::from_value::<Message>(json!({"cmd": "logout"})).is_err());
    }

    #[test]
    fn test_response_wire_format() {
        assert_eq!(serde_json::to_value(Response::ok()).unwrap(), json!({"ok": true}));
        assert_eq!(
            serde_json::to_value(Response::error("HTTP 400")).unwrap(),
            json!({"ok": false, "error": "HTTP 400"})
        );
    }

    #[test]
    fn test_error_response_into_result() {
        let result = Response::error("Auth window closed").into_result();
        assert_eq!(result, Err("Auth window closed".to_string()));
    }
}
