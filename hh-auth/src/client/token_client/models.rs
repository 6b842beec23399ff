use serde::Serialize;

/// Form body for `grant_type=authorization_code`
#[derive(Debug, Serialize)]
pub struct AuthorizationCodeGrant<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub code: &'a str,
    pub redirect_uri: &'a str,
}

impl<'a> AuthorizationCodeGrant<'a> {
    pub fn new(client_id: &'a str, client_secret: &'a str, code: &'a str, redirect_uri: &'a str) -> Self {
        Self {
            grant_type: "authorization_code",
            client_id,
            client_secret,
            code,
            redirect_uri,
        }
    }
}

/// Form body for `grant_type=refresh_token`
#[derive(Debug, Serialize)]
pub struct RefreshTokenGrant<'a> {
    pub grant_type: &'static str,
    pub refresh_token: &'a str,
}

impl<'a> RefreshTokenGrant<'a> {
    pub fn new(refresh_token: &'a str) -> Self {
        Self {
            grant_type: "refresh_token",
            refresh_token,
        }
    }
}
