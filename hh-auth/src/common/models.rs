use chrono::{serde::ts_seconds, DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const EXPIRY_BUFFER: Duration = Duration::minutes(5);

/// Token body returned by the hh.ru token endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
    /// Any additional fields the endpoint sends back are carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Token persisted under the `hhToken` storage key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
    #[serde(with = "ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenRecord {
    /// Stamp a freshly issued token with its creation time (seconds resolution)
    pub fn issued_at(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            token_type: response.token_type,
            created_at: now.trunc_subsecs(0),
            extra: response.extra,
        }
    }

    /// `None` when `expires_in` is outside the representable date range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Duration::try_seconds(self.expires_in)
            .and_then(|lifetime| self.created_at.checked_add_signed(lifetime))
    }

    /// Treats tokens as expired 5 minutes early. An unknown expiry is never expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (self.expires_at(), now.checked_add_signed(EXPIRY_BUFFER)) {
            (Some(expires_at), Some(deadline)) => expires_at <= deadline,
            _ => false,
        }
    }

    /// Short prefix of the access token, safe for logs
    pub fn access_token_hint(&self) -> String {
        let prefix: String = self.access_token.chars().take(6).collect();
        format!("{}…", prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn response() -> TokenResponse {
        serde_json::from_str(
            r#"{"access_token":"AT1","refresh_token":"RT1","expires_in":3600,"token_type":"bearer"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_created_at_is_truncated_to_seconds() {
        let now = Utc.timestamp_opt(1_700_000_000, 987_000_000).unwrap();
        let record = TokenRecord::issued_at(response(), now);

        assert_eq!(record.created_at.timestamp(), 1_700_000_000);
        assert_eq!(record.created_at.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_record_serializes_created_at_as_unix_seconds() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let record = TokenRecord::issued_at(response(), now);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["created_at"], 1_700_000_000);
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["expires_in"], 3600);
    }

    #[test]
    fn test_extra_fields_are_preserved() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","expires_in":10,"token_type":"bearer","scope":"vacancies"}"#,
        )
        .unwrap();
        let record = TokenRecord::issued_at(response, Utc::now());

        assert_eq!(record.extra.get("scope"), Some(&Value::from("vacancies")));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["scope"], "vacancies");
    }

    #[test]
    fn test_expiry_uses_buffer() {
        let created = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let record = TokenRecord::issued_at(response(), created);

        assert_eq!(record.expires_at(), Some(created + Duration::seconds(3600)));
        assert!(!record.is_expired(created + Duration::minutes(50)));
        assert!(record.is_expired(created + Duration::minutes(56)));
    }

    #[test]
    fn test_out_of_range_lifetime_has_unknown_expiry() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        for expires_in in [100_000_000_000_000_000, i64::MIN, i64::MAX] {
            let response: TokenResponse = serde_json::from_value(serde_json::json!({
                "access_token": "AT1",
                "refresh_token": "RT1",
                "expires_in": expires_in,
                "token_type": "bearer"
            }))
            .unwrap();
            let record = TokenRecord::issued_at(response, now);

            assert_eq!(record.expires_at(), None, "expires_in = {}", expires_in);
            assert!(!record.is_expired(now));
        }
    }

    #[test]
    fn test_negative_lifetime_is_expired() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let mut record = TokenRecord::issued_at(response(), now);
        record.expires_in = -60;

        assert_eq!(record.expires_at(), Some(now - Duration::seconds(60)));
        assert!(record.is_expired(now));
    }

    #[test]
    fn test_access_token_hint_does_not_leak_full_token() {
        let mut record = TokenRecord::issued_at(response(), Utc::now());
        record.access_token = "ABCDEFGHIJKLMNOP".to_string();

        assert_eq!(record.access_token_hint(), "ABCDEF…");
    }
}
