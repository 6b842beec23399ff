use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::client::config::Settings;
use crate::common::TokenRecord;
use crate::error::AuthError;

pub const HH_TOKEN: &str = "hhToken";
pub const SYSTEM_AUTH: &str = "systemAuth";
pub const SYSTEM_TOKEN: &str = "systemToken";
pub const SHOW_TOKEN_DISPLAY: &str = "showTokenDisplay";

/// Persistent key-value storage, kept as a single JSON object on disk
pub struct LocalStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process
    write_lock: Mutex<()>,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let dir = dir.into();

        // Create storage directory if it doesn't exist
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                AuthError::StorageUnavailable(format!("Failed to create storage directory: {}", e))
            })?;
        }

        Ok(Self {
            path: dir.join("storage.json"),
            write_lock: Mutex::new(()),
        })
    }

    pub fn open(settings: &Settings) -> Result<Self, AuthError> {
        Self::new(settings.storage_dir()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_all(&self) -> Result<Map<String, Value>, AuthError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let json = fs::read_to_string(&self.path)
            .map_err(|e| AuthError::StorageUnavailable(format!("Failed to read storage: {}", e)))?;
        if json.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&json)
            .map_err(|e| AuthError::StorageUnavailable(format!("Storage file is corrupted: {}", e)))
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>, AuthError> {
        Ok(self.get_all()?.remove(key))
    }

    /// Merge `items` into the stored object
    pub fn set(&self, items: Map<String, Value>) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stored = self.get_all()?;
        stored.extend(items);
        self.write(&stored)
    }

    pub fn remove(&self, keys: &[&str]) -> Result<(), AuthError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut stored = self.get_all()?;
        for key in keys {
            stored.remove(*key);
        }
        self.write(&stored)
    }

    pub fn token(&self) -> Result<Option<TokenRecord>, AuthError> {
        match self.get(HH_TOKEN)? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                AuthError::StorageUnavailable(format!("Stored token is malformed: {}", e))
            }),
        }
    }

    /// Overwrite the stored token wholesale
    pub fn set_token(&self, token: &TokenRecord) -> Result<(), AuthError> {
        let mut items = Map::new();
        items.insert(HH_TOKEN.to_string(), serde_json::to_value(token)?);
        self.set(items)
    }

    /// Forget the token and leave the token display; system login is kept
    pub fn clear_token(&self) -> Result<(), AuthError> {
        self.remove(&[HH_TOKEN, SHOW_TOKEN_DISPLAY])
    }

    pub fn system_auth(&self) -> Result<bool, AuthError> {
        self.flag(SYSTEM_AUTH)
    }

    pub fn system_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self
            .get(SYSTEM_TOKEN)?
            .and_then(|value| value.as_str().map(str::to_string))
            .filter(|token| !token.is_empty()))
    }

    pub fn set_system_auth(&self, system_token: &str) -> Result<(), AuthError> {
        let mut items = Map::new();
        items.insert(SYSTEM_AUTH.to_string(), Value::Bool(true));
        items.insert(SYSTEM_TOKEN.to_string(), Value::from(system_token));
        self.set(items)
    }

    pub fn show_token_display(&self) -> Result<bool, AuthError> {
        self.flag(SHOW_TOKEN_DISPLAY)
    }

    pub fn set_show_token_display(&self, show: bool) -> Result<(), AuthError> {
        let mut items = Map::new();
        items.insert(SHOW_TOKEN_DISPLAY.to_string(), Value::Bool(show));
        self.set(items)
    }

    fn flag(&self, key: &str) -> Result<bool, AuthError> {
        Ok(self.get(key)?.and_then(|value| value.as_bool()).unwrap_or(false))
    }

    fn write(&self, stored: &Map<String, Value>) -> Result<(), AuthError> {
        let json = serde_json::to_string_pretty(stored)?;
        let tmp_path = self.path.with_extension("json.tmp");

        fs::write(&tmp_path, json)
            .map_err(|e| AuthError::StorageUnavailable(format!("Failed to save storage: {}", e)))?;

        // Set permissions to 0600 (read/write for owner only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&tmp_path)
                .map_err(|e| {
                    AuthError::StorageUnavailable(format!("Failed to get file permissions: {}", e))
                })?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&tmp_path, perms).map_err(|e| {
                AuthError::StorageUnavailable(format!("Failed to set file permissions: {}", e))
            })?;
        }

        fs::rename(&tmp_path, &self.path)
            .map_err(|e| AuthError::StorageUnavailable(format!("Failed to save storage: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn temp_store() -> LocalStore {
        let dir = std::env::temp_dir().join(format!("hh-auth-store-{}", uuid::Uuid::new_v4()));
        LocalStore::new(dir).unwrap()
    }

    fn token() -> TokenRecord {
        TokenRecord {
            access_token: "AT1".to_string(),
            refresh_token: "RT1".to_string(),
            expires_in: 3600,
            token_type: "bearer".to_string(),
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_empty_store_has_defaults() {
        let store = temp_store();

        assert!(store.get_all().unwrap().is_empty());
        assert_eq!(store.token().unwrap(), None);
        assert!(!store.system_auth().unwrap());
        assert!(!store.show_token_display().unwrap());
        assert_eq!(store.system_token().unwrap(), None);
    }

    #[test]
    fn test_token_round_trip_on_disk() {
        let store = temp_store();
        store.set_token(&token()).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["hhToken"]["created_at"], 1_700_000_000);
        assert_eq!(store.token().unwrap(), Some(token()));
    }

    #[test]
    fn test_set_token_overwrites_wholesale() {
        let store = temp_store();
        let mut first = token();
        first.extra.insert("scope".to_string(), Value::from("old"));
        store.set_token(&first).unwrap();

        store.set_token(&token()).unwrap();

        assert_eq!(store.token().unwrap().unwrap().extra.get("scope"), None);
    }

    #[test]
    fn test_clear_token_keeps_system_auth() {
        let store = temp_store();
        store.set_system_auth("sys-token").unwrap();
        store.set_token(&token()).unwrap();
        store.set_show_token_display(true).unwrap();

        store.clear_token().unwrap();

        assert_eq!(store.token().unwrap(), None);
        assert!(!store.show_token_display().unwrap());
        assert!(store.system_auth().unwrap());
        assert_eq!(store.system_token().unwrap(), Some("sys-token".to_string()));
    }

    #[test]
    fn test_corrupted_file_is_storage_error() {
        let store = temp_store();
        fs::write(store.path(), "{not json").unwrap();

        assert!(matches!(store.get_all(), Err(AuthError::StorageUnavailable(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_storage_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let store = temp_store();
        store.set_system_auth("x").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
