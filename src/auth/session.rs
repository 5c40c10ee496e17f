use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Source of the bearer token attached to every backend request.
pub trait SessionProvider: Send + Sync {
    fn token(&self) -> Option<SecretString>;

    /// Called when the backend answers 401; the session is no longer usable.
    fn on_unauthorized(&self);

    fn login_required(&self) -> bool;
}

/// Fixed token, typically taken from `API_TOKEN`.
pub struct StaticSession {
    token: Option<SecretString>,
    expired: AtomicBool,
}

impl StaticSession {
    pub fn new(token: Option<SecretString>) -> Self {
        Self {
            token,
            expired: AtomicBool::new(false),
        }
    }
}

impl SessionProvider for StaticSession {
    fn token(&self) -> Option<SecretString> {
        if self.expired.load(Ordering::SeqCst) {
            return None;
        }
        self.token.clone()
    }

    fn on_unauthorized(&self) {
        log::warn!("Static session token rejected by backend; login required");
        self.expired.store(true, Ordering::SeqCst);
    }

    fn login_required(&self) -> bool {
        self.expired.load(Ordering::SeqCst) || self.token.is_none()
    }
}

/// Token persisted in a small JSON key/value store on disk.
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store_token(&self, token: &SecretString) -> AppResult<()> {
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), token.expose_secret().to_string());
        self.write_entries(&entries)
    }

    pub fn clear_token(&self) -> AppResult<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }

    fn read_entries(&self) -> AppResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|e| {
            AppError::ConfigError(format!(
                "cannot read session store {}: {}",
                self.path.display(),
                e
            ))
        })?;

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&raw)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw).map_err(|e| {
            AppError::ConfigError(format!(
                "cannot write session store {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

impl SessionProvider for FileSession {
    fn token(&self) -> Option<SecretString> {
        match self.read_entries() {
            Ok(entries) => entries
                .get(TOKEN_KEY)
                .filter(|t| !t.trim().is_empty())
                .map(|t| SecretString::from(t.clone())),
            Err(err) => {
                log::warn!("Session store unreadable: {}", err);
                None
            }
        }
    }

    fn on_unauthorized(&self) {
        log::warn!("Session token rejected by backend; clearing persisted token");
        if let Err(err) = self.clear_token() {
            log::error!("Failed to clear persisted token: {}", err);
        }
    }

    fn login_required(&self) -> bool {
        self.token().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("recruit-admin-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_static_session_expires_on_unauthorized() {
        let session = StaticSession::new(Some(SecretString::from("abc".to_string())));
        assert!(!session.login_required());
        assert_eq!(session.token().unwrap().expose_secret(), "abc");

        session.on_unauthorized();

        assert!(session.token().is_none());
        assert!(session.login_required());
    }

    #[test]
    fn test_static_session_without_token_requires_login() {
        let session = StaticSession::new(None);
        assert!(session.login_required());
    }

    #[test]
    fn test_file_session_round_trip_and_clear() {
        let path = temp_store("roundtrip");
        let session = FileSession::new(&path);
        assert!(session.token().is_none());

        session
            .store_token(&SecretString::from("persisted".to_string()))
            .expect("token should persist");
        assert_eq!(session.token().unwrap().expose_secret(), "persisted");

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"token\""));

        session.on_unauthorized();
        assert!(session.token().is_none());
        assert!(session.login_required());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_session_keeps_other_keys() {
        let path = temp_store("other-keys");
        fs::write(&path, r#"{"token":"t","user":"admin"}"#).unwrap();
        let session = FileSession::new(&path);

        session.clear_token().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("admin"));
        assert!(!raw.contains("\"token\""));

        let _ = fs::remove_file(&path);
    }
}
