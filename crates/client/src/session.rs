//! Session repository.
//!
//! A single owner for the persisted authentication state (bearer token, role,
//! user id). Every other component depends on a [`SessionStore`] by
//! reference; nothing else touches the underlying storage.
//!
//! Two implementations: [`MemorySessionStore`] for tests and ephemeral use,
//! and [`FileSessionStore`] which persists the session as a small JSON file
//! under the same key names the gateway front ends have always used
//! (`accessToken`, `userRole`, `userId`).

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use medicart_core::{Role, UserId};

/// Storage key names, kept for compatibility with the persisted format.
pub mod keys {
    /// Key for the bearer token.
    pub const ACCESS_TOKEN: &str = "accessToken";

    /// Key for the effective role string.
    pub const USER_ROLE: &str = "userRole";

    /// Key for the stringified numeric user id.
    pub const USER_ID: &str = "userId";
}

/// Errors that can occur persisting or clearing a session.
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Underlying file I/O failed.
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),

    /// Session could not be serialized.
    #[error("session serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Authenticated session state.
///
/// Created on successful login, registration, or OTP verification; read on
/// every outgoing request; destroyed on logout.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Bearer token as stored, possibly already carrying a `Bearer ` prefix.
    pub access_token: Option<SecretString>,
    /// Effective role reported at login.
    pub role: Option<Role>,
    /// Numeric user id reported at login, fallback identity when the token
    /// does not encode one.
    pub user_id: Option<UserId>,
}

impl Session {
    /// The stored token, if it is usable.
    ///
    /// A token is usable iff it is non-empty after trimming and is not one of
    /// the literal placeholder strings `"null"` / `"undefined"` that a buggy
    /// writer may have persisted.
    #[must_use]
    pub fn usable_token(&self) -> Option<&str> {
        let raw = self.access_token.as_ref()?.expose_secret();
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
            None
        } else {
            Some(raw)
        }
    }

    /// Whether any usable credential is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.usable_token().is_some()
    }
}

/// Single-owner repository for the persisted [`Session`].
///
/// `load` is infallible: a missing or corrupt session reads as an empty one,
/// the same way an absent storage key reads as "not logged in".
pub trait SessionStore: Send + Sync {
    /// Read the current session. Absent or unreadable state yields
    /// `Session::default()`.
    fn load(&self) -> Session;

    /// Replace the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the session cannot be written.
    fn store(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Destroy the persisted session.
    ///
    /// # Errors
    ///
    /// Returns `SessionStoreError` if the underlying storage cannot be
    /// cleared.
    fn clear(&self) -> Result<(), SessionStoreError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// In-memory session store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Session>,
}

impl MemorySessionStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        self.session
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn store(&self, session: &Session) -> Result<(), SessionStoreError> {
        if let Ok(mut guard) = self.session.write() {
            *guard = session.clone();
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        if let Ok(mut guard) = self.session.write() {
            *guard = Session::default();
        }
        Ok(())
    }
}

// =============================================================================
// File-backed store
// =============================================================================

/// Wire form of the persisted session file.
///
/// All values are stored as strings, mirroring the key-value storage the
/// format originated from; `userId` is the stringified integer.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(rename = "userRole", skip_serializing_if = "Option::is_none")]
    user_role: Option<String>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

/// Session store persisted as a JSON file.
///
/// Writes are last-writer-wins; the single-threaded front ends this format
/// comes from serialize all access, and concurrent writers only race over
/// whole-file replacement.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store backed by the given file path. The file is created on
    /// first `store`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_persisted(&self) -> Option<PersistedSession> {
        let bytes = fs::read(&self.path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Session {
        let Some(persisted) = self.read_persisted() else {
            return Session::default();
        };

        Session {
            access_token: persisted.access_token.map(SecretString::from),
            role: persisted.user_role.and_then(|r| r.parse().ok()),
            user_id: persisted
                .user_id
                .and_then(|id| id.trim().parse::<i64>().ok())
                .map(UserId::new),
        }
    }

    fn store(&self, session: &Session) -> Result<(), SessionStoreError> {
        let persisted = PersistedSession {
            access_token: session
                .access_token
                .as_ref()
                .map(|t| t.expose_secret().to_owned()),
            user_role: session.role.map(|r| r.as_str().to_owned()),
            user_id: session.user_id.map(|id| id.as_i64().to_string()),
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(&persisted)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session_with_token(token: &str) -> Session {
        Session {
            access_token: Some(SecretString::from(token)),
            role: Some(Role::User),
            user_id: Some(UserId::new(3)),
        }
    }

    #[test]
    fn test_usable_token_rules() {
        assert!(session_with_token("abc").usable_token().is_some());
        assert!(session_with_token("Bearer abc").usable_token().is_some());
        assert!(session_with_token("").usable_token().is_none());
        assert!(session_with_token("   ").usable_token().is_none());
        assert!(session_with_token("null").usable_token().is_none());
        assert!(session_with_token("undefined").usable_token().is_none());
        assert!(Session::default().usable_token().is_none());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(!store.load().is_authenticated());

        store.store(&session_with_token("tok")).unwrap();
        let loaded = store.load();
        assert_eq!(loaded.usable_token(), Some("tok"));
        assert_eq!(loaded.role, Some(Role::User));
        assert_eq!(loaded.user_id, Some(UserId::new(3)));

        store.clear().unwrap();
        assert!(!store.load().is_authenticated());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join("medicart-session-test-rt");
        let _ = fs::remove_dir_all(&dir);
        let store = FileSessionStore::new(dir.join("session.json"));

        assert!(!store.load().is_authenticated());

        let session = Session {
            access_token: Some(SecretString::from("abc.def.ghi")),
            role: Some(Role::Admin),
            user_id: Some(UserId::new(7)),
        };
        store.store(&session).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.usable_token(), Some("abc.def.ghi"));
        assert_eq!(loaded.role, Some(Role::Admin));
        assert_eq!(loaded.user_id, Some(UserId::new(7)));

        store.clear().unwrap();
        assert!(!store.load().is_authenticated());
        // Clearing twice is fine
        store.clear().unwrap();

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_persists_legacy_key_names() {
        let dir = std::env::temp_dir().join("medicart-session-test-keys");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("session.json");
        let store = FileSessionStore::new(&path);

        store
            .store(&Session {
                access_token: Some(SecretString::from("tok")),
                role: Some(Role::Admin),
                user_id: Some(UserId::new(7)),
            })
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw[keys::ACCESS_TOKEN], "tok");
        assert_eq!(raw[keys::USER_ROLE], "ADMIN");
        assert_eq!(raw[keys::USER_ID], "7");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_file_store_corrupt_file_reads_empty() {
        let dir = std::env::temp_dir().join("medicart-session-test-corrupt");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("session.json");
        fs::write(&path, b"{not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(!store.load().is_authenticated());

        let _ = fs::remove_dir_all(&dir);
    }
}
