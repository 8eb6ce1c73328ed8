//! Session persistence.
//!
//! The session store owns the single persisted client record: the
//! authenticated user plus bearer token. It keeps the session in memory and
//! writes through to a JSON file so the session survives process restarts.
//!
//! Storage failures never propagate. A store that cannot read or write its
//! file logs the problem and degrades to the logged-out state; authentication
//! state must never crash the client.

use crate::types::{Session, User};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

/// Persistent store for the authenticated session.
///
/// Reads are served from an in-memory cache (storage access is synchronous
/// and cheap); `save`/`clear` write through to disk when the store was opened
/// with a file path.
///
/// # Example
///
/// ```ignore
/// let sessions = SessionStore::open(config.session_file.clone());
/// if sessions.is_authenticated() {
///     // attach bearer token to requests
/// }
/// ```
#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    cached: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Open a store backed by a JSON file, loading any persisted session.
    ///
    /// A missing, unreadable, or corrupt file degrades to "no session".
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cached = Self::load_from(&path);
        Self {
            path: Some(path),
            cached: RwLock::new(cached),
        }
    }

    /// Open a memory-only store (no file write-through).
    ///
    /// Used by tests and the demo binary.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            cached: RwLock::new(None),
        }
    }

    /// Persist a session, overwriting any prior one.
    pub fn save(&self, session: Session) {
        if let Some(path) = &self.path {
            match serde_json::to_string_pretty(&session) {
                Ok(json) => {
                    if let Err(error) = std::fs::write(path, json) {
                        tracing::warn!(path = %path.display(), %error, "Failed to save session record");
                    }
                },
                Err(error) => {
                    tracing::warn!(%error, "Failed to serialize session record");
                },
            }
        }

        let mut guard = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(session);
    }

    /// The persisted session, if any.
    #[must_use]
    pub fn get(&self) -> Option<Session> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove the persisted session unconditionally. Idempotent.
    pub fn clear(&self) {
        if let Some(path) = &self.path {
            if let Err(error) = std::fs::remove_file(path) {
                if error.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), %error, "Failed to remove session record");
                }
            }
        }

        let mut guard = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    /// True iff a session with a non-empty token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some_and(|session| session.has_token())
    }

    /// The bearer token of the current session, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.get()
            .map(|session| session.token)
            .filter(|token| !token.is_empty())
    }

    /// The user of the current session, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.get().map(|session| session.user)
    }

    fn load_from(path: &Path) -> Option<Session> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return None,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Failed to read session record");
                return None;
            },
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "Discarding corrupt session record");
                None
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_session(token: &str) -> Session {
        Session {
            user: User {
                id: "u1".to_string(),
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                role: "student".to_string(),
                last_login_at: "2025-01-01T00:00:00Z".to_string(),
            },
            token: token.to_string(),
        }
    }

    fn temp_session_path() -> PathBuf {
        std::env::temp_dir().join(format!("skillsphere-session-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn save_then_authenticated_clear_then_not() {
        let store = SessionStore::in_memory();
        assert!(!store.is_authenticated());

        store.save(sample_session("tok-123"));
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok-123"));
        assert_eq!(store.user().unwrap().email, "ada@example.com");

        store.clear();
        assert!(!store.is_authenticated());
        assert!(store.get().is_none());

        // clear is idempotent
        store.clear();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let store = SessionStore::in_memory();
        store.save(sample_session(""));
        assert!(store.get().is_some());
        assert!(!store.is_authenticated());
        assert!(store.token().is_none());
    }

    #[test]
    fn session_round_trips_through_file() {
        let path = temp_session_path();

        let store = SessionStore::open(&path);
        store.save(sample_session("tok-xyz"));

        // A second store opening the same file sees the persisted session
        let reopened = SessionStore::open(&path);
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.token().as_deref(), Some("tok-xyz"));

        reopened.clear();
        let after_clear = SessionStore::open(&path);
        assert!(!after_clear.is_authenticated());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_degrades_to_logged_out() {
        let path = temp_session_path();
        std::fs::write(&path, "{ not json").unwrap();

        let store = SessionStore::open(&path);
        assert!(store.get().is_none());
        assert!(!store.is_authenticated());

        let _ = std::fs::remove_file(&path);
    }
}
