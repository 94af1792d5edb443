//! JSON persistence of users, session and per-user workspaces.
//!
//! # Responsibility
//! - Map the three logical entries (user directory, session pointer,
//!   per-user workspace) onto key-value keys.
//! - Encode/decode the stored JSON shapes.
//!
//! # Invariants
//! - Loads never fail: missing, corrupt or unreadable data yields an empty
//!   value and a log line.
//! - Workspace keys embed the user id, so users never share an entry.
//! - A save has reached the backend when it returns `Ok`.

use crate::model::entity::Business;
use crate::model::user::User;
use crate::repo::kv_repo::{KeyValueStore, KvError};
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Errors from persistence saves.
#[derive(Debug)]
pub enum PersistenceError {
    /// Backend write failed.
    Kv(KvError),
    /// Value could not be encoded as JSON.
    Encode(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode persisted value: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<KvError> for PersistenceError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Typed JSON access over a key-value backend.
#[derive(Debug, Clone)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
    namespace: String,
}

impl<S: KeyValueStore> Persistence<S> {
    /// Creates a persistence layer using `namespace` as key prefix.
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
        }
    }

    /// Key of the registered-user list.
    pub fn users_key(&self) -> String {
        format!("{}_users", self.namespace)
    }

    /// Key of the session pointer.
    pub fn session_key(&self) -> String {
        format!("{}_currentUser", self.namespace)
    }

    /// Key of one user's workspace.
    pub fn workspace_key(&self, user_id: &str) -> String {
        format!("{}_data_{user_id}", self.namespace)
    }

    pub fn load_user_directory(&self) -> Vec<User> {
        self.load_json(&self.users_key(), "users")
            .unwrap_or_default()
    }

    pub fn save_user_directory(&self, users: &[User]) -> PersistenceResult<()> {
        self.save_json(&self.users_key(), &users)
    }

    pub fn load_workspace(&self, user_id: &str) -> Vec<Business> {
        self.load_json(&self.workspace_key(user_id), "workspace")
            .unwrap_or_default()
    }

    pub fn save_workspace(&self, user_id: &str, businesses: &[Business]) -> PersistenceResult<()> {
        self.save_json(&self.workspace_key(user_id), &businesses)
    }

    /// Removes a user's stored workspace entirely.
    pub fn clear_workspace(&self, user_id: &str) -> PersistenceResult<()> {
        self.store.remove(&self.workspace_key(user_id))?;
        Ok(())
    }

    pub fn load_current_session_user(&self) -> Option<User> {
        self.load_json::<Option<User>>(&self.session_key(), "session")
            .flatten()
    }

    /// Stores the session pointer. `None` clears it.
    pub fn save_current_session_user(&self, user: Option<&User>) -> PersistenceResult<()> {
        self.save_json(&self.session_key(), &user)
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str, entry: &'static str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                error!(
                    "event=persistence_load module=persistence status=error entry={} error={}",
                    entry, err
                );
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    "event=persistence_load module=persistence status=corrupt entry={} error_line={} error_column={}",
                    entry,
                    err.line(),
                    err.column()
                );
                None
            }
        }
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> PersistenceResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.put(key, &raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Persistence;
    use crate::db::open_db_in_memory;
    use crate::model::user::User;
    use crate::repo::kv_repo::{KeyValueStore, SqliteKvStore};

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: "Jane".to_string(),
            email: format!("{id}@example.com"),
        }
    }

    #[test]
    fn keys_are_namespaced_per_user() {
        let conn = open_db_in_memory().unwrap();
        let persistence = Persistence::new(SqliteKvStore::try_new(&conn).unwrap(), "macrum");
        assert_eq!(persistence.users_key(), "macrum_users");
        assert_eq!(persistence.session_key(), "macrum_currentUser");
        assert_eq!(persistence.workspace_key("u-1"), "macrum_data_u-1");
        assert_ne!(
            persistence.workspace_key("u-1"),
            persistence.workspace_key("u-2")
        );
    }

    #[test]
    fn session_null_reads_as_none() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKvStore::try_new(&conn).unwrap();
        let persistence = Persistence::new(store, "macrum");

        persistence
            .save_current_session_user(Some(&user("u-1")))
            .unwrap();
        assert_eq!(persistence.load_current_session_user(), Some(user("u-1")));

        persistence.save_current_session_user(None).unwrap();
        assert_eq!(store.get("macrum_currentUser").unwrap().as_deref(), Some("null"));
        assert_eq!(persistence.load_current_session_user(), None);
    }

    #[test]
    fn corrupt_directory_loads_as_empty() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKvStore::try_new(&conn).unwrap();
        store.put("macrum_users", "{not json").unwrap();

        let persistence = Persistence::new(store, "macrum");
        assert!(persistence.load_user_directory().is_empty());
    }
}
