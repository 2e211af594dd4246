//! Session persistence.
//!
//! The signed-in identity lives in three flat entries of a
//! [`KeyValueStore`]: the raw login response, the role and the display name.
//! The store has no transactions, so [`SessionStore`] orders and rolls back
//! its writes to keep the three entries consistent.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use school_portal_core::Role;

use crate::storage::{KeyValueStore, StorageError};

/// Storage keys for session data.
pub mod keys {
    /// Serialized login response; doubles as the "logged in" marker.
    pub const USER: &str = "user";

    /// Role string of the signed-in user.
    pub const USER_ROLE: &str = "userRole";

    /// Display name of the signed-in user.
    pub const USERNAME: &str = "username";
}

/// Display name used when the stored username is missing.
pub const FALLBACK_USERNAME: &str = "User";

/// The signed-in user's identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    /// Display name.
    pub username: String,
    /// Role exactly as stored. May not name a known role.
    pub role: String,
    /// Raw login response.
    pub raw: Value,
}

impl Session {
    /// The session's role, or `None` if the stored string is unrecognized.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Session persistence over a flat key-value store.
#[derive(Debug)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Wrap a key-value store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Persist a new session.
    ///
    /// The role entry is written last and removed first by [`Self::clear`],
    /// so an interrupted write reads back as logged out. If any write fails
    /// the entries already written are restored to their previous values.
    ///
    /// # Errors
    ///
    /// Returns the storage error that aborted the save.
    pub fn save(&mut self, username: &str, role: &str, raw: &Value) -> Result<Session, StorageError> {
        let blob = raw.to_string();
        let writes: [(&'static str, &str); 3] = [
            (keys::USERNAME, username),
            (keys::USER, blob.as_str()),
            (keys::USER_ROLE, role),
        ];

        let snapshot = writes
            .iter()
            .map(|(key, _)| self.store.get(key).map(|value| (*key, value)))
            .collect::<Result<Vec<_>, StorageError>>()?;

        for (written, (key, value)) in writes.iter().enumerate() {
            if let Err(e) = self.store.set(key, value) {
                warn!(key, error = %e, "Session write failed, rolling back");
                self.rollback(snapshot.iter().take(written));
                return Err(e);
            }
        }

        debug!(username, role, "Session saved");
        Ok(Session {
            username: username.to_owned(),
            role: role.to_owned(),
            raw: raw.clone(),
        })
    }

    /// Read back the current session.
    ///
    /// Returns `None` unless both the role entry and the logged-in marker are
    /// present and non-empty. Storage read errors are logged and treated as
    /// logged out.
    pub fn restore(&self) -> Option<Session> {
        match self.try_restore() {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Failed to read session, treating as logged out");
                None
            }
        }
    }

    fn try_restore(&self) -> Result<Option<Session>, StorageError> {
        let Some(role) = non_empty(self.store.get(keys::USER_ROLE)?) else {
            return Ok(None);
        };
        let Some(blob) = non_empty(self.store.get(keys::USER)?) else {
            return Ok(None);
        };
        let username = non_empty(self.store.get(keys::USERNAME)?)
            .unwrap_or_else(|| FALLBACK_USERNAME.to_owned());
        let raw = serde_json::from_str(&blob).unwrap_or(Value::String(blob));

        Ok(Some(Session { username, role, raw }))
    }

    /// Remove all session entries.
    ///
    /// # Errors
    ///
    /// Returns the first storage error; entries removed before it stay removed.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        for key in [keys::USER_ROLE, keys::USER, keys::USERNAME] {
            self.store.remove(key)?;
        }
        debug!("Session cleared");
        Ok(())
    }

    fn rollback<'a>(&mut self, entries: impl Iterator<Item = &'a (&'static str, Option<String>)>) {
        for (key, previous) in entries {
            let result = match previous {
                Some(value) => self.store.set(key, value),
                None => self.store.remove(key),
            };
            if let Err(e) = result {
                warn!(key, error = %e, "Failed to roll back session entry");
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
