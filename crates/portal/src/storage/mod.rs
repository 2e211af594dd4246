//! Flat string key-value storage backing the session.
//!
//! The portal persists a handful of string entries between runs, the way a
//! browser front end uses local storage. Two backends are provided:
//!
//! - [`MemoryStore`] - process-local, used by tests and embedders
//! - [`FileStore`] - a JSON object on disk, used by the CLI
//!
//! Neither backend offers transactions; multi-key consistency is the
//! caller's job (see [`crate::session::SessionStore::save`]).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The store refused the write (quota exceeded, read-only medium).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A flat string key-value store.
pub trait KeyValueStore {
    /// Read an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write an entry, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove an entry. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the change.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}
