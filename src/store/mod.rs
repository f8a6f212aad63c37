//! Storage Layer
//!
//! Named slots of text behind a small key-value trait, with three backends,
//! and the typed `AppStorage` on top of it.

mod memory;
mod file;
mod sqlite;
mod slots;

use thiserror::Error;

use crate::codec::EncodeError;
use crate::domain::DomainError;

pub use memory::MemoryStore;
pub use file::JsonFileStore;
pub use sqlite::SqliteStore;
pub use slots::{AppStorage, SlotRead, keys};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
    #[error("Store lock poisoned")]
    Poisoned,
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::Storage(err.to_string())
    }
}

/// Synchronous key-value storage scoped to one installation
///
/// `put` overwrites unconditionally. Writes to different keys are independent;
/// there is no multi-key atomicity.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn put(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Removing an absent key is not an error
    fn remove(&self, key: &str) -> StoreResult<()>;

    /// All keys, sorted
    fn keys(&self) -> StoreResult<Vec<String>>;

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Keys double as file names, so keep them to a safe alphabet
pub(crate) fn validate_key(key: &str) -> StoreResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}
