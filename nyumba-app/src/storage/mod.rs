//! Durable local key/value storage
//!
//! Each store owns one key and overwrites it in full on every mutation.
//! Writes are fire-and-forget from the store's point of view: a failed write
//! is logged and the in-memory state stays authoritative for the session.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

/// Storage keys owned by the stores
pub mod keys {
    pub const CART: &str = "nyumba_cart";
    pub const SAVED_ITEMS: &str = "nyumba_saved_items";
    pub const CURRENT_USER: &str = "nyumba_current_user";
    pub const USERS: &str = "nyumba_users";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

impl From<StorageError> for shared::AppError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::Json(_) => shared::AppError::storage_corrupted(err.to_string()),
            _ => shared::AppError::storage(err.to_string()),
        }
    }
}

/// String-keyed durable storage, the shape of browser `localStorage`
pub trait LocalStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

pub type SharedStorage = Arc<dyn LocalStorage>;

/// Read and parse a key. Missing, unreadable or unparseable data is `None`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn LocalStorage, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read local storage");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unparseable local storage entry");
            None
        }
    }
}

/// Serialize and overwrite a key, logging failures
pub fn persist_json<T: Serialize + ?Sized>(storage: &dyn LocalStorage, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|json| storage.set(key, &json));

    if let Err(e) = result {
        tracing::warn!(key, error = %e, "Failed to persist local storage entry");
    }
}

/// Remove a key, logging failures
pub fn forget(storage: &dyn LocalStorage, key: &str) {
    if let Err(e) = storage.remove(key) {
        tracing::warn!(key, error = %e, "Failed to remove local storage entry");
    }
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
