//! Key-value persistence adapter.
//!
//! Each collection serializes wholesale to a single key on every mutation;
//! there are no incremental updates and no versioning of the stored shape.
//! A missing key loads as an empty collection, not an error.

use crate::error::{Result, StorageError};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;

/// A durable string-keyed store. Backends hold opaque payloads; all
/// serialization happens in [`load_collection`] / [`save_collection`].
pub trait Storage {
    fn load(&self, key: &str) -> std::result::Result<Option<String>, StorageError>;
    fn save(&mut self, key: &str, payload: &str) -> std::result::Result<(), StorageError>;
}

/// Read a whole collection from `key`. Absent key means empty.
pub fn load_collection<T, S>(storage: &S, key: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: Storage,
{
    match storage.load(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw).map_err(StorageError::from)?),
        None => Ok(Vec::new()),
    }
}

/// Rewrite the whole collection under `key`.
pub fn save_collection<T, S>(storage: &mut S, key: &str, items: &[T]) -> Result<()>
where
    T: Serialize,
    S: Storage,
{
    let payload = serde_json::to_string(items).map_err(StorageError::from)?;
    storage.save(key, &payload)?;
    Ok(())
}

/// In-memory backend for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw payload stored under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, payload: &str) -> std::result::Result<(), StorageError> {
        self.entries.insert(key.to_string(), payload.to_string());
        Ok(())
    }
}
