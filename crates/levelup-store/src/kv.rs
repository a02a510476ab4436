//! Key-value store wrapper with automatic serialization.

use crate::StoreError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Raw byte-oriented storage port.
///
/// Implementations decide where bytes live (process memory, a browser
/// storage bridge, a file); every operation reports failure explicitly so
/// the layers above can choose their degradation policy.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under a key.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a value under a key, replacing any existing value.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process backend backed by a hash map.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("poisoned lock".to_string()))
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Type-safe store with automatic JSON serialization.
///
/// Provides `get`/`set`/`delete` for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Clone)]
pub struct KvStore {
    backend: Arc<dyn StorageBackend>,
}

impl KvStore {
    /// Create a store over an explicit backend.
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Create a store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// Get a value, or `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.read(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value, replacing any existing value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.write(key, &bytes)
    }

    /// Delete a value.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)
    }

    /// Check if a key exists.
    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.backend.read(key)?.is_some())
    }
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").finish_non_exhaustive()
    }
}

/// Helper to build store keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = store_key!("orders", user_id);
/// // Returns "orders:user123"
/// ```
#[macro_export]
macro_rules! store_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
