//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{DurableStorage, StorageError};

/// A process-local map standing in for durable storage.
///
/// Values do not survive the process; useful for tests and for hosts that
/// persist state some other way.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage pre-populated with one entry.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.entries().insert(key.into(), value.into());
        storage
    }

    /// Whether a value is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries().contains_key(key)
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A panic mid-insert cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DurableStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_absent_key() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("cartItems").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let storage = MemoryStorage::new();
        storage.write("cartItems", "[]").unwrap();
        assert_eq!(storage.read("cartItems").unwrap().as_deref(), Some("[]"));
        assert!(storage.contains("cartItems"));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let storage = MemoryStorage::with_entry("cartItems", "[]");
        storage.remove("cartItems").unwrap();
        storage.remove("cartItems").unwrap();
        assert!(!storage.contains("cartItems"));
    }
}
