//! In-memory storage backend.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::error::{IpamError, Result};
use crate::storage::Storage;

/// Mutex-guarded map implementing the [`Storage`] contract.
///
/// Suitable for tests and single-process use; nothing survives the value
/// being dropped.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.data.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.data.lock().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.data.lock().contains_key(key))
    }

    fn search(&self, key: &str) -> Result<String> {
        self.data
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| IpamError::NotFound(key.to_string()))
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let data = self.data.lock();

        let mut list: Vec<String> = data
            .keys()
            .filter_map(|key| {
                // Only keys separated from the prefix by a slash count:
                // with "foo/bar/baz" stored, listing "foo/ba" must not
                // match.
                let rest = key.strip_prefix(prefix)?;
                rest.strip_prefix('/').map(String::from)
            })
            .filter(|suffix| !suffix.is_empty())
            .collect();

        if list.is_empty() {
            return Err(IpamError::NotFound(prefix.to_string()));
        }

        list.sort_unstable();
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_search() {
        let storage = MemoryStorage::new();
        storage.put("/a/b", "one").unwrap();
        assert_eq!(storage.search("/a/b").unwrap(), "one");

        storage.put("/a/b", "two").unwrap();
        assert_eq!(storage.search("/a/b").unwrap(), "two");
    }

    #[test]
    fn test_search_missing() {
        let storage = MemoryStorage::new();
        let err = storage.search("/missing").unwrap_err();
        assert!(matches!(err, IpamError::NotFound(_)));
    }

    #[test]
    fn test_exists() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists("/a/b").unwrap());

        storage.put("/a/b", "one").unwrap();
        assert!(storage.exists("/a/b").unwrap());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let storage = MemoryStorage::new();
        storage.put("/a/b", "one").unwrap();

        storage.delete("/a/b").unwrap();
        assert!(!storage.exists("/a/b").unwrap());

        // Deleting again is a no-op, not an error.
        storage.delete("/a/b").unwrap();
    }

    #[test]
    fn test_list_returns_suffixes() {
        let storage = MemoryStorage::new();
        storage.put("/ipam/subnet/10.4.0.0-24", "10.4.0.0/24").unwrap();
        storage.put("/ipam/subnet/10.4.1.0-24", "10.4.1.0/24").unwrap();
        storage.put("/other/key", "x").unwrap();

        let list = storage.list("/ipam/subnet").unwrap();
        assert_eq!(list, vec!["10.4.0.0-24", "10.4.1.0-24"]);
    }

    #[test]
    fn test_list_requires_slash_separator() {
        let storage = MemoryStorage::new();
        storage.put("foo/bar/baz", "x").unwrap();

        assert_eq!(storage.list("foo/bar").unwrap(), vec!["baz"]);

        // "foo/ba" is a string prefix of the key but not a path prefix.
        let err = storage.list("foo/ba").unwrap_err();
        assert!(matches!(err, IpamError::NotFound(_)));
    }

    #[test]
    fn test_list_empty_is_not_found() {
        let storage = MemoryStorage::new();
        let err = storage.list("/ipam/subnet").unwrap_err();
        assert!(matches!(err, IpamError::NotFound(_)));
    }
}
