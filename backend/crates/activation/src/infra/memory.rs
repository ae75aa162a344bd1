//! In-memory key-value store

use crate::domain::repository::{KeyValueStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn snapshot(&self, keys: &[&str]) -> StoreResult<Vec<Option<String>>> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(keys.iter().map(|k| entries.get(*k).cloned()).collect())
    }

    fn set_many(&self, new_entries: &[(&str, String)]) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        for (key, value) in new_entries {
            entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }

    fn compare_and_swap(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        new_entries: &[(&str, String)],
    ) -> StoreResult<bool> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        if entries.get(guard_key).map(String::as_str) != expected {
            return Ok(false);
        }
        for (key, value) in new_entries {
            entries.insert((*key).to_string(), value.clone());
        }
        Ok(true)
    }

    fn compare_and_remove(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        keys: &[&str],
    ) -> StoreResult<bool> {
        let mut entries = self.entries.write().map_err(|_| StoreError::Poisoned)?;
        if entries.get(guard_key).map(String::as_str) != expected {
            return Ok(false);
        }
        for key in keys {
            entries.remove(*key);
        }
        Ok(true)
    }

    fn scan_suffix(&self, suffix: &str) -> StoreResult<Vec<(String, String)>> {
        let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
        Ok(entries
            .iter()
            .filter(|(key, _)| key.ends_with(suffix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        store.set("a", "1".into()).unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        // Removing twice is fine
        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_preserves_order() {
        let store = MemoryStore::new();
        store
            .set_many(&[("x", "1".into()), ("z", "3".into())])
            .unwrap();
        let values = store.snapshot(&["z", "y", "x"]).unwrap();
        assert_eq!(values, vec![Some("3".into()), None, Some("1".into())]);
    }

    #[test]
    fn test_compare_and_swap() {
        let store = MemoryStore::new();
        store.set("guard", "v1".into()).unwrap();

        let swapped = store
            .compare_and_swap("guard", Some("v0"), &[("guard", "v2".into())])
            .unwrap();
        assert!(!swapped);
        assert_eq!(store.get("guard").unwrap().as_deref(), Some("v1"));

        let swapped = store
            .compare_and_swap(
                "guard",
                Some("v1"),
                &[("guard", "v2".into()), ("data", "d".into())],
            )
            .unwrap();
        assert!(swapped);
        assert_eq!(store.get("guard").unwrap().as_deref(), Some("v2"));
        assert_eq!(store.get("data").unwrap().as_deref(), Some("d"));
    }

    #[test]
    fn test_compare_and_remove() {
        let store = MemoryStore::new();
        store
            .set_many(&[("guard", "v1".into()), ("data", "d".into())])
            .unwrap();

        assert!(!store.compare_and_remove("guard", Some("v0"), &["guard", "data"]).unwrap());
        assert_eq!(store.len(), 2);

        assert!(store.compare_and_remove("guard", Some("v1"), &["guard", "data"]).unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn test_scan_suffix() {
        let store = MemoryStore::new();
        store
            .set_many(&[("a:ts", "1".into()), ("b:ts", "2".into()), ("a:rec", "r".into())])
            .unwrap();
        let mut found = store.scan_suffix(":ts").unwrap();
        found.sort();
        assert_eq!(
            found,
            vec![("a:ts".into(), "1".into()), ("b:ts".into(), "2".into())]
        );
    }

    #[test]
    fn test_compare_and_swap_on_absent_guard() {
        let store = MemoryStore::new();
        assert!(
            store
                .compare_and_swap("guard", None, &[("guard", "v1".into())])
                .unwrap()
        );
        assert!(
            !store
                .compare_and_swap("guard", None, &[("guard", "v2".into())])
                .unwrap()
        );
    }
}
