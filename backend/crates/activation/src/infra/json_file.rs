//! JSON-file backed key-value store
//!
//! The whole map lives in memory. Mutations only mark it dirty; [`flush`]
//! writes the file (temp file + rename). The server calls `flush` from a
//! blocking task on an interval, so request handlers never touch the disk.
//! Dropping the store flushes once more.
//!
//! [`flush`]: KeyValueStore::flush

use crate::domain::repository::{KeyValueStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    dirty: AtomicBool,
    /// Serializes flushes so an older snapshot never overwrites a newer one
    flushing: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store, starting empty when the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == IoErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "Opened activation store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            dirty: AtomicBool::new(false),
            flushing: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes made since the last successful flush
    pub fn has_pending_writes(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    fn write_file(&self, bytes: &[u8]) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply a mutation in memory; marks the store dirty when it reports a change
    fn mutate<F>(&self, apply: F) -> StoreResult<bool>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let changed = apply(&mut entries);
        if changed {
            self.dirty.store(true, Ordering::Release);
        }
        Ok(changed)
    }
}

impl KeyValueStore for JsonFileStore {
    fn snapshot(&self, keys: &[&str]) -> StoreResult<Vec<Option<String>>> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(keys.iter().map(|k| entries.get(*k).cloned()).collect())
    }

    fn set_many(&self, new_entries: &[(&str, String)]) -> StoreResult<()> {
        self.mutate(|entries| {
            for (key, value) in new_entries {
                entries.insert((*key).to_string(), value.clone());
            }
            true
        })
        .map(|_| ())
    }

    fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        self.mutate(|entries| {
            let mut changed = false;
            for key in keys {
                changed |= entries.remove(*key).is_some();
            }
            changed
        })
        .map(|_| ())
    }

    fn compare_and_swap(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        new_entries: &[(&str, String)],
    ) -> StoreResult<bool> {
        self.mutate(|entries| {
            if entries.get(guard_key).map(String::as_str) != expected {
                return false;
            }
            for (key, value) in new_entries {
                entries.insert((*key).to_string(), value.clone());
            }
            true
        })
    }

    fn compare_and_remove(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        keys: &[&str],
    ) -> StoreResult<bool> {
        let mut matched = false;
        self.mutate(|entries| {
            if entries.get(guard_key).map(String::as_str) != expected {
                return false;
            }
            matched = true;
            let mut changed = false;
            for key in keys {
                changed |= entries.remove(*key).is_some();
            }
            changed
        })?;
        Ok(matched)
    }

    fn scan_suffix(&self, suffix: &str) -> StoreResult<Vec<(String, String)>> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries
            .iter()
            .filter(|(key, _)| key.ends_with(suffix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn flush(&self) -> StoreResult<()> {
        let _flushing = self.flushing.lock().map_err(|_| StoreError::Poisoned)?;
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        let bytes = {
            let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
            serde_json::to_vec_pretty(&*entries)
        };
        let written = bytes
            .map_err(StoreError::from)
            .and_then(|bytes| self.write_file(&bytes));
        if written.is_err() {
            // Retry on the next flush
            self.dirty.store(true, Ordering::Release);
        }
        written
    }
}

impl Drop for JsonFileStore {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to flush activation store");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::open(&path).unwrap();
        store
            .set_many(&[("a", "1".into()), ("b", "2".into())])
            .unwrap();
        store.remove("b").unwrap();
        // Dropping flushes
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(reopened.get("b").unwrap(), None);
    }

    #[test]
    fn test_failed_compare_and_swap_does_not_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).unwrap();
        store.set("guard", "v1".into()).unwrap();
        store.flush().unwrap();

        assert!(
            !store
                .compare_and_swap("guard", Some("stale"), &[("guard", "v2".into())])
                .unwrap()
        );
        assert!(!store.has_pending_writes());
        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("guard").unwrap().as_deref(), Some("v1"));
    }

    #[test]
    fn test_writes_reach_disk_only_on_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = JsonFileStore::open(&path).unwrap();

        store.set("a", "1".into()).unwrap();
        assert!(store.has_pending_writes());
        assert!(!path.exists());

        store.flush().unwrap();
        assert!(!store.has_pending_writes());
        assert_eq!(
            JsonFileStore::open(&path).unwrap().get("a").unwrap().as_deref(),
            Some("1")
        );
    }

    #[test]
    fn test_guarded_remove_and_scan() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json")).unwrap();
        store
            .set_many(&[("d1:ts", "1".into()), ("d1:rec", "r".into()), ("d2:ts", "2".into())])
            .unwrap();

        assert_eq!(store.scan_suffix(":ts").unwrap().len(), 2);
        assert!(!store.compare_and_remove("d1:ts", Some("9"), &["d1:ts", "d1:rec"]).unwrap());
        assert!(store.compare_and_remove("d1:ts", Some("1"), &["d1:ts", "d1:rec"]).unwrap());
        assert_eq!(store.get("d1:rec").unwrap(), None);
        assert_eq!(store.get("d2:ts").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Format(_))
        ));
    }
}
