//! Per-device view over a shared store
//!
//! The server holds every device's "local storage" in one backend; each
//! device only sees keys under its own prefix.

use crate::domain::repository::{KeyValueStore, StoreResult};
use kernel::id::DeviceId;
use std::sync::Arc;

pub struct DeviceScopedStore<S: KeyValueStore + ?Sized> {
    inner: Arc<S>,
    prefix: String,
}

impl<S: KeyValueStore + ?Sized> DeviceScopedStore<S> {
    pub fn new(inner: Arc<S>, device_id: DeviceId) -> Self {
        Self {
            inner,
            prefix: format!("{device_id}:"),
        }
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn scoped_entries(&self, entries: &[(&str, String)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| (self.scoped(k), v.clone()))
            .collect()
    }
}

fn borrowed(entries: &[(String, String)]) -> Vec<(&str, String)> {
    entries.iter().map(|(k, v)| (k.as_str(), v.clone())).collect()
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for DeviceScopedStore<S> {
    fn snapshot(&self, keys: &[&str]) -> StoreResult<Vec<Option<String>>> {
        let scoped: Vec<String> = keys.iter().map(|k| self.scoped(k)).collect();
        let refs: Vec<&str> = scoped.iter().map(String::as_str).collect();
        self.inner.snapshot(&refs)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> StoreResult<()> {
        let scoped = self.scoped_entries(entries);
        self.inner.set_many(&borrowed(&scoped))
    }

    fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        let scoped: Vec<String> = keys.iter().map(|k| self.scoped(k)).collect();
        let refs: Vec<&str> = scoped.iter().map(String::as_str).collect();
        self.inner.remove_many(&refs)
    }

    fn compare_and_swap(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        entries: &[(&str, String)],
    ) -> StoreResult<bool> {
        let scoped = self.scoped_entries(entries);
        self.inner
            .compare_and_swap(&self.scoped(guard_key), expected, &borrowed(&scoped))
    }

    fn compare_and_remove(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        keys: &[&str],
    ) -> StoreResult<bool> {
        let scoped: Vec<String> = keys.iter().map(|k| self.scoped(k)).collect();
        let refs: Vec<&str> = scoped.iter().map(String::as_str).collect();
        self.inner
            .compare_and_remove(&self.scoped(guard_key), expected, &refs)
    }

    /// Only this device's keys, with the prefix stripped
    fn scan_suffix(&self, suffix: &str) -> StoreResult<Vec<(String, String)>> {
        Ok(self
            .inner
            .scan_suffix(suffix)?
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(&self.prefix)
                    .map(|plain| (plain.to_string(), value))
            })
            .collect())
    }

    fn flush(&self) -> StoreResult<()> {
        self.inner.flush()
    }
}
