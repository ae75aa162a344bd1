//! Key-value store interface
//!
//! Models browser-local persistent storage: string keys, string values,
//! synchronous access. Multi-key operations are atomic with respect to other
//! calls on the same store.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store lock poisoned")]
    Poisoned,

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

pub trait KeyValueStore: Send + Sync {
    /// Consistent read of several keys
    fn snapshot(&self, keys: &[&str]) -> StoreResult<Vec<Option<String>>>;

    fn set_many(&self, entries: &[(&str, String)]) -> StoreResult<()>;

    /// Missing keys are not an error
    fn remove_many(&self, keys: &[&str]) -> StoreResult<()>;

    /// Apply `entries` only if `guard_key` currently holds `expected`.
    ///
    /// Returns `false` without writing when the guard does not match.
    fn compare_and_swap(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        entries: &[(&str, String)],
    ) -> StoreResult<bool>;

    /// Remove `keys` only if `guard_key` currently holds `expected`
    fn compare_and_remove(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        keys: &[&str],
    ) -> StoreResult<bool>;

    /// Every `(key, value)` whose key ends with `suffix`. Visits the whole
    /// store; meant for periodic maintenance, not request paths.
    fn scan_suffix(&self, suffix: &str) -> StoreResult<Vec<(String, String)>>;

    /// Push buffered writes to durable storage. No-op for stores that do
    /// not buffer.
    fn flush(&self) -> StoreResult<()> {
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.snapshot(&[key])?.pop().flatten())
    }

    fn set(&self, key: &str, value: String) -> StoreResult<()> {
        self.set_many(&[(key, value)])
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.remove_many(&[key])
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn snapshot(&self, keys: &[&str]) -> StoreResult<Vec<Option<String>>> {
        (**self).snapshot(keys)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> StoreResult<()> {
        (**self).set_many(entries)
    }

    fn remove_many(&self, keys: &[&str]) -> StoreResult<()> {
        (**self).remove_many(keys)
    }

    fn compare_and_swap(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        entries: &[(&str, String)],
    ) -> StoreResult<bool> {
        (**self).compare_and_swap(guard_key, expected, entries)
    }

    fn compare_and_remove(
        &self,
        guard_key: &str,
        expected: Option<&str>,
        keys: &[&str],
    ) -> StoreResult<bool> {
        (**self).compare_and_remove(guard_key, expected, keys)
    }

    fn scan_suffix(&self, suffix: &str) -> StoreResult<Vec<(String, String)>> {
        (**self).scan_suffix(suffix)
    }

    fn flush(&self) -> StoreResult<()> {
        (**self).flush()
    }
}
