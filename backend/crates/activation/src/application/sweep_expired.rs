//! Sweep Expired Use Case
//!
//! Runs against the shared store, not a device-scoped view. A device whose
//! activation window has elapsed (or whose timestamp is missing or garbled)
//! loses all four keys, even if it never comes back to read them.

use crate::application::config::ActivationConfig;
use crate::domain::repository::KeyValueStore;
use crate::domain::services::{StorageKeys, within_window};
use kernel::clock::Clock;
use platform::crypto::reveal;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

pub struct SweepExpiredUseCase<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<ActivationConfig>,
}

impl<S, C> SweepExpiredUseCase<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(store: Arc<S>, clock: Arc<C>, config: Arc<ActivationConfig>) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Number of devices purged
    pub fn execute(&self) -> usize {
        let keys = StorageKeys::get();
        let mut prefixes = BTreeSet::new();
        let mut timestamps = BTreeMap::new();

        for suffix in keys.all() {
            let found = match self.store.scan_suffix(suffix) {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to scan activation store");
                    return 0;
                }
            };
            for (key, value) in found {
                let Some(prefix) = key.strip_suffix(suffix) else {
                    continue;
                };
                if suffix == keys.timestamp {
                    timestamps.insert(prefix.to_string(), value);
                }
                prefixes.insert(prefix.to_string());
            }
        }

        let now_ms = self.clock.now_ms();
        let window_ms = self.config.validity_window_ms();
        let mut purged = 0;

        for prefix in prefixes {
            let stamp = timestamps.get(&prefix).map(String::as_str);
            let live = stamp
                .and_then(|raw| reveal(raw).ok())
                .and_then(|plain| plain.trim().parse::<i64>().ok())
                .is_some_and(|ts| within_window(now_ms, ts, window_ms));
            if live {
                continue;
            }

            let timestamp_key = format!("{prefix}{}", keys.timestamp);
            let device_keys: Vec<String> = keys.all().iter().map(|k| format!("{prefix}{k}")).collect();
            let refs: Vec<&str> = device_keys.iter().map(String::as_str).collect();

            // Guarded on the timestamp so a re-activation since the scan survives
            match self.store.compare_and_remove(&timestamp_key, stamp, &refs) {
                Ok(true) => purged += 1,
                Ok(false) => tracing::debug!("Device re-activated during sweep, kept"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired activation"),
            }
        }

        if purged > 0 {
            tracing::info!(purged, "Swept expired activations");
        }
        purged
    }
}
