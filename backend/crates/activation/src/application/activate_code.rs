//! Activate Code Use Case

use crate::application::config::ActivationConfig;
use crate::domain::code_table::CodeTable;
use crate::domain::entities::{ActivationOutcome, UsageRecord};
use crate::domain::repository::KeyValueStore;
use crate::domain::services::{StorageKeys, record_writes};
use crate::domain::value_objects::{ActivationCode, DeviceFingerprint};
use kernel::clock::Clock;
use platform::crypto::obfuscate;
use std::sync::Arc;

pub const MSG_EMPTY_CODE: &str = "Please enter an activation code";
pub const MSG_INVALID_CODE: &str = "Invalid activation code";
pub const MSG_STORE_FAILED: &str = "Activation could not be saved, please try again";

/// Activate Code Use Case
pub struct ActivateCodeUseCase<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<ActivationConfig>,
    codes: Arc<CodeTable>,
}

impl<S, C> ActivateCodeUseCase<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(
        store: Arc<S>,
        clock: Arc<C>,
        config: Arc<ActivationConfig>,
        codes: Arc<CodeTable>,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            codes,
        }
    }

    /// Redeem `raw_code` on this device.
    ///
    /// A miss leaves existing state untouched. A hit overwrites whatever
    /// activation was there before.
    pub fn execute(&self, raw_code: &str, fingerprint: &DeviceFingerprint) -> ActivationOutcome {
        let Some(code) = ActivationCode::parse(raw_code) else {
            return ActivationOutcome::failure(MSG_EMPTY_CODE);
        };

        let Some(entry) = self.codes.lookup(&code) else {
            tracing::info!("Rejected unknown activation code");
            return ActivationOutcome::failure(MSG_INVALID_CODE);
        };

        let now = self.clock.now();
        let total_uses = entry.uses.get();
        let record = UsageRecord::new(&code, total_uses, now);

        let [record_entry, checksum_entry] =
            match record_writes(&record, &self.config.checksum_salt) {
                Ok(writes) => writes,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize usage record");
                    return ActivationOutcome::failure(MSG_STORE_FAILED);
                }
            };

        let keys = StorageKeys::get();
        let writes = [
            (keys.fingerprint.as_str(), obfuscate(fingerprint.as_str())),
            (
                keys.timestamp.as_str(),
                obfuscate(&now.timestamp_millis().to_string()),
            ),
            record_entry,
            checksum_entry,
        ];

        if let Err(e) = self.store.set_many(&writes) {
            tracing::warn!(error = %e, "Failed to persist activation");
            return ActivationOutcome::failure(MSG_STORE_FAILED);
        }

        tracing::info!(total_uses, "Activation code redeemed");

        ActivationOutcome::activated(
            format!(
                "{} activated, {} uses remaining",
                entry.description, total_uses
            ),
            total_uses,
        )
    }
}
