//! Shared read/erase helpers over the persisted activation state

use crate::application::config::ActivationConfig;
use crate::domain::entities::UsageRecord;
use crate::domain::repository::KeyValueStore;
use crate::domain::services::{
    PersistedState, StorageKeys, ValidState, Validity, ValidityCheck, evaluate, record_writes,
};
use crate::domain::value_objects::DeviceFingerprint;
use kernel::clock::Clock;

/// Load the activation if every check passes.
///
/// Invalid state is erased before returning `None`. Store failures are
/// logged and read as "not activated".
pub(crate) fn load_valid<S, C>(
    store: &S,
    clock: &C,
    config: &ActivationConfig,
    fingerprint: &DeviceFingerprint,
) -> Option<ValidState>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    let keys = StorageKeys::get();
    let snapshot = match store.snapshot(&keys.all()) {
        Ok(values) => PersistedState::from_snapshot(values),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read activation state");
            return None;
        }
    };

    let check = ValidityCheck {
        fingerprint,
        now_ms: clock.now_ms(),
        window_ms: config.validity_window_ms(),
        checksum_salt: &config.checksum_salt,
    };

    match evaluate(&snapshot, check) {
        Validity::Absent => None,
        Validity::Invalid(reason) => {
            tracing::info!(%reason, "Activation state invalid, erasing");
            erase(store);
            None
        }
        Validity::Valid(state) => Some(state),
    }
}

/// Remove all four activation keys; missing keys are fine
pub(crate) fn erase<S>(store: &S)
where
    S: KeyValueStore + ?Sized,
{
    if let Err(e) = store.remove_many(&StorageKeys::get().all()) {
        tracing::warn!(error = %e, "Failed to erase activation state");
    }
}

/// How a guarded record update ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Update {
    Applied(UsageRecord),
    /// No valid activation
    Inactive,
    /// `step` declined the current record
    Declined(UsageRecord),
    /// Lost the race `max_update_attempts` times in a row
    Conflicted,
    Failed,
}

/// Read-modify-write of the usage record, guarded by a compare-and-swap on
/// the checksum key.
///
/// A conflict means another writer changed the record in between; the
/// update re-reads and retries. Each conflict is caused by some other
/// caller's successful write, so with at most `max_update_attempts`
/// concurrent callers none of them runs out of attempts.
pub(crate) fn update_record<S, C, F>(
    store: &S,
    clock: &C,
    config: &ActivationConfig,
    fingerprint: &DeviceFingerprint,
    step: F,
) -> Update
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
    F: Fn(&UsageRecord) -> Option<UsageRecord>,
{
    let checksum_key = StorageKeys::get().checksum.as_str();

    for attempt in 1..=config.max_update_attempts.max(1) {
        let Some(state) = load_valid(store, clock, config, fingerprint) else {
            return Update::Inactive;
        };
        let Some(next) = step(&state.record) else {
            return Update::Declined(state.record);
        };

        let writes = match record_writes(&next, &config.checksum_salt) {
            Ok(writes) => writes,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize usage record");
                return Update::Failed;
            }
        };

        match store.compare_and_swap(checksum_key, Some(&state.raw_checksum), &writes) {
            Ok(true) => return Update::Applied(next),
            Ok(false) => tracing::debug!(attempt, "Concurrent usage update, retrying"),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to persist usage update");
                return Update::Failed;
            }
        }
    }

    tracing::warn!(
        attempts = config.max_update_attempts,
        "Gave up updating activation after repeated conflicts"
    );
    Update::Conflicted
}
