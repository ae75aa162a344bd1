//! Use Once Use Case

use crate::application::config::ActivationConfig;
use crate::application::persisted::{Update, update_record};
use crate::domain::repository::KeyValueStore;
use crate::domain::value_objects::DeviceFingerprint;
use kernel::clock::Clock;
use std::sync::Arc;

/// Consume one use of the current activation.
///
/// Two callers racing on the same count cannot both succeed with the same
/// `used_count`; the loser re-reads and retries. Beyond
/// `max_update_attempts` concurrent callers on one device, a caller may
/// give up and return `false` while uses remain.
pub struct UseOnceUseCase<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<ActivationConfig>,
}

impl<S, C> UseOnceUseCase<S, C>
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

    pub fn execute(&self, fingerprint: &DeviceFingerprint) -> bool {
        let update = update_record(
            &*self.store,
            &*self.clock,
            &self.config,
            fingerprint,
            |record| record.consumed(),
        );

        match update {
            Update::Applied(next) => {
                tracing::info!(
                    used = next.used_count,
                    remaining = next.remaining_uses(),
                    "Activation use consumed"
                );
                true
            }
            Update::Declined(record) => {
                tracing::info!(total_uses = record.total_uses, "Activation exhausted");
                false
            }
            Update::Inactive | Update::Conflicted | Update::Failed => false,
        }
    }
}
