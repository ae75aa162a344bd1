//! Refund Use Case

use crate::application::config::ActivationConfig;
use crate::application::persisted::{Update, update_record};
use crate::domain::repository::KeyValueStore;
use crate::domain::value_objects::DeviceFingerprint;
use kernel::clock::Clock;
use std::sync::Arc;

/// Give back one use taken by [`UseOnceUseCase`] when the work it paid for
/// failed. Same compare-and-swap guard; never drops `used_count` below zero.
///
/// [`UseOnceUseCase`]: crate::application::use_once::UseOnceUseCase
pub struct RefundUseUseCase<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<ActivationConfig>,
}

impl<S, C> RefundUseUseCase<S, C>
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
            |record| record.refunded(),
        );

        match update {
            Update::Applied(next) => {
                tracing::info!(remaining = next.remaining_uses(), "Activation use refunded");
                true
            }
            Update::Declined(_) => {
                tracing::debug!("Nothing to refund");
                false
            }
            Update::Inactive | Update::Conflicted | Update::Failed => false,
        }
    }
}
