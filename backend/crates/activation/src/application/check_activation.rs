//! Check Activation Use Case
//!
//! Every read goes through the full validity check, so an expired or
//! tampered record is erased no matter which query sees it first.

use crate::application::config::ActivationConfig;
use crate::application::persisted::load_valid;
use crate::domain::entities::CodeInfo;
use crate::domain::repository::KeyValueStore;
use crate::domain::value_objects::DeviceFingerprint;
use kernel::clock::Clock;
use std::sync::Arc;

pub struct CheckActivationUseCase<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<ActivationConfig>,
}

impl<S, C> CheckActivationUseCase<S, C>
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

    pub fn is_activated(&self, fingerprint: &DeviceFingerprint) -> bool {
        load_valid(&*self.store, &*self.clock, &self.config, fingerprint).is_some()
    }

    pub fn remaining_uses(&self, fingerprint: &DeviceFingerprint) -> u32 {
        load_valid(&*self.store, &*self.clock, &self.config, fingerprint)
            .map(|state| state.record.remaining_uses())
            .unwrap_or(0)
    }

    pub fn code_info(&self, fingerprint: &DeviceFingerprint) -> Option<CodeInfo> {
        let state = load_valid(&*self.store, &*self.clock, &self.config, fingerprint)?;
        Some(CodeInfo {
            code: state.record.plain_code()?,
            remaining_uses: state.record.remaining_uses(),
        })
    }
}
