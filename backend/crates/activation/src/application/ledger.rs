//! Activation Ledger
//!
//! One device's view of its activation: redeem a code, check it, spend
//! uses, clear it. All operations are synchronous and infallible from the
//! caller's point of view; failures come back as `false`, `0`, `None` or an
//! unsuccessful [`ActivationOutcome`].
//!
//! ```text
//! Unactivated --activate_code(valid)--> Active(total)
//! Active(n>0) --use_once--> Active(n-1)
//! Active(0)   --use_once--> Active(0)        (returns false)
//! Active(n<U) --refund_use--> Active(n+1)
//! Active(n)   --failed check / clear--> Unactivated
//! ```

use crate::application::activate_code::ActivateCodeUseCase;
use crate::application::check_activation::CheckActivationUseCase;
use crate::application::clear_activation::ClearActivationUseCase;
use crate::application::config::ActivationConfig;
use crate::application::refund_use::RefundUseUseCase;
use crate::application::use_once::UseOnceUseCase;
use crate::domain::code_table::CodeTable;
use crate::domain::entities::{ActivationOutcome, CodeInfo};
use crate::domain::repository::KeyValueStore;
use crate::domain::value_objects::DeviceFingerprint;
use kernel::clock::Clock;
use std::sync::Arc;

pub struct ActivationLedger<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    store: Arc<S>,
    clock: Arc<C>,
    config: Arc<ActivationConfig>,
    codes: Arc<CodeTable>,
    fingerprint: DeviceFingerprint,
}

impl<S, C> ActivationLedger<S, C>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(
        store: Arc<S>,
        clock: Arc<C>,
        config: Arc<ActivationConfig>,
        codes: Arc<CodeTable>,
        fingerprint: DeviceFingerprint,
    ) -> Self {
        Self {
            store,
            clock,
            config,
            codes,
            fingerprint,
        }
    }

    pub fn activate_code(&self, code: &str) -> ActivationOutcome {
        ActivateCodeUseCase::new(
            self.store.clone(),
            self.clock.clone(),
            self.config.clone(),
            self.codes.clone(),
        )
        .execute(code, &self.fingerprint)
    }

    pub fn has_activated_code(&self) -> bool {
        self.checker().is_activated(&self.fingerprint)
    }

    pub fn remaining_uses(&self) -> u32 {
        self.checker().remaining_uses(&self.fingerprint)
    }

    pub fn use_once(&self) -> bool {
        UseOnceUseCase::new(self.store.clone(), self.clock.clone(), self.config.clone())
            .execute(&self.fingerprint)
    }

    /// Undo one `use_once`; `false` when there is nothing to give back
    pub fn refund_use(&self) -> bool {
        RefundUseUseCase::new(self.store.clone(), self.clock.clone(), self.config.clone())
            .execute(&self.fingerprint)
    }

    pub fn current_code_info(&self) -> Option<CodeInfo> {
        self.checker().code_info(&self.fingerprint)
    }

    pub fn clear_activation(&self) {
        ClearActivationUseCase::new(self.store.clone()).execute()
    }

    fn checker(&self) -> CheckActivationUseCase<S, C> {
        CheckActivationUseCase::new(self.store.clone(), self.clock.clone(), self.config.clone())
    }
}
