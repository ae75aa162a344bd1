//! Clear Activation Use Case

use crate::application::persisted::erase;
use crate::domain::repository::KeyValueStore;
use std::sync::Arc;

pub struct ClearActivationUseCase<S>
where
    S: KeyValueStore + ?Sized,
{
    store: Arc<S>,
}

impl<S> ClearActivationUseCase<S>
where
    S: KeyValueStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Idempotent
    pub fn execute(&self) {
        erase(&*self.store);
        tracing::info!("Activation cleared");
    }
}
