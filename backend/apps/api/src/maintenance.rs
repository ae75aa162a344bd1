//! Activation store upkeep
//!
//! Flushes buffered writes and purges expired devices on fixed intervals.
//! Both are blocking store walks, so they run on the blocking pool.

use activation::{ActivationConfig, KeyValueStore, SweepExpiredUseCase};
use kernel::clock::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

pub struct Maintenance<C: Clock + 'static> {
    pub store: Arc<dyn KeyValueStore>,
    pub clock: Arc<C>,
    pub config: Arc<ActivationConfig>,
}

impl<C: Clock + 'static> Clone for Maintenance<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C: Clock + 'static> Maintenance<C> {
    /// Purge expired devices; returns how many were removed
    pub async fn sweep(&self) -> usize {
        let sweep = SweepExpiredUseCase::new(
            self.store.clone(),
            self.clock.clone(),
            self.config.clone(),
        );
        match tokio::task::spawn_blocking(move || sweep.execute()).await {
            Ok(purged) => purged,
            Err(e) => {
                tracing::error!(error = %e, "Activation sweep task failed");
                0
            }
        }
    }

    pub async fn flush(&self) {
        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || store.flush()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "Failed to flush activation store"),
            Err(e) => tracing::error!(error = %e, "Activation flush task failed"),
        }
    }

    /// Run both jobs until the runtime shuts down. Intervals must be non-zero.
    pub fn spawn(self, flush_every: Duration, sweep_every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut flush_tick = interval(flush_every);
            let mut sweep_tick = interval(sweep_every);
            flush_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            sweep_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = flush_tick.tick() => self.flush().await,
                    _ = sweep_tick.tick() => {
                        self.sweep().await;
                    }
                }
            }
        })
    }
}
