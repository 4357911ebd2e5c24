//! Background sweep of expired verification records
//!
//! Abandoned flows leave records behind that no verify call will ever
//! touch; the sweep keeps the store from growing without bound.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::store::VerificationStore;

/// Periodically removes expired records from the store
///
/// Spawned when the owning service is constructed and aborted on
/// shutdown or drop, so a discarded service never leaves a timer
/// running behind it.
pub struct SweepTask {
    handle: JoinHandle<()>,
}

impl SweepTask {
    /// Spawn the sweep loop with the given interval
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S: VerificationStore + 'static>(store: Arc<S>, interval: Duration) -> Self {
        // tokio's interval panics on a zero period
        let interval = interval.max(Duration::from_secs(1));

        let handle = tokio::spawn(async move {
            info!(
                interval_seconds = interval.as_secs(),
                event = "sweep_task_started",
                "Expired-code sweep task started"
            );

            // First sweep fires one full interval after startup
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);

            loop {
                ticker.tick().await;

                let removed = store.sweep(Utc::now()).await;
                if removed > 0 {
                    info!(
                        removed = removed,
                        event = "sweep_completed",
                        "Removed expired verification codes"
                    );
                } else {
                    debug!(event = "sweep_completed", "No expired verification codes");
                }
            }
        });

        Self { handle }
    }

    /// Stop the sweep loop
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
