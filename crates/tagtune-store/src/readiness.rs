//! Bounded wait for a settings store to become ready.
//!
//! Probing happens on a fixed interval up to an attempt ceiling. A caller
//! that learns about readiness through some other channel can call
//! [`Readiness::notify_ready`] to cut the current interval short; the store
//! is still probed before it is reported ready.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, info, warn};

use tagtune_core::logging::SUBSYSTEM_STORE;
use tagtune_core::{Error, Result, SettingsStore};

use crate::config::StoreConfig;

/// Readiness gate with an attempt ceiling and an early-wake notification.
#[derive(Debug)]
pub struct Readiness {
    notify: Notify,
    max_attempts: u32,
    interval: Duration,
}

impl Readiness {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            notify: Notify::new(),
            max_attempts,
            interval,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.ready_max_attempts, config.ready_interval())
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wake a pending wait so it probes again immediately.
    ///
    /// If no wait is pending the wake-up is kept for the next one.
    pub fn notify_ready(&self) {
        self.notify.notify_one();
    }

    /// Probe until `probe` reports ready, returning the attempt that succeeded.
    ///
    /// Probe errors count as "not ready". Fails with [`Error::NotReady`] once
    /// the attempt ceiling is reached.
    pub async fn wait_until_ready<F, Fut>(&self, mut probe: F) -> Result<u32>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        for attempt in 1..=self.max_attempts {
            match probe().await {
                Ok(true) => {
                    info!(
                        subsystem = SUBSYSTEM_STORE,
                        component = "readiness",
                        attempt,
                        "Settings store ready"
                    );
                    return Ok(attempt);
                }
                Ok(false) => debug!(attempt, "Settings store not ready yet"),
                Err(e) => debug!(attempt, error = %e, "Readiness probe errored"),
            }

            if attempt < self.max_attempts {
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {}
                    _ = self.notify.notified() => debug!(attempt, "Readiness wait woken early"),
                }
            }
        }

        warn!(
            subsystem = SUBSYSTEM_STORE,
            component = "readiness",
            attempts = self.max_attempts,
            "Settings store never became ready"
        );
        Err(Error::NotReady {
            attempts: self.max_attempts,
        })
    }
}

/// Wait for `store` to pass its health check.
pub async fn wait_for_store<S>(store: &S, readiness: &Readiness) -> Result<u32>
where
    S: SettingsStore + ?Sized,
{
    readiness.wait_until_ready(|| store.health_check()).await
}
