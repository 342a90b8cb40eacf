//! Single-worker background execution of monitoring runs.

use std::sync::Arc;

use chrono::Utc;
use serpwatch_core::JobSettings;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::MonitorError;
use crate::monitor::{Monitor, RunOutcome};
use crate::status::StatusStore;

/// Starts runs on a background task, at most one at a time.
///
/// A start while a run is active is rejected synchronously with
/// [`MonitorError::Busy`]; there is no queue.
#[derive(Clone)]
pub struct RunManager {
    monitor: Monitor,
    worker: Arc<Semaphore>,
    shutdown: CancellationToken,
}

/// Handle to a started run. Dropping it detaches the run.
pub struct RunTicket {
    handle: JoinHandle<RunOutcome>,
    cancel: CancellationToken,
}

impl RunTicket {
    /// Requests that the run stop before its next keyword. Results gathered
    /// so far are still persisted.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the run to finish. `None` if the worker task panicked.
    pub async fn wait(self) -> Option<RunOutcome> {
        match self.handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(error = %e, "run worker task failed");
                None
            }
        }
    }
}

impl RunManager {
    #[must_use]
    pub fn new(monitor: Monitor) -> Self {
        Self {
            monitor,
            worker: Arc::new(Semaphore::new(1)),
            shutdown: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn status(&self) -> &StatusStore {
        self.monitor.status()
    }

    #[must_use]
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Claims the worker and the status store, then spawns the run.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Busy`] if a run is already active.
    pub async fn start(&self, settings: JobSettings) -> Result<RunTicket, MonitorError> {
        let permit = Arc::clone(&self.worker)
            .try_acquire_owned()
            .map_err(|_| MonitorError::Busy)?;
        self.monitor
            .status()
            .try_begin(settings.keywords.len(), Utc::now())
            .await?;

        let cancel = self.shutdown.child_token();
        let monitor = self.monitor.clone();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let outcome = monitor.execute(&settings, &token).await;
            drop(permit);
            outcome
        });

        Ok(RunTicket { handle, cancel })
    }

    /// Cancels the active run, if any, at its next keyword boundary.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}
