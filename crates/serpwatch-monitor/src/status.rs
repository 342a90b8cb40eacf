//! Shared, snapshot-readable run status.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serpwatch_core::{KeywordSummary, RunPhase, RunStatus};
use tokio::sync::RwLock;

use crate::error::MonitorError;

/// Owner of the single live [`RunStatus`].
///
/// Writers are the active run only; any number of readers take whole-value
/// snapshots, so no single field is ever observed half-written.
#[derive(Debug, Clone, Default)]
pub struct StatusStore {
    inner: Arc<RwLock<RunStatus>>,
}

impl StatusStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> RunStatus {
        self.inner.read().await.clone()
    }

    pub async fn is_running(&self) -> bool {
        self.inner.read().await.running
    }

    /// Replaces the status with a fresh running one.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Busy`] without touching the current status
    /// when a run is already in progress.
    pub async fn try_begin(
        &self,
        total_keywords: usize,
        now: DateTime<Utc>,
    ) -> Result<(), MonitorError> {
        let mut status = self.inner.write().await;
        if status.running {
            return Err(MonitorError::Busy);
        }
        *status = RunStatus::started(total_keywords, now);
        Ok(())
    }

    /// Marks `keyword` (zero-based `index`) as current. Progress reflects the
    /// keywords finished before it and never moves backwards.
    pub async fn begin_keyword(&self, index: usize, keyword: &str) {
        let mut status = self.inner.write().await;
        let progress = progress_percent(index, status.total_keywords);
        status.progress_percent = status.progress_percent.max(progress);
        status.current_keyword = Some(keyword.to_string());
    }

    pub async fn push_summary(&self, summary: KeywordSummary) {
        self.inner.write().await.results.push(summary);
    }

    pub async fn set_persisting(&self) {
        self.inner.write().await.phase = RunPhase::Persisting;
    }

    /// Terminal transition: always leaves the store idle at 100%.
    pub async fn finish(&self, now: DateTime<Utc>) {
        let mut status = self.inner.write().await;
        status.running = false;
        status.phase = RunPhase::Idle;
        status.progress_percent = 100;
        status.finished_at = Some(now);
    }
}

/// `round(100 * done / total)`, 100 for an empty run.
#[must_use]
pub fn progress_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (done.min(total) * 200 + total) / (total * 2);
    u8::try_from(pct).unwrap_or(100)
}
