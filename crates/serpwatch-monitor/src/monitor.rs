//! The run pipeline: collect, aggregate, persist, notify.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use serpwatch_core::{AppConfig, JobSettings, KeywordSummary, Source};
use serpwatch_notify::{load_attachment, Digest, EmailNotifier, Notifier};
use serpwatch_provider::{Paginator, SearchProvider, SerpApiClient};
use serpwatch_report::{append_history, write_report, HistoryEntry, ReportError};
use tokio_util::sync::CancellationToken;

use crate::aggregate::{summarize, KeywordCollection, RunResults};
use crate::error::MonitorError;
use crate::status::StatusStore;

/// Where a run persists its artifacts and how it scores.
#[derive(Debug, Clone)]
pub struct MonitorOptions {
    pub report_path: PathBuf,
    pub history_path: PathBuf,
    pub history_limit: usize,
    pub scoring_enabled: bool,
}

impl MonitorOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            report_path: config.report_path(),
            history_path: config.history_path(),
            history_limit: config.history_limit,
            scoring_enabled: config.scoring_enabled,
        }
    }
}

/// What one finished run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summaries: Vec<KeywordSummary>,
    pub report_written: bool,
    pub history_entries: Option<usize>,
    pub notified: bool,
    pub cancelled: bool,
}

/// Runs monitoring jobs against one provider and status store.
#[derive(Clone)]
pub struct Monitor {
    paginator: Paginator,
    status: StatusStore,
    notifier: Option<Arc<dyn Notifier>>,
    options: MonitorOptions,
}

impl Monitor {
    #[must_use]
    pub fn new(paginator: Paginator, status: StatusStore, options: MonitorOptions) -> Self {
        Self {
            paginator,
            status,
            notifier: None,
            options,
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Wires the SerpAPI client and, when credentials exist, the SMTP
    /// notifier from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Provider`] if the HTTP client cannot be built
    /// or [`MonitorError::Notify`] if the sender address is malformed.
    pub fn from_config(config: &AppConfig, status: StatusStore) -> Result<Self, MonitorError> {
        let provider: Arc<dyn SearchProvider> = Arc::new(SerpApiClient::from_config(config)?);
        let paginator = Paginator::new(provider, Duration::from_millis(config.page_delay_ms));
        let monitor = Self::new(paginator, status, MonitorOptions::from_config(config));

        Ok(match EmailNotifier::from_config(config)? {
            Some(notifier) => monitor.with_notifier(Arc::new(notifier)),
            None => monitor,
        })
    }

    #[must_use]
    pub fn status(&self) -> &StatusStore {
        &self.status
    }

    #[must_use]
    pub fn options(&self) -> &MonitorOptions {
        &self.options
    }

    /// Runs `settings` to completion in the caller's task.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::Busy`] if another run holds the status store.
    pub async fn run(&self, settings: &JobSettings) -> Result<RunOutcome, MonitorError> {
        self.status
            .try_begin(settings.keywords.len(), Utc::now())
            .await?;
        Ok(self.execute(settings, &CancellationToken::new()).await)
    }

    /// Body of a run whose status has already been begun.
    ///
    /// Never fails: collection, persistence, and notification problems are
    /// logged, and the status store always ends idle at 100%.
    pub(crate) async fn execute(
        &self,
        settings: &JobSettings,
        cancel: &CancellationToken,
    ) -> RunOutcome {
        tracing::info!(
            keywords = settings.keywords.len(),
            target = settings.target_count,
            time_filter = %settings.time_filter,
            "monitoring run started"
        );

        let mut summaries = Vec::with_capacity(settings.keywords.len());
        let mut cancelled = false;
        for (index, keyword) in settings.keywords.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!(
                    remaining = settings.keywords.len() - index,
                    "run cancelled; persisting partial results"
                );
                cancelled = true;
                break;
            }
            self.status.begin_keyword(index, keyword).await;
            let summary = self.process_keyword(keyword, settings).await;
            self.status.push_summary(summary.clone()).await;
            summaries.push(summary);
        }

        self.status.set_persisting().await;
        let generated_at = Utc::now();
        let report_written = self.write_report(settings, &summaries, generated_at).await;
        let history_entries = self.append_history(&summaries, generated_at).await;
        let notified = self.notify(settings, &summaries, report_written).await;
        self.status.finish(Utc::now()).await;

        tracing::info!(
            keywords = summaries.len(),
            report_written,
            notified,
            "monitoring run finished"
        );
        RunOutcome {
            summaries,
            report_written,
            history_entries,
            notified,
            cancelled,
        }
    }

    async fn process_keyword(&self, keyword: &str, settings: &JobSettings) -> KeywordSummary {
        let target = settings.target_count;
        let sites = settings.site_filter.as_slice();

        let mut organic = Vec::with_capacity(Source::ORGANIC.len());
        for source in Source::ORGANIC {
            let results = self
                .paginator
                .collect(keyword, target, source, settings.time_filter, sites)
                .await;
            tracing::info!(keyword, %source, count = results.len(), "source collected");
            organic.push((source, results));
        }

        let news = if settings.include_news {
            Some(
                self.paginator
                    .collect_news(keyword, target, settings.time_filter, sites)
                    .await,
            )
        } else {
            None
        };
        let images = if settings.include_images {
            Some(self.paginator.collect_images(keyword, target, sites).await)
        } else {
            None
        };
        let ai_answer = if settings.include_ai {
            self.paginator.fetch_ai_answer(keyword).await
        } else {
            None
        };

        summarize(
            KeywordCollection {
                keyword: keyword.to_string(),
                organic,
                news,
                images,
                ai_answer,
            },
            self.options.scoring_enabled,
            Utc::now(),
        )
    }

    async fn write_report(
        &self,
        settings: &JobSettings,
        summaries: &[KeywordSummary],
        generated_at: DateTime<Utc>,
    ) -> bool {
        let mut run = RunResults::for_job(settings);
        for summary in summaries {
            run.fold(summary);
        }
        let summaries = summaries.to_vec();
        let path = self.options.report_path.clone();

        let written = tokio::task::spawn_blocking(move || {
            write_report(&path, &run.report_input(&summaries), generated_at)
        })
        .await;

        match written {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "failed to write report");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "report writer task failed");
                false
            }
        }
    }

    async fn append_history(
        &self,
        summaries: &[KeywordSummary],
        generated_at: DateTime<Utc>,
    ) -> Option<usize> {
        let entry = HistoryEntry::from_summaries(generated_at, summaries);
        let path = self.options.history_path.clone();
        let limit = self.options.history_limit;

        let appended: Result<Result<usize, ReportError>, _> =
            tokio::task::spawn_blocking(move || append_history(&path, entry, limit)).await;

        match appended {
            Ok(Ok(entries)) => Some(entries),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "failed to update run history");
                None
            }
            Err(e) => {
                tracing::error!(error = %e, "history task failed");
                None
            }
        }
    }

    async fn notify(
        &self,
        settings: &JobSettings,
        summaries: &[KeywordSummary],
        report_written: bool,
    ) -> bool {
        if settings.recipients.is_empty() {
            tracing::info!("no recipients; skipping notification");
            return false;
        }
        let Some(notifier) = &self.notifier else {
            tracing::info!("email not configured; skipping notification");
            return false;
        };

        let attachment = if report_written {
            load_attachment(&self.options.report_path).await
        } else {
            tracing::warn!("report not written this run; sending digest without attachment");
            None
        };
        let digest = Digest::build(summaries, &Local::now()).with_attachment(attachment);

        match notifier.send(&settings.recipients, &digest).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to send digest");
                false
            }
        }
    }
}
