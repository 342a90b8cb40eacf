//! Background job scheduler.
//!
//! Registers the recurring monitoring runs driven by the keywords file.

use std::sync::Arc;

use serpwatch_core::{load_keywords, AppConfig, ConfigError, JobSettings};
use serpwatch_monitor::{MonitorError, RunManager};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

const DAILY_CRON: &str = "0 0 9 * * *";
const WEEKLY_CRON: &str = "0 0 18 * * SUN";

/// Builds and starts the background job scheduler.
///
/// The returned handle must be kept alive for the lifetime of the process.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    manager: RunManager,
    config: Arc<AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_monitoring_job(
        &scheduler,
        "daily",
        DAILY_CRON,
        manager.clone(),
        Arc::clone(&config),
    )
    .await?;
    register_monitoring_job(&scheduler, "weekly", WEEKLY_CRON, manager, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_monitoring_job(
    scheduler: &JobScheduler,
    label: &'static str,
    cron: &'static str,
    manager: RunManager,
    config: Arc<AppConfig>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let manager = manager.clone();
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!(schedule = label, "scheduler: starting monitoring run");
            run_scheduled(&manager, &config, label).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(schedule = label, cron, "scheduler: registered monitoring job");
    Ok(())
}

/// Start one run from the keywords file. The run continues in the background.
async fn run_scheduled(manager: &RunManager, config: &AppConfig, label: &str) {
    let settings = match scheduled_settings(config) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(
                schedule = label,
                error = %e,
                "scheduler: cannot load keywords file"
            );
            return;
        }
    };

    match manager.start(settings).await {
        Ok(_ticket) => {}
        Err(MonitorError::Busy) => {
            tracing::warn!(
                schedule = label,
                "scheduler: run already in progress; skipping tick"
            );
        }
        Err(e) => {
            tracing::error!(schedule = label, error = %e, "scheduler: failed to start run");
        }
    }
}

/// Job settings for a scheduled run: the keywords file plus `ALERT_EMAIL`.
fn scheduled_settings(config: &AppConfig) -> Result<JobSettings, ConfigError> {
    load_keywords(&config.keywords_path)?
        .to_job_request(&config.alert_recipients)
        .validate(config.default_target_count, config.max_target_count)
}
