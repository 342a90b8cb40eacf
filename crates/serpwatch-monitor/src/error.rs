use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("a monitoring run is already in progress")]
    Busy,

    #[error("provider setup failed: {0}")]
    Provider(#[from] serpwatch_provider::ProviderError),

    #[error("notifier setup failed: {0}")]
    Notify(#[from] serpwatch_notify::NotifyError),
}
