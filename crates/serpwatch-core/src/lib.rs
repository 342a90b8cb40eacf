//! Shared domain model and configuration for serpwatch.

pub mod app_config;
pub mod config;
pub mod dates;
pub mod job;
pub mod keywords;
pub mod results;
pub mod summary;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use dates::PublishedDate;
pub use job::{normalize_domain, JobRequest, JobSettings, Recipients, TimeFilter};
pub use keywords::{load_keywords, KeywordsFile};
pub use results::{AiAnswer, Citation, ImageResult, NewsResult, SearchResult, Sentiment, Source};
pub use summary::{
    KeywordSummary, ReputationStatus, RunPhase, RunStatus, ScoreCard, SourceBreakdown, TopFiveMix,
};

/// Placeholder used whenever a provider omits a textual field.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read keywords file {path}: {source}")]
    KeywordsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keywords file: {0}")]
    KeywordsFileParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),

    #[error("invalid job request: {0}")]
    InvalidJob(String),
}
