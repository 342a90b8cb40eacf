use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by search provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from engine {engine}")]
    UnexpectedStatus { status: u16, engine: String },

    #[error("search provider returned an error: {0}")]
    Api(String),

    #[error("search provider API key is not configured")]
    MissingApiKey,

    #[error("invalid search provider base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ProviderError {
    /// `true` for failures that recur on every call regardless of the query.
    /// Pagination stops on these instead of counting an empty page.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProviderError::MissingApiKey | ProviderError::InvalidBaseUrl { .. }
        )
    }
}
