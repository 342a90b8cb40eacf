//! The search provider boundary.

use async_trait::async_trait;
use serpwatch_core::{Source, TimeFilter};

use crate::error::ProviderError;

/// Parameters for one provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pub query: String,
    /// 0-based index of the first requested result.
    pub offset: usize,
    pub count: usize,
    pub time_filter: TimeFilter,
}

impl QueryParams {
    #[must_use]
    pub fn new(query: impl Into<String>, offset: usize, count: usize) -> Self {
        Self {
            query: query.into(),
            offset,
            count,
            time_filter: TimeFilter::None,
        }
    }

    #[must_use]
    pub fn with_time_filter(mut self, time_filter: TimeFilter) -> Self {
        self.time_filter = time_filter;
        self
    }
}

/// A search-results API.
///
/// Implementations map `source` and `params` onto their own wire format and
/// return the raw JSON payload; shaping it into records is the normalizer's job.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn query(
        &self,
        source: Source,
        params: &QueryParams,
    ) -> Result<serde_json::Value, ProviderError>;
}
