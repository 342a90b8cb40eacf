use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::results::{AiAnswer, ImageResult, NewsResult, SearchResult, Source};

/// Qualitative band for a combined reputation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReputationStatus {
    Ok,
    Warning,
    Critical,
}

impl std::fmt::Display for ReputationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReputationStatus::Ok => write!(f, "OK"),
            ReputationStatus::Warning => write!(f, "WARNING"),
            ReputationStatus::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Combined score for one keyword, present only when scoring ran.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub average: f64,
    pub status: ReputationStatus,
}

/// Sentiment mix of the first five results of one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopFiveMix {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceBreakdown {
    pub source: Source,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_five: Option<TopFiveMix>,
    pub results: Vec<SearchResult>,
}

/// Per-keyword outcome of one run.
///
/// Optional feature sets stay `None` when the feature was not requested,
/// which is distinct from `Some(vec![])` (requested, nothing found).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSummary {
    pub keyword: String,
    pub per_source: Vec<SourceBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news: Option<Vec<NewsResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_answer: Option<AiAnswer>,
    pub timestamp: DateTime<Utc>,
}

impl KeywordSummary {
    #[must_use]
    pub fn breakdown(&self, source: Source) -> Option<&SourceBreakdown> {
        self.per_source.iter().find(|b| b.source == source)
    }

    /// Result count for `source`, zero when the source was not queried.
    #[must_use]
    pub fn count(&self, source: Source) -> usize {
        self.breakdown(source).map_or(0, |b| b.count)
    }

    #[must_use]
    pub fn results(&self, source: Source) -> &[SearchResult] {
        self.breakdown(source).map_or(&[], |b| b.results.as_slice())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    #[default]
    Idle,
    Running,
    Persisting,
}

/// Live view of the current (or most recent) run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    pub running: bool,
    pub phase: RunPhase,
    pub progress_percent: u8,
    pub current_keyword: Option<String>,
    pub total_keywords: usize,
    pub results: Vec<KeywordSummary>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunStatus {
    /// Fresh status for a run that is about to process `total_keywords`.
    #[must_use]
    pub fn started(total_keywords: usize, now: DateTime<Utc>) -> Self {
        Self {
            running: true,
            phase: RunPhase::Running,
            progress_percent: 0,
            current_keyword: None,
            total_keywords,
            results: Vec::new(),
            started_at: Some(now),
            finished_at: None,
        }
    }
}
