//! Bounded JSON log of past runs.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serpwatch_core::{KeywordSummary, ReputationStatus, Source};

use crate::error::ReportError;
use crate::xlsx::persist_atomically;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySource {
    pub source: Source,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub keyword: String,
    pub sources: Vec<HistorySource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReputationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_count: Option<usize>,
}

impl From<&KeywordSummary> for HistoryRow {
    fn from(summary: &KeywordSummary) -> Self {
        Self {
            keyword: summary.keyword.clone(),
            sources: summary
                .per_source
                .iter()
                .map(|b| HistorySource {
                    source: b.source,
                    count: b.count,
                    score: b.score,
                })
                .collect(),
            average_score: summary.scores.map(|c| c.average),
            status: summary.scores.map(|c| c.status),
            news_count: summary.news.as_ref().map(Vec::len),
            image_count: summary.images.as_ref().map(Vec::len),
        }
    }
}

/// One completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub summaries: Vec<HistoryRow>,
}

impl HistoryEntry {
    #[must_use]
    pub fn from_summaries(timestamp: DateTime<Utc>, summaries: &[KeywordSummary]) -> Self {
        Self {
            timestamp,
            summaries: summaries.iter().map(HistoryRow::from).collect(),
        }
    }

    #[must_use]
    pub fn source_count(&self, source: Source) -> usize {
        self.summaries
            .iter()
            .flat_map(|row| row.sources.iter())
            .filter(|s| s.source == source)
            .map(|s| s.count)
            .sum()
    }
}

/// Reads the history log, oldest entry first. A missing file is an empty
/// history.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the file exists but cannot be read, or
/// [`ReportError::HistoryParse`] if it is not a valid history document.
pub fn load_history(path: &Path) -> Result<Vec<HistoryEntry>, ReportError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ReportError::Io {
                path: path.display().to_string(),
                source,
            })
        }
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).map_err(|source| ReportError::HistoryParse {
        path: path.display().to_string(),
        source,
    })
}

/// Appends `entry` and keeps only the newest `limit` entries (at least one).
///
/// Returns the number of entries stored after the append.
///
/// # Errors
///
/// Propagates read, parse, and write failures.
pub fn append_history(
    path: &Path,
    entry: HistoryEntry,
    limit: usize,
) -> Result<usize, ReportError> {
    let mut entries = load_history(path)?;
    entries.push(entry);

    let keep = limit.max(1);
    if entries.len() > keep {
        let excess = entries.len() - keep;
        entries.drain(..excess);
    }

    let bytes = serde_json::to_vec_pretty(&entries).map_err(ReportError::HistorySerialize)?;
    persist_atomically(path, &bytes)?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "history updated");
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serpwatch_core::{ScoreCard, SourceBreakdown};

    use super::*;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap()
    }

    fn entry(day: u32) -> HistoryEntry {
        HistoryEntry {
            timestamp: at(day),
            summaries: Vec::new(),
        }
    }

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_history(&dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn append_keeps_newest_entries_up_to_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        for day in 1..=5 {
            append_history(&path, entry(day), 3).unwrap();
        }

        let loaded = load_history(&path).unwrap();
        let days: Vec<DateTime<Utc>> = loaded.iter().map(|e| e.timestamp).collect();
        assert_eq!(days, vec![at(3), at(4), at(5)]);
    }

    #[test]
    fn zero_limit_still_keeps_latest_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        append_history(&path, entry(1), 0).unwrap();
        assert_eq!(append_history(&path, entry(2), 0).unwrap(), 1);
        assert_eq!(load_history(&path).unwrap()[0].timestamp, at(2));
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_history(&path).unwrap_err();
        assert!(matches!(err, ReportError::HistoryParse { .. }));
    }

    #[test]
    fn row_mirrors_summary_counts_and_scores() {
        let summary = KeywordSummary {
            keyword: "acme".to_string(),
            per_source: vec![SourceBreakdown {
                source: Source::GoogleOrganic,
                count: 7,
                score: Some(65),
                top_five: None,
                results: Vec::new(),
            }],
            scores: Some(ScoreCard {
                average: 65.0,
                status: ReputationStatus::Warning,
            }),
            news: Some(Vec::new()),
            images: None,
            ai_answer: None,
            timestamp: at(1),
        };

        let entry = HistoryEntry::from_summaries(at(1), std::slice::from_ref(&summary));
        let row = &entry.summaries[0];
        assert_eq!(row.sources[0].count, 7);
        assert_eq!(row.sources[0].score, Some(65));
        assert_eq!(row.status, Some(ReputationStatus::Warning));
        assert_eq!(row.news_count, Some(0));
        assert_eq!(row.image_count, None);
        assert_eq!(entry.source_count(Source::GoogleOrganic), 7);
        assert_eq!(entry.source_count(Source::BingOrganic), 0);
    }
}
