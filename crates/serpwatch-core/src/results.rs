//! Canonical records produced by the normalizer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::PublishedDate;

/// Provider + locale a result was collected from.
///
/// Declaration order is the report's source priority: Google organic
/// results sort ahead of Bing within the same keyword and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "organic-google-it")]
    GoogleOrganic,
    #[serde(rename = "organic-bing-it")]
    BingOrganic,
    #[serde(rename = "google-news")]
    GoogleNews,
    #[serde(rename = "google-images")]
    GoogleImages,
    #[serde(rename = "google-ai-answer")]
    GoogleAiAnswer,
}

impl Source {
    /// Sources queried for every keyword, in report priority order.
    pub const ORGANIC: [Source; 2] = [Source::GoogleOrganic, Source::BingOrganic];

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Source::GoogleOrganic => "organic-google-it",
            Source::BingOrganic => "organic-bing-it",
            Source::GoogleNews => "google-news",
            Source::GoogleImages => "google-images",
            Source::GoogleAiAnswer => "google-ai-answer",
        }
    }

    /// Short human label used in report headers and the email digest.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Source::GoogleOrganic => "Google",
            Source::BingOrganic => "Bing",
            Source::GoogleNews => "Google News",
            Source::GoogleImages => "Google Images",
            Source::GoogleAiAnswer => "Google AI",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "POSITIVE"),
            Sentiment::Negative => write!(f, "NEGATIVE"),
            Sentiment::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// One item returned by one provider for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// 1-based, unique within a (keyword, source) pair.
    pub position: u32,
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub published_date: PublishedDate,
    pub source: Source,
    pub sentiment: Sentiment,
    pub keyword: String,
    pub collected_at: DateTime<Utc>,
}

impl SearchResult {
    /// Text the sentiment classifier looks at.
    #[must_use]
    pub fn classifiable_text(&self) -> String {
        format!("{} {}", self.title, self.snippet)
    }

    #[must_use]
    pub fn has_url(&self) -> bool {
        self.url != crate::NOT_AVAILABLE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResult {
    #[serde(flatten)]
    pub result: SearchResult,
    pub source_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub position: u32,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
    pub source_url: String,
    pub keyword: String,
    pub collected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    pub url: String,
    pub source: String,
}

/// Conversational answer: free text plus the pages it cites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnswer {
    pub keyword: String,
    pub text: String,
    pub citations: Vec<Citation>,
    pub collected_at: DateTime<Utc>,
}
