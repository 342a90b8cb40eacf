//! Normalization from raw SerpAPI items to the records in [`serpwatch_core`].
//!
//! Absent or blank text fields become [`NOT_AVAILABLE`] so that downstream
//! code never has to tell an empty string from a missing one.

use chrono::{DateTime, Utc};
use serpwatch_core::{
    AiAnswer, Citation, ImageResult, NewsResult, PublishedDate, SearchResult, Sentiment, Source,
    NOT_AVAILABLE,
};

use crate::types::{
    AiAnswerPage, ImageItem, NewsItem, NewsOutlet, OrganicItem, RawPage, TextBlock,
};

/// Keyword and collection time attached to every record from one page.
#[derive(Debug, Clone, Copy)]
pub struct Stamp<'a> {
    pub keyword: &'a str,
    pub collected_at: DateTime<Utc>,
}

/// Record types the paginator can accumulate.
pub trait PageItem: Sized {
    /// Normalizes every item on `page`, numbering them from `first_position`.
    ///
    /// A page of a different shape yields nothing.
    fn from_page(page: RawPage, first_position: u32, source: Source, stamp: Stamp<'_>)
        -> Vec<Self>;
}

impl PageItem for SearchResult {
    fn from_page(
        page: RawPage,
        first_position: u32,
        source: Source,
        stamp: Stamp<'_>,
    ) -> Vec<Self> {
        match page {
            RawPage::Organic(page) => page
                .organic_results
                .into_iter()
                .zip(first_position..)
                .map(|(item, position)| normalize_organic(item, position, source, stamp))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl PageItem for NewsResult {
    fn from_page(
        page: RawPage,
        first_position: u32,
        _source: Source,
        stamp: Stamp<'_>,
    ) -> Vec<Self> {
        match page {
            RawPage::News(page) => page
                .news_results
                .into_iter()
                .zip(first_position..)
                .map(|(item, position)| normalize_news(item, position, stamp))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl PageItem for ImageResult {
    fn from_page(
        page: RawPage,
        first_position: u32,
        _source: Source,
        stamp: Stamp<'_>,
    ) -> Vec<Self> {
        match page {
            RawPage::Images(page) => page
                .images_results
                .into_iter()
                .zip(first_position..)
                .map(|(item, position)| normalize_image(item, position, stamp))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[must_use]
pub fn normalize_organic(
    item: OrganicItem,
    position: u32,
    source: Source,
    stamp: Stamp<'_>,
) -> SearchResult {
    let published_date = item
        .raw_date()
        .map_or(PublishedDate::Unknown, |raw| {
            PublishedDate::parse(raw, stamp.collected_at)
        });

    SearchResult {
        position,
        title: text_or_sentinel(item.title),
        url: text_or_sentinel(item.link),
        snippet: text_or_sentinel(item.snippet),
        published_date,
        source,
        sentiment: Sentiment::Neutral,
        keyword: stamp.keyword.to_string(),
        collected_at: stamp.collected_at,
    }
}

#[must_use]
pub fn normalize_news(item: NewsItem, position: u32, stamp: Stamp<'_>) -> NewsResult {
    let source_name = text_or_sentinel(
        item.source
            .as_ref()
            .and_then(NewsOutlet::name)
            .map(ToOwned::to_owned),
    );
    let published_date = item
        .date
        .as_deref()
        .map_or(PublishedDate::Unknown, |raw| {
            PublishedDate::parse(raw, stamp.collected_at)
        });

    NewsResult {
        result: SearchResult {
            position,
            title: text_or_sentinel(item.title),
            url: text_or_sentinel(item.link),
            snippet: text_or_sentinel(item.snippet),
            published_date,
            source: Source::GoogleNews,
            sentiment: Sentiment::Neutral,
            keyword: stamp.keyword.to_string(),
            collected_at: stamp.collected_at,
        },
        source_name,
    }
}

#[must_use]
pub fn normalize_image(item: ImageItem, position: u32, stamp: Stamp<'_>) -> ImageResult {
    ImageResult {
        position,
        title: text_or_sentinel(item.title),
        url: text_or_sentinel(item.original.or(item.link.clone())),
        thumbnail: text_or_sentinel(item.thumbnail),
        source_url: text_or_sentinel(item.link),
        keyword: stamp.keyword.to_string(),
        collected_at: stamp.collected_at,
    }
}

/// Joins the answer's text blocks into paragraphs and keeps its references
/// as citations. Returns `None` when the answer has no text.
#[must_use]
pub fn normalize_ai_answer(page: AiAnswerPage, stamp: Stamp<'_>) -> Option<AiAnswer> {
    let mut paragraphs = Vec::new();
    collect_snippets(&page.text_blocks, &mut paragraphs);
    if paragraphs.is_empty() {
        return None;
    }

    let citations = page
        .references
        .into_iter()
        .map(|r| Citation {
            title: text_or_sentinel(r.title),
            url: text_or_sentinel(r.link),
            source: text_or_sentinel(r.source),
        })
        .collect();

    Some(AiAnswer {
        keyword: stamp.keyword.to_string(),
        text: paragraphs.join("\n\n"),
        citations,
        collected_at: stamp.collected_at,
    })
}

fn collect_snippets(blocks: &[TextBlock], out: &mut Vec<String>) {
    for block in blocks {
        if let Some(snippet) = block.snippet.as_deref().map(str::trim) {
            if !snippet.is_empty() {
                out.push(snippet.to_string());
            }
        }
        collect_snippets(&block.list, out);
    }
}

fn text_or_sentinel(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
