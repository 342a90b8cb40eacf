//! In-memory sheet model for the report artifact.
//!
//! Building the sheets is pure: the same input and `generated_at` always
//! produce the same [`Workbook`], which [`crate::xlsx`] then renders.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serpwatch_core::{AiAnswer, ImageResult, KeywordSummary, NewsResult, SearchResult, Source};

pub const DETAIL_SHEET: &str = "SERP Detail";
pub const SUMMARY_SHEET: &str = "Summary";
pub const STATISTICS_SHEET: &str = "Statistics";
pub const IMAGES_SHEET: &str = "Images";
pub const NEWS_SHEET: &str = "News";
pub const AI_SHEET: &str = "AI Answers";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Float(f64),
    Empty,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn count(n: usize) -> Self {
        Cell::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }

    fn timestamp(at: DateTime<Utc>) -> Self {
        Cell::Text(at.format(TIMESTAMP_FORMAT).to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Everything one run contributes to the report.
///
/// `None` for an optional collection means the feature was not requested,
/// and its sheet is skipped entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportInput<'a> {
    pub results: &'a [SearchResult],
    pub summaries: &'a [KeywordSummary],
    pub images: Option<&'a [ImageResult]>,
    pub news: Option<&'a [NewsResult]>,
    pub ai_answers: Option<&'a [AiAnswer]>,
}

#[must_use]
pub fn build_workbook(input: &ReportInput<'_>, generated_at: DateTime<Utc>) -> Workbook {
    let mut sheets = vec![
        detail_sheet(input.results),
        summary_sheet(input.summaries),
        statistics_sheet(input, generated_at),
    ];
    if let Some(images) = input.images {
        sheets.push(images_sheet(images));
    }
    if let Some(news) = input.news {
        sheets.push(news_sheet(news));
    }
    if let Some(answers) = input.ai_answers {
        sheets.push(ai_sheet(answers));
    }
    Workbook { sheets }
}

/// Keyword ascending, then newest publication first (unknown dates last),
/// then source priority, then position.
///
/// When no result carries a date the second key is constant and the order
/// reduces to keyword, source, position.
pub fn sort_detail(results: &mut [&SearchResult]) {
    results.sort_by(|a, b| compare_detail(a, b));
}

fn compare_detail(a: &SearchResult, b: &SearchResult) -> Ordering {
    a.keyword
        .cmp(&b.keyword)
        .then_with(|| b.published_date.cmp(&a.published_date))
        .then_with(|| a.source.cmp(&b.source))
        .then_with(|| a.position.cmp(&b.position))
}

fn detail_sheet(results: &[SearchResult]) -> Sheet {
    let mut sorted: Vec<&SearchResult> = results.iter().collect();
    sort_detail(&mut sorted);

    let rows = sorted
        .into_iter()
        .map(|r| {
            vec![
                Cell::text(&r.keyword),
                Cell::text(r.source.tag()),
                Cell::Int(i64::from(r.position)),
                Cell::text(&r.title),
                Cell::text(&r.url),
                Cell::text(&r.snippet),
                Cell::text(r.published_date.to_string()),
                Cell::text(r.sentiment.to_string()),
                Cell::timestamp(r.collected_at),
            ]
        })
        .collect();

    Sheet {
        name: DETAIL_SHEET,
        headers: vec![
            "Keyword",
            "Source",
            "Position",
            "Title",
            "URL",
            "Snippet",
            "Published",
            "Sentiment",
            "Collected At",
        ],
        rows,
    }
}

fn summary_sheet(summaries: &[KeywordSummary]) -> Sheet {
    let score = |s: &KeywordSummary, source: Source| {
        s.breakdown(source)
            .and_then(|b| b.score)
            .map_or(Cell::Empty, |v| Cell::Int(i64::from(v)))
    };

    let rows = summaries
        .iter()
        .map(|s| {
            vec![
                Cell::text(&s.keyword),
                Cell::count(s.count(Source::GoogleOrganic)),
                Cell::count(s.count(Source::BingOrganic)),
                score(s, Source::GoogleOrganic),
                score(s, Source::BingOrganic),
                s.scores.map_or(Cell::Empty, |c| Cell::Float(c.average)),
                s.scores
                    .map_or(Cell::Empty, |c| Cell::text(c.status.to_string())),
                s.news.as_ref().map_or(Cell::Empty, |n| Cell::count(n.len())),
                s.images
                    .as_ref()
                    .map_or(Cell::Empty, |i| Cell::count(i.len())),
                Cell::timestamp(s.timestamp),
            ]
        })
        .collect();

    Sheet {
        name: SUMMARY_SHEET,
        headers: vec![
            "Keyword",
            "Google Results",
            "Bing Results",
            "Google Score",
            "Bing Score",
            "Average Score",
            "Status",
            "News Results",
            "Image Results",
            "Timestamp",
        ],
        rows,
    }
}

/// Mean `position` over all results, 0 when there are none.
#[must_use]
pub fn mean_position(results: &[SearchResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results.iter().map(|r| f64::from(r.position)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = total / results.len() as f64;
    (mean * 10.0).round() / 10.0
}

fn statistics_sheet(input: &ReportInput<'_>, generated_at: DateTime<Utc>) -> Sheet {
    let source_total = |source: Source| -> usize {
        input.summaries.iter().map(|s| s.count(source)).sum()
    };

    let mut rows = vec![
        vec![Cell::text("Total Keywords"), Cell::count(input.summaries.len())],
        vec![
            Cell::text("Google Results"),
            Cell::count(source_total(Source::GoogleOrganic)),
        ],
        vec![
            Cell::text("Bing Results"),
            Cell::count(source_total(Source::BingOrganic)),
        ],
        vec![
            Cell::text("Mean SERP Position"),
            Cell::Float(mean_position(input.results)),
        ],
        vec![Cell::text("Last Run"), Cell::timestamp(generated_at)],
    ];

    if let Some(images) = input.images {
        rows.push(vec![Cell::text("Images Collected"), Cell::count(images.len())]);
    }
    if let Some(news) = input.news {
        rows.push(vec![Cell::text("News Collected"), Cell::count(news.len())]);
    }
    if let Some(answers) = input.ai_answers {
        rows.push(vec![Cell::text("AI Answers"), Cell::count(answers.len())]);
    }

    Sheet {
        name: STATISTICS_SHEET,
        headers: vec!["Metric", "Value"],
        rows,
    }
}

fn images_sheet(images: &[ImageResult]) -> Sheet {
    let rows = images
        .iter()
        .map(|i| {
            vec![
                Cell::text(&i.keyword),
                Cell::Int(i64::from(i.position)),
                Cell::text(&i.title),
                Cell::text(&i.url),
                Cell::text(&i.thumbnail),
                Cell::text(&i.source_url),
                Cell::timestamp(i.collected_at),
            ]
        })
        .collect();

    Sheet {
        name: IMAGES_SHEET,
        headers: vec![
            "Keyword",
            "Position",
            "Title",
            "Image URL",
            "Thumbnail",
            "Source Page",
            "Collected At",
        ],
        rows,
    }
}

fn news_sheet(news: &[NewsResult]) -> Sheet {
    let mut sorted: Vec<&NewsResult> = news.iter().collect();
    sorted.sort_by(|a, b| compare_detail(&a.result, &b.result));

    let rows = sorted
        .into_iter()
        .map(|n| {
            vec![
                Cell::text(&n.result.keyword),
                Cell::Int(i64::from(n.result.position)),
                Cell::text(&n.result.title),
                Cell::text(&n.result.url),
                Cell::text(&n.source_name),
                Cell::text(n.result.published_date.to_string()),
                Cell::text(&n.result.snippet),
                Cell::text(n.result.sentiment.to_string()),
                Cell::timestamp(n.result.collected_at),
            ]
        })
        .collect();

    Sheet {
        name: NEWS_SHEET,
        headers: vec![
            "Keyword",
            "Position",
            "Title",
            "URL",
            "Outlet",
            "Published",
            "Snippet",
            "Sentiment",
            "Collected At",
        ],
        rows,
    }
}

fn ai_sheet(answers: &[AiAnswer]) -> Sheet {
    let rows = answers
        .iter()
        .map(|a| {
            let citations = a
                .citations
                .iter()
                .map(|c| format!("{} - {}", c.title, c.url))
                .collect::<Vec<_>>()
                .join("\n");
            vec![
                Cell::text(&a.keyword),
                Cell::text(&a.text),
                Cell::count(a.citations.len()),
                Cell::Text(citations),
                Cell::timestamp(a.collected_at),
            ]
        })
        .collect();

    Sheet {
        name: AI_SHEET,
        headers: vec!["Keyword", "Answer", "Citation Count", "Citations", "Collected At"],
        rows,
    }
}

#[cfg(test)]
#[path = "sheets_test.rs"]
mod tests;
