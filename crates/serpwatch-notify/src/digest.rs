//! HTML digest of one monitoring run.

use std::fmt::{self, Write as _};
use std::path::Path;

use chrono::{DateTime, TimeZone};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serpwatch_core::{KeywordSummary, Source};

/// Links listed per organic source.
pub const LINKS_PER_SOURCE: usize = 3;
pub const NEWS_LINKS: usize = 3;
pub const IMAGE_THUMBNAILS: usize = 3;
/// AI answers longer than this many characters are cut with an ellipsis.
pub const AI_EXCERPT_CHARS: usize = 400;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportAttachment {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// A rendered email, ready for any transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub subject: String,
    pub html: String,
    pub attachment: Option<ReportAttachment>,
}

impl Digest {
    #[must_use]
    pub fn build<Tz: TimeZone>(summaries: &[KeywordSummary], generated_at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        Self {
            subject: subject_for(generated_at),
            html: render_html(summaries),
            attachment: None,
        }
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: Option<ReportAttachment>) -> Self {
        self.attachment = attachment;
        self
    }
}

#[must_use]
pub fn subject_for<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    format!("SERP Monitoring Report - {}", at.format("%d/%m/%Y %H:%M"))
}

/// Reads the report file for attaching. A missing or unreadable file is
/// logged and yields `None`; the digest is still sent.
pub async fn load_attachment(path: &Path) -> Option<ReportAttachment> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Some(ReportAttachment {
            filename: path
                .file_name()
                .map_or_else(|| "report.xlsx".to_string(), |n| n.to_string_lossy().into_owned()),
            content_type: XLSX_MIME,
            bytes,
        }),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "report file unavailable; sending digest without attachment"
            );
            None
        }
    }
}

#[must_use]
pub fn render_html(summaries: &[KeywordSummary]) -> String {
    let mut html = String::from(
        "<html><body style=\"font-family: Arial, sans-serif;\"><h2>SERP Monitoring Report</h2>",
    );
    for summary in summaries {
        render_keyword(&mut html, summary);
    }
    html.push_str("</body></html>");
    html
}

fn render_keyword(html: &mut String, summary: &KeywordSummary) {
    let _ = write!(
        html,
        "<div><h3>Keyword: {}</h3>",
        encode_text(&summary.keyword)
    );

    if let Some(card) = summary.scores {
        let _ = write!(
            html,
            "<p>Reputation score: {:.1}/100 ({})</p>",
            card.average, card.status
        );
    }

    for source in Source::ORGANIC {
        let links = summary
            .results(source)
            .iter()
            .filter(|r| r.has_url())
            .take(LINKS_PER_SOURCE)
            .map(|r| (r.title.as_str(), r.url.as_str()));
        render_link_list(html, &format!("{} links", source.label()), links);
    }

    if let Some(news) = &summary.news {
        let links = news
            .iter()
            .filter(|n| n.result.has_url())
            .take(NEWS_LINKS)
            .map(|n| (n.result.title.as_str(), n.result.url.as_str()));
        render_link_list(html, "News", links);
    }

    if let Some(images) = &summary.images {
        let thumbs: Vec<_> = images
            .iter()
            .filter(|i| i.thumbnail != serpwatch_core::NOT_AVAILABLE)
            .take(IMAGE_THUMBNAILS)
            .collect();
        if !thumbs.is_empty() {
            html.push_str("<p><strong>Images:</strong><br>");
            for image in thumbs {
                let _ = write!(
                    html,
                    "<a href=\"{}\"><img src=\"{}\" alt=\"{}\" height=\"80\"></a> ",
                    encode_double_quoted_attribute(&image.url),
                    encode_double_quoted_attribute(&image.thumbnail),
                    encode_double_quoted_attribute(&image.title),
                );
            }
            html.push_str("</p>");
        }
    }

    if let Some(answer) = &summary.ai_answer {
        let _ = write!(
            html,
            "<p><strong>AI answer:</strong><br>{}</p>",
            encode_text(&excerpt(&answer.text, AI_EXCERPT_CHARS))
        );
    }

    html.push_str("</div>");
}

fn render_link_list<'a>(
    html: &mut String,
    heading: &str,
    links: impl Iterator<Item = (&'a str, &'a str)>,
) {
    let mut links = links.peekable();
    if links.peek().is_none() {
        let _ = write!(
            html,
            "<p><strong>{}:</strong> no results found</p>",
            encode_text(heading)
        );
        return;
    }

    let _ = write!(html, "<p><strong>{}:</strong><br>", encode_text(heading));
    for (idx, (title, url)) in links.enumerate() {
        let _ = write!(
            html,
            "{}. <a href=\"{}\">{}</a><br>",
            idx + 1,
            encode_double_quoted_attribute(url),
            encode_text(title)
        );
    }
    html.push_str("</p>");
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "digest_test.rs"]
mod tests;
