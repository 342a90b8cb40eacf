//! Multi-page collection loops driven by [`PageCursor`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serpwatch_core::{AiAnswer, ImageResult, NewsResult, SearchResult, Source, TimeFilter};

use crate::normalize::{normalize_ai_answer, PageItem, Stamp};
use crate::pagination::{PageCursor, PageStep, StopReason, PAGE_SIZE};
use crate::provider::{QueryParams, SearchProvider};
use crate::types::RawPage;

/// Upper bound on the up-front result buffer; larger targets grow on demand.
const MAX_PREALLOCATED: usize = PAGE_SIZE * 10;

/// Drives paginated provider calls for one keyword and source at a time.
///
/// Collection never fails: provider errors are logged and the results
/// accumulated so far are returned.
#[derive(Clone)]
pub struct Paginator {
    provider: Arc<dyn SearchProvider>,
    page_delay: Duration,
}

impl Paginator {
    /// `page_delay` is slept between consecutive page requests, never before
    /// the first one.
    #[must_use]
    pub fn new(provider: Arc<dyn SearchProvider>, page_delay: Duration) -> Self {
        Self {
            provider,
            page_delay,
        }
    }

    /// Collects up to `target` organic results for `keyword` from `source`.
    pub async fn collect(
        &self,
        keyword: &str,
        target: usize,
        source: Source,
        time_filter: TimeFilter,
        site_filter: &[String],
    ) -> Vec<SearchResult> {
        self.paginate(keyword, target, source, time_filter, site_filter)
            .await
    }

    pub async fn collect_news(
        &self,
        keyword: &str,
        target: usize,
        time_filter: TimeFilter,
        site_filter: &[String],
    ) -> Vec<NewsResult> {
        self.paginate(keyword, target, Source::GoogleNews, time_filter, site_filter)
            .await
    }

    /// Image search has no recency parameter, so no time filter is taken.
    pub async fn collect_images(
        &self,
        keyword: &str,
        target: usize,
        site_filter: &[String],
    ) -> Vec<ImageResult> {
        self.paginate(
            keyword,
            target,
            Source::GoogleImages,
            TimeFilter::None,
            site_filter,
        )
        .await
    }

    /// Fetches the single-page AI answer for `keyword`.
    pub async fn fetch_ai_answer(&self, keyword: &str) -> Option<AiAnswer> {
        let source = Source::GoogleAiAnswer;
        let params = QueryParams::new(keyword, 0, 1);
        let value = match self.provider.query(source, &params).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(keyword, %source, error = %e, "AI answer request failed");
                return None;
            }
        };

        let stamp = Stamp {
            keyword,
            collected_at: Utc::now(),
        };
        match RawPage::decode(source, value) {
            Ok(RawPage::AiAnswer(page)) => normalize_ai_answer(page, stamp),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(keyword, %source, error = %e, "AI answer payload malformed");
                None
            }
        }
    }

    async fn paginate<T: PageItem + Send>(
        &self,
        keyword: &str,
        target: usize,
        source: Source,
        time_filter: TimeFilter,
        site_filter: &[String],
    ) -> Vec<T> {
        let query = build_site_query(keyword, site_filter);
        let mut cursor = PageCursor::new(target);
        let mut collected: Vec<T> = Vec::with_capacity(target.min(MAX_PREALLOCATED));

        let reason = loop {
            let (page, offset, count) = match cursor.next_step() {
                PageStep::Fetch {
                    page,
                    offset,
                    count,
                } => (page, offset, count),
                PageStep::Done(reason) => break reason,
            };

            if page > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let params =
                QueryParams::new(query.as_str(), offset, count).with_time_filter(time_filter);
            let value = match self.provider.query(source, &params).await {
                Ok(value) => value,
                Err(e) if e.is_configuration() => {
                    tracing::warn!(
                        keyword,
                        %source,
                        page,
                        error = %e,
                        "provider unavailable; skipping source"
                    );
                    cursor.abort(StopReason::ProviderUnavailable);
                    continue;
                }
                Err(e) => {
                    tracing::warn!(
                        keyword,
                        %source,
                        page,
                        error = %e,
                        "provider call failed; counting page as empty"
                    );
                    cursor.record(0);
                    continue;
                }
            };

            let raw = match RawPage::decode(source, value) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(
                        keyword,
                        %source,
                        page,
                        error = %e,
                        "malformed provider page; counting page as empty"
                    );
                    cursor.record(0);
                    continue;
                }
            };

            let first_position = u32::try_from(collected.len() + 1).unwrap_or(u32::MAX);
            let stamp = Stamp {
                keyword,
                collected_at: Utc::now(),
            };
            let items = T::from_page(raw, first_position, source, stamp);
            tracing::debug!(keyword, %source, page, count = items.len(), "page collected");
            cursor.record(items.len());
            collected.extend(items);
        };

        collected.truncate(target);
        tracing::debug!(
            keyword,
            %source,
            count = collected.len(),
            stop = ?reason,
            "collection finished"
        );
        collected
    }
}

/// Rewrites `keyword` into one domain-scoped sub-query per site, OR-combined.
/// An empty `sites` list leaves the keyword untouched.
#[must_use]
pub fn build_site_query(keyword: &str, sites: &[String]) -> String {
    if sites.is_empty() {
        return keyword.to_string();
    }
    sites
        .iter()
        .map(|site| format!("{keyword} site:{site}"))
        .collect::<Vec<_>>()
        .join(" OR ")
}
