//! Per-keyword aggregation and the run-wide result collections.

use chrono::{DateTime, Utc};
use serpwatch_core::{
    AiAnswer, ImageResult, JobSettings, KeywordSummary, NewsResult, ScoreCard, SearchResult,
    Source, SourceBreakdown,
};
use serpwatch_report::ReportInput;
use serpwatch_sentiment::{
    classify, classify_results, combined_score, reputation_score, status_for, top_five_mix,
};

/// Everything collected for one keyword, before classification.
#[derive(Debug, Clone, Default)]
pub struct KeywordCollection {
    pub keyword: String,
    /// Organic results per source, in source priority order.
    pub organic: Vec<(Source, Vec<SearchResult>)>,
    pub news: Option<Vec<NewsResult>>,
    pub images: Option<Vec<ImageResult>>,
    pub ai_answer: Option<AiAnswer>,
}

/// Folds one keyword's collection into a [`KeywordSummary`].
///
/// With `scoring` off, every result stays `NEUTRAL` and the summary carries
/// no scores.
#[must_use]
pub fn summarize(
    collection: KeywordCollection,
    scoring: bool,
    timestamp: DateTime<Utc>,
) -> KeywordSummary {
    let KeywordCollection {
        keyword,
        organic,
        mut news,
        images,
        ai_answer,
    } = collection;

    let per_source: Vec<SourceBreakdown> = organic
        .into_iter()
        .map(|(source, mut results)| {
            if scoring {
                classify_results(&mut results);
            }
            SourceBreakdown {
                source,
                count: results.len(),
                score: scoring.then(|| reputation_score(&results)),
                top_five: scoring.then(|| top_five_mix(&results)),
                results,
            }
        })
        .collect();

    if scoring {
        for item in news.iter_mut().flatten() {
            item.result.sentiment = classify(&item.result.classifiable_text());
        }
    }

    let scores = scoring.then(|| {
        let pairs: Vec<(usize, u8)> = per_source
            .iter()
            .map(|b| (b.count, b.score.unwrap_or(0)))
            .collect();
        let average = combined_score(&pairs);
        ScoreCard {
            average,
            status: status_for(average),
        }
    });

    KeywordSummary {
        keyword,
        per_source,
        scores,
        news,
        images,
        ai_answer,
        timestamp,
    }
}

/// Flattened, run-wide collections handed to the report writer.
///
/// Optional collections are `Some` exactly when the job requested them, so
/// the writer can tell "not requested" from "requested, nothing found".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunResults {
    pub results: Vec<SearchResult>,
    pub images: Option<Vec<ImageResult>>,
    pub news: Option<Vec<NewsResult>>,
    pub ai_answers: Option<Vec<AiAnswer>>,
}

impl RunResults {
    #[must_use]
    pub fn for_job(settings: &JobSettings) -> Self {
        Self {
            results: Vec::new(),
            images: settings.include_images.then(Vec::new),
            news: settings.include_news.then(Vec::new),
            ai_answers: settings.include_ai.then(Vec::new),
        }
    }

    /// Appends `summary`'s results, keeping source attribution and order.
    pub fn fold(&mut self, summary: &KeywordSummary) {
        for breakdown in &summary.per_source {
            self.results.extend(breakdown.results.iter().cloned());
        }
        if let (Some(all), Some(found)) = (&mut self.images, &summary.images) {
            all.extend(found.iter().cloned());
        }
        if let (Some(all), Some(found)) = (&mut self.news, &summary.news) {
            all.extend(found.iter().cloned());
        }
        if let (Some(all), Some(answer)) = (&mut self.ai_answers, &summary.ai_answer) {
            all.push(answer.clone());
        }
    }

    #[must_use]
    pub fn report_input<'a>(&'a self, summaries: &'a [KeywordSummary]) -> ReportInput<'a> {
        ReportInput {
            results: &self.results,
            summaries,
            images: self.images.as_deref(),
            news: self.news.as_deref(),
            ai_answers: self.ai_answers.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serpwatch_core::{
        JobRequest, PublishedDate, ReputationStatus, Sentiment, NOT_AVAILABLE,
    };

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()
    }

    fn result(source: Source, position: u32, title: &str) -> SearchResult {
        SearchResult {
            position,
            title: title.to_string(),
            url: format!("https://x.example/{position}"),
            snippet: NOT_AVAILABLE.to_string(),
            published_date: PublishedDate::Unknown,
            source,
            sentiment: Sentiment::Neutral,
            keyword: "acme".to_string(),
            collected_at: at(),
        }
    }

    fn collection(google: Vec<SearchResult>, bing: Vec<SearchResult>) -> KeywordCollection {
        KeywordCollection {
            keyword: "acme".to_string(),
            organic: vec![(Source::GoogleOrganic, google), (Source::BingOrganic, bing)],
            ..KeywordCollection::default()
        }
    }

    #[test]
    fn three_negative_results_score_critical() {
        let google = (1..=3)
            .map(|p| result(Source::GoogleOrganic, p, "Acme, scandalo in borsa"))
            .collect();
        let summary = summarize(collection(google, Vec::new()), true, at());

        let google = summary.breakdown(Source::GoogleOrganic).unwrap();
        assert_eq!(google.score, Some(5));
        assert_eq!(google.top_five.unwrap().negative, 3);
        assert!(google.results.iter().all(|r| r.sentiment == Sentiment::Negative));

        let card = summary.scores.unwrap();
        assert!((card.average - 5.0).abs() < f64::EPSILON);
        assert_eq!(card.status, ReputationStatus::Critical);
        assert_eq!(summary.breakdown(Source::BingOrganic).unwrap().score, Some(0));
    }

    #[test]
    fn scoring_disabled_leaves_results_neutral_and_unscored() {
        let google = vec![result(Source::GoogleOrganic, 1, "scandalo")];
        let summary = summarize(collection(google, Vec::new()), false, at());

        assert!(summary.scores.is_none());
        let google = summary.breakdown(Source::GoogleOrganic).unwrap();
        assert!(google.score.is_none());
        assert!(google.top_five.is_none());
        assert_eq!(google.results[0].sentiment, Sentiment::Neutral);
        assert_eq!(google.count, 1);
    }

    #[test]
    fn both_sources_empty_score_zero() {
        let summary = summarize(collection(Vec::new(), Vec::new()), true, at());
        let card = summary.scores.unwrap();
        assert!(card.average.abs() < f64::EPSILON);
        assert_eq!(card.status, ReputationStatus::Critical);
    }

    #[test]
    fn unrequested_features_stay_absent() {
        let summary = summarize(collection(Vec::new(), Vec::new()), true, at());
        assert!(summary.news.is_none());
        assert!(summary.images.is_none());
        assert!(summary.ai_answer.is_none());
    }

    #[test]
    fn fold_keeps_source_blocks_and_requested_collections() {
        let settings = JobRequest {
            keywords: vec!["acme".to_string()],
            include_news: true,
            ..JobRequest::default()
        }
        .validate(10, 100)
        .unwrap();

        let mut coll = collection(
            vec![result(Source::GoogleOrganic, 1, "g1"), result(Source::GoogleOrganic, 2, "g2")],
            vec![result(Source::BingOrganic, 1, "b1")],
        );
        coll.news = Some(Vec::new());
        let summary = summarize(coll, false, at());

        let mut run = RunResults::for_job(&settings);
        run.fold(&summary);

        let titles: Vec<&str> = run.results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["g1", "g2", "b1"]);
        assert_eq!(run.news, Some(Vec::new()));
        assert!(run.images.is_none());
        assert!(run.ai_answers.is_none());

        let summaries = [summary];
        let input = run.report_input(&summaries);
        assert_eq!(input.results.len(), 3);
        assert!(input.news.is_some());
        assert!(input.images.is_none());
    }
}
