//! Reputation scoring over the top results of a source.

use serpwatch_core::{ReputationStatus, SearchResult, Sentiment, TopFiveMix};

/// Only this many best-ranked results feed the score.
pub const TOP_N: usize = 5;

const BASE: i32 = 50;
const POSITIVE_WEIGHT: i32 = 20;
const NEGATIVE_WEIGHT: i32 = 15;
const NEUTRAL_WEIGHT: i32 = 10;

/// Sentiment mix of the `TOP_N` results with the lowest positions.
#[must_use]
pub fn top_five_mix(results: &[SearchResult]) -> TopFiveMix {
    let mut ranked: Vec<&SearchResult> = results.iter().collect();
    ranked.sort_by_key(|r| r.position);

    let mut mix = TopFiveMix::default();
    for result in ranked.into_iter().take(TOP_N) {
        match result.sentiment {
            Sentiment::Positive => mix.positive += 1,
            Sentiment::Negative => mix.negative += 1,
            Sentiment::Neutral => mix.neutral += 1,
        }
    }
    mix
}

/// `clamp(50 + 20·positive − 15·negative + 10·neutral, 0, 100)` over the top
/// five results; an empty set scores 0.
#[must_use]
pub fn reputation_score(results: &[SearchResult]) -> u8 {
    if results.is_empty() {
        return 0;
    }
    let mix = top_five_mix(results);
    // Each count is at most TOP_N.
    let count = |n: usize| i32::try_from(n).unwrap_or(0);
    let raw = BASE + POSITIVE_WEIGHT * count(mix.positive)
        - NEGATIVE_WEIGHT * count(mix.negative)
        + NEUTRAL_WEIGHT * count(mix.neutral);
    u8::try_from(raw.clamp(0, 100)).unwrap_or(0)
}

/// Mean score over the sources that returned anything.
///
/// `per_source` pairs each source's result count with its score. Sources
/// with no results are left out; with none left the combined score is 0.
#[must_use]
pub fn combined_score(per_source: &[(usize, u8)]) -> f64 {
    let scored: Vec<f64> = per_source
        .iter()
        .filter(|(count, _)| *count > 0)
        .map(|(_, score)| f64::from(*score))
        .collect();
    if scored.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = scored.iter().sum::<f64>() / scored.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// OK from 70, WARNING from 40, CRITICAL below.
#[must_use]
pub fn status_for(score: f64) -> ReputationStatus {
    if score >= 70.0 {
        ReputationStatus::Ok
    } else if score >= 40.0 {
        ReputationStatus::Warning
    } else {
        ReputationStatus::Critical
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use serpwatch_core::{PublishedDate, Source};

    use super::*;

    fn result(position: u32, sentiment: Sentiment) -> SearchResult {
        SearchResult {
            position,
            title: "t".to_string(),
            url: "https://x.example".to_string(),
            snippet: "s".to_string(),
            published_date: PublishedDate::Unknown,
            source: Source::GoogleOrganic,
            sentiment,
            keyword: "k".to_string(),
            collected_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    fn results(sentiments: &[Sentiment]) -> Vec<SearchResult> {
        sentiments
            .iter()
            .zip(1..)
            .map(|(s, pos)| result(pos, *s))
            .collect()
    }

    #[test]
    fn empty_scores_zero() {
        assert_eq!(reputation_score(&[]), 0);
    }

    #[test]
    fn three_negative_results_score_five() {
        let rs = results(&[Sentiment::Negative; 3]);
        assert_eq!(reputation_score(&rs), 5);
        assert_eq!(status_for(f64::from(reputation_score(&rs))), ReputationStatus::Critical);
    }

    #[test]
    fn score_is_clamped_to_bounds() {
        assert_eq!(reputation_score(&results(&[Sentiment::Positive; 5])), 100);
        assert_eq!(reputation_score(&results(&[Sentiment::Negative; 5])), 0);
        assert_eq!(reputation_score(&results(&[Sentiment::Neutral; 5])), 100);
    }

    #[test]
    fn score_stays_in_range_for_every_mix() {
        let all = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];
        for a in all {
            for b in all {
                for c in all {
                    let score = reputation_score(&results(&[a, b, c]));
                    assert!(score <= 100);
                }
            }
        }
    }

    #[test]
    fn only_top_five_by_position_count() {
        let mut rs = results(&[Sentiment::Negative; 5]);
        // Worse-ranked positives are ignored even when listed first.
        rs.insert(0, result(9, Sentiment::Positive));
        rs.insert(0, result(8, Sentiment::Positive));
        let mix = top_five_mix(&rs);
        assert_eq!(mix.negative, 5);
        assert_eq!(mix.positive, 0);
        assert_eq!(reputation_score(&rs), 0);
    }

    #[test]
    fn mixed_score() {
        // 50 + 20 - 15 + 10 = 65
        let rs = results(&[Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral]);
        assert_eq!(reputation_score(&rs), 65);
    }

    #[test]
    fn combined_score_means_non_empty_sources() {
        assert!((combined_score(&[(10, 80), (5, 61)]) - 70.5).abs() < f64::EPSILON);
        assert!((combined_score(&[(10, 80), (0, 0)]) - 80.0).abs() < f64::EPSILON);
        assert!((combined_score(&[(0, 0), (3, 5)]) - 5.0).abs() < f64::EPSILON);
        assert!(combined_score(&[(0, 0), (0, 0)]).abs() < f64::EPSILON);
        assert!(combined_score(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn status_bands_include_lower_bound() {
        assert_eq!(status_for(100.0), ReputationStatus::Ok);
        assert_eq!(status_for(70.0), ReputationStatus::Ok);
        assert_eq!(status_for(69.9), ReputationStatus::Warning);
        assert_eq!(status_for(40.0), ReputationStatus::Warning);
        assert_eq!(status_for(39.9), ReputationStatus::Critical);
        assert_eq!(status_for(0.0), ReputationStatus::Critical);
    }
}
