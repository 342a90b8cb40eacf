//! Sentiment classification and reputation scoring for collected results.
//!
//! Classification counts Italian cue words in a result's title and snippet;
//! scoring turns the sentiment mix of a source's top five results into a
//! 0-100 reputation score.

pub mod lexicon;
pub mod score;

pub use lexicon::{classify, classify_results, NEGATIVE_CUES, POSITIVE_CUES};
pub use score::{combined_score, reputation_score, status_for, top_five_mix, TOP_N};
