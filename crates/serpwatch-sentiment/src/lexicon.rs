//! Cue-word sentiment classifier.

use serpwatch_core::{SearchResult, Sentiment};

/// Lowercase cues that mark a result as negative coverage.
pub const NEGATIVE_CUES: &[&str] = &[
    "scandalo",
    "critica",
    "polemiche",
    "accusa",
    "condanna",
    "fallimento",
    "disastro",
    "problema",
    "errore",
    "bufera",
    "caso",
    "inchiesta",
    "denunciato",
    "arrestato",
    "indagato",
    "controversia",
    "smentita",
];

/// Lowercase cues that mark a result as positive coverage.
pub const POSITIVE_CUES: &[&str] = &[
    "successo",
    "eccellenza",
    "premio",
    "vittoria",
    "innovazione",
    "trionfo",
    "riconoscimento",
    "leadership",
    "merito",
    "onore",
    "apprezzamento",
    "elogio",
    "fiducia",
    "stima",
    "prestigio",
];

/// Classifies `text` by how many distinct cues of each kind it contains.
///
/// Matching is case-insensitive and by substring, so `"Scandalosa"` counts
/// as `scandalo`. Equal counts (including none) are neutral.
#[must_use]
pub fn classify(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let negative = count_cues(&lower, NEGATIVE_CUES);
    let positive = count_cues(&lower, POSITIVE_CUES);

    match negative.cmp(&positive) {
        std::cmp::Ordering::Greater => Sentiment::Negative,
        std::cmp::Ordering::Less => Sentiment::Positive,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}

/// Sets `sentiment` on every result from its title and snippet.
pub fn classify_results(results: &mut [SearchResult]) {
    for result in results {
        result.sentiment = classify(&result.classifiable_text());
    }
}

fn count_cues(lower: &str, cues: &[&str]) -> usize {
    cues.iter().filter(|cue| lower.contains(**cue)).count()
}
