// ============================================================
// Layer 4 — Text Normalizer
// ============================================================
// Deterministic text → token-string transformation applied to
// every message before vectorization.
//
// Steps, in fixed order:
//   1. lowercase the whole input
//   2. split into word-like units on non-alphanumeric boundaries
//   3. keep a token only if it is not in the English stopword set
//      (splitting on non-alphanumeric chars already guarantees
//      every token is alphanumeric and never pure punctuation)
//   4. reduce each kept token to its stem
//   5. join the stems with single spaces
//
// The transformation is pure and stateless: the same input
// string always yields the same output, independent of any
// dataset context, so it can be applied row-wise to arbitrary
// text. A missing value (the CSV null case) is represented as
// the empty string upstream and passes through unchanged.
//
// Reference: Porter (1980) "An algorithm for suffix stripping"
//            (Snowball English implementation via rust-stemmers)

use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

/// Normalizes free text into a stemmed, stopword-free token string.
pub struct TextNormalizer {
    /// Fixed English stopword set (lowercase)
    stopwords: HashSet<String>,
    /// Fixed English stemmer
    stemmer: Stemmer,
}

impl TextNormalizer {
    /// Create a normalizer for English text.
    pub fn new() -> Self {
        let stopwords = get(LANGUAGE::English).iter().map(|s| s.to_string()).collect();
        Self {
            stopwords,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Normalize one message into its token string.
    ///
    /// Empty input yields the empty string. The output contains
    /// only lowercase alphanumeric stems separated by single
    /// spaces, so normalizing an already-normalized string is a
    /// no-op.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        let mut stems: Vec<String> = Vec::new();
        for token in lowered.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() || self.stopwords.contains(token) {
                continue;
            }
            stems.push(self.stemmer.stem(token).into_owned());
        }

        stems.join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
