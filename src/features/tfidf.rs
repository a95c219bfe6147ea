// ============================================================
// Layer 4 — TF-IDF Vectorizer
// ============================================================
// Fits a term-weighting vector space on a reference corpus and
// projects arbitrary documents into it.
//
// Fit (training text only):
//   - count total corpus frequency and document frequency per term
//   - keep the top `max_features` terms by corpus frequency
//     (ties broken alphabetically), then store them in sorted
//     term order so column indices are deterministic
//   - idf(t) = ln((1 + n_docs) / (1 + df(t))) + 1   (smoothed)
//
// Transform (any text):
//   - tf(t, d) = raw count of t in d, for vocabulary terms only;
//     terms outside the frozen vocabulary are ignored, never an
//     error
//   - row(d) = L2-normalized tf·idf vector
//   - output row order always matches input row order
//
// Documents are expected to be normalized token strings, so
// tokenization here is a plain whitespace split.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, Result};

/// A TF-IDF vector space, fit once and then frozen.
///
/// Serializable so the features stage can persist its fitted
/// state next to the matrices it produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Upper bound on the vocabulary size
    max_features: usize,

    /// Frozen vocabulary in sorted term order; a term's id is
    /// its position here
    vocabulary: Vec<String>,

    /// Inverse document frequency per vocabulary term
    idf: Vec<f64>,

    /// term → column index, kept in sync with `vocabulary`
    index: HashMap<String, usize>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            vocabulary: Vec::new(),
            idf:        Vec::new(),
            index:      HashMap::new(),
        }
    }

    /// Fit the vocabulary and IDF weights from `documents`.
    /// Any previously fitted state is replaced.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(PipelineError::EmptyDataset(
                "cannot fit a vectorizer on zero documents".to_string(),
            ));
        }

        // Corpus frequency and document frequency per term
        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq:    HashMap<&str, usize> = HashMap::new();
        for doc in documents {
            let mut seen_in_doc: Vec<&str> = Vec::new();
            for term in doc.split_whitespace() {
                *corpus_freq.entry(term).or_insert(0) += 1;
                if !seen_in_doc.contains(&term) {
                    seen_in_doc.push(term);
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        // Top max_features terms by corpus frequency, ties
        // broken alphabetically for a deterministic cut
        let mut ranked: Vec<(&str, usize)> = corpus_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        // Column order is sorted term order
        let mut vocabulary: Vec<String> = ranked.iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();

        let n_docs = documents.len() as f64;
        let idf = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq[term.as_str()] as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        tracing::debug!(
            "Fitted TF-IDF vocabulary: {} terms (cap {})",
            vocabulary.len(),
            self.max_features
        );

        self.vocabulary = vocabulary;
        self.idf        = idf;
        self.index      = index;
        Ok(())
    }

    /// Project `documents` into the frozen vector space.
    ///
    /// Terms not in the vocabulary are skipped. One output row
    /// per input document, in input order, each of width
    /// `n_terms()`.
    pub fn transform(&self, documents: &[String]) -> Vec<Vec<f64>> {
        documents.iter().map(|doc| self.transform_one(doc)).collect()
    }

    /// Fit on `documents`, then transform them.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<Vec<f64>>> {
        self.fit(documents)?;
        Ok(self.transform(documents))
    }

    fn transform_one(&self, doc: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.vocabulary.len()];

        for term in doc.split_whitespace() {
            if let Some(&col) = self.index.get(term) {
                row[col] += 1.0;
            }
        }
        for (col, value) in row.iter_mut().enumerate() {
            *value *= self.idf[col];
        }

        l2_normalize(&mut row);
        row
    }

    /// The frozen vocabulary in column order.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Width of the projected space. Always <= max_features.
    pub fn n_terms(&self) -> usize {
        self.vocabulary.len()
    }
}

/// Scale `vector` to unit L2 norm. A zero vector stays zero.
fn l2_normalize(vector: &mut [f64]) {
    let norm: f64 = vector.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}
