// ============================================================
// Layer 3 — Dataset Domain Types
// ============================================================
// Each struct here is the exact shape of one inter-stage
// artifact. A stage produces one of these, the workspace
// persists it, and the next stage consumes it read-only —
// nothing is mutated after it has been written.
//
// The flow of shapes through the pipeline:
//
//   raw CSV  →  CanonicalRecord  →  EncodedRecord  →  FeatureMatrix
//                  (ingest)          (preprocess)       (features)
//                                                          │
//                                                          ▼
//                                         model.bin / MetricsReport

use serde::{Deserialize, Serialize};

/// One row of the canonical dataset: a raw label string and the
/// message text. `text` is never null — the schema normalizer
/// substitutes an empty string for missing values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// The class label as it appears in the source data ("ham"/"spam")
    pub target: String,

    /// The free-text message body
    pub text: String,
}

impl CanonicalRecord {
    /// Create a new CanonicalRecord.
    /// Uses impl Into<String> so callers can pass &str or String.
    pub fn new(target: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            text:   text.into(),
        }
    }
}

/// One row after preprocessing: the label has been encoded to a
/// dense integer id (mapping fit on the training split only) and
/// the text has been replaced by its normalized token string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedRecord {
    /// Dense class id assigned by the label encoder (0 or 1 here)
    pub label: u32,

    /// Normalized token string: lowercased, filtered, stemmed
    pub text: String,
}

impl EncodedRecord {
    pub fn new(label: u32, text: impl Into<String>) -> Self {
        Self { label, text: text.into() }
    }
}

/// A fixed-width numeric feature matrix with one label per row.
///
/// The column space is the TF-IDF vocabulary fit on the training
/// split; the test matrix is projected into the identical space,
/// so `n_cols()` is always equal for a train/test pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    /// Row-major feature values, one inner Vec per record
    pub features: Vec<Vec<f64>>,

    /// Encoded class label for each row, same order as `features`
    pub labels: Vec<u32>,
}

impl FeatureMatrix {
    pub fn new(features: Vec<Vec<f64>>, labels: Vec<u32>) -> Self {
        Self { features, labels }
    }

    /// Number of records in the matrix
    pub fn n_rows(&self) -> usize {
        self.features.len()
    }

    /// Width of the feature space (excluding the label)
    pub fn n_cols(&self) -> usize {
        self.features.first().map_or(0, |row| row.len())
    }
}

/// The final evaluation report. Written exactly once per run,
/// never aggregated across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub accuracy:  f64,
    pub precision: f64,
    pub recall:    f64,
    pub auc:       f64,
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_dimensions() {
        let m = FeatureMatrix::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]], vec![0, 1]);
        assert_eq!(m.n_rows(), 2);
        assert_eq!(m.n_cols(), 2);
    }

    #[test]
    fn test_empty_matrix() {
        let m = FeatureMatrix::new(Vec::new(), Vec::new());
        assert_eq!(m.n_rows(), 0);
        assert_eq!(m.n_cols(), 0);
    }

    #[test]
    fn test_canonical_record_equality() {
        // Dedup relies on Eq + Hash over the full (target, text) pair
        let a = CanonicalRecord::new("ham", "see you at lunch");
        let b = CanonicalRecord::new("ham", "see you at lunch");
        let c = CanonicalRecord::new("spam", "see you at lunch");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
