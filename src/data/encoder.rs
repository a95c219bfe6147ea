// ============================================================
// Layer 4 — Deduplication & Label Encoder
// ============================================================
// Two small, order-sensitive steps of the preprocess stage:
//
//   (a) drop exact-duplicate rows independently within each
//       split, keeping the first occurrence
//   (b) encode string labels to dense integer ids using a
//       mapping fit ONLY on the training split
//
// The mapping is deterministic: distinct training labels in
// sorted order map to 0..k. Applying it to a label that never
// appeared in training is an explicit UnseenLabel error — a
// label must never be silently coerced to some id.

use std::collections::HashSet;

use crate::domain::dataset::CanonicalRecord;
use crate::domain::error::{PipelineError, Result};

/// Remove exact duplicate (target, text) rows, keeping the
/// first occurrence of each. Row order is otherwise preserved.
pub fn dedup_records(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let before = records.len();

    let mut seen: HashSet<CanonicalRecord> = HashSet::with_capacity(records.len());
    let mut unique = Vec::with_capacity(records.len());
    for record in records {
        if seen.insert(record.clone()) {
            unique.push(record);
        }
    }

    if unique.len() < before {
        tracing::debug!("Removed {} duplicate rows", before - unique.len());
    }
    unique
}

/// Maps categorical labels to dense integer ids.
///
/// Fit on training targets only; the same fitted instance is
/// then applied to the test split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    /// Distinct labels in sorted order; the id of a label is its
    /// position in this Vec
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit the encoder from the training split's target values.
    pub fn fit(records: &[CanonicalRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(PipelineError::EmptyDataset(
                "cannot fit a label encoder on zero rows".to_string(),
            ));
        }

        let mut classes: Vec<String> = records
            .iter()
            .map(|r| r.target.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        classes.sort();

        tracing::debug!("Label encoder fitted with classes {:?}", classes);
        Ok(Self { classes })
    }

    /// Encode one label. Fails with UnseenLabel if the label was
    /// not present when the encoder was fitted.
    pub fn encode(&self, label: &str) -> Result<u32> {
        self.classes
            .iter()
            .position(|c| c == label)
            .map(|i| i as u32)
            .ok_or_else(|| PipelineError::UnseenLabel(label.to_string()))
    }

    /// The fitted classes in id order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let records = vec![
            CanonicalRecord::new("ham", "hello"),
            CanonicalRecord::new("spam", "win cash"),
            CanonicalRecord::new("ham", "hello"),
            CanonicalRecord::new("ham", "see you"),
        ];

        let unique = dedup_records(records);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0], CanonicalRecord::new("ham", "hello"));
        assert_eq!(unique[1], CanonicalRecord::new("spam", "win cash"));
        assert_eq!(unique[2], CanonicalRecord::new("ham", "see you"));
    }

    #[test]
    fn test_same_text_different_label_is_not_a_duplicate() {
        let records = vec![
            CanonicalRecord::new("ham", "free tickets"),
            CanonicalRecord::new("spam", "free tickets"),
        ];
        assert_eq!(dedup_records(records).len(), 2);
    }

    #[test]
    fn test_encoding_is_a_sorted_bijection() {
        let records = vec![
            CanonicalRecord::new("spam", "a"),
            CanonicalRecord::new("ham", "b"),
            CanonicalRecord::new("spam", "c"),
        ];

        let encoder = LabelEncoder::fit(&records).unwrap();
        // Sorted order: ham < spam
        assert_eq!(encoder.classes(), &["ham".to_string(), "spam".to_string()]);
        assert_eq!(encoder.encode("ham").unwrap(), 0);
        assert_eq!(encoder.encode("spam").unwrap(), 1);
        assert_eq!(encoder.n_classes(), 2);
    }

    #[test]
    fn test_fit_is_deterministic_across_row_orders() {
        let a = LabelEncoder::fit(&[
            CanonicalRecord::new("spam", "x"),
            CanonicalRecord::new("ham", "y"),
        ])
        .unwrap();
        let b = LabelEncoder::fit(&[
            CanonicalRecord::new("ham", "y"),
            CanonicalRecord::new("spam", "x"),
        ])
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unseen_label_fails_explicitly() {
        let encoder = LabelEncoder::fit(&[CanonicalRecord::new("ham", "x")]).unwrap();
        let err = encoder.encode("spam").unwrap_err();
        assert!(matches!(err, PipelineError::UnseenLabel(label) if label == "spam"));
    }

    #[test]
    fn test_fit_on_empty_fails() {
        let err = LabelEncoder::fit(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset(_)));
    }
}
