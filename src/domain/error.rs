// ============================================================
// Layer 3 — Pipeline Error Taxonomy
// ============================================================
// Every failure a stage can produce has a dedicated variant, so
// callers can tell a data problem (bad schema, unseen label)
// from an artifact I/O problem without string matching.
//
// Propagation policy: stages never recover locally. An error is
// logged with its originating stage at the application boundary
// and re-raised unchanged — the run stops at the first failing
// stage and its partial output is not valid downstream input.

use thiserror::Error;

/// Result alias used by all stage-level code.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required source column is missing from the raw dataset.
    #[error("required column '{0}' not found in the raw dataset")]
    Schema(String),

    /// The requested stratified split cannot give every class at
    /// least one sample on each side.
    #[error("stratified split infeasible: {0}")]
    Split(String),

    /// A test-split label was never seen while fitting the label
    /// encoder on the training split.
    #[error("label '{0}' was never seen during training — no encoding exists for it")]
    UnseenLabel(String),

    /// Feature matrix and label vector disagree on the row count.
    #[error("feature matrix has {x_rows} rows but the label vector has {y_rows}")]
    ShapeMismatch { x_rows: usize, y_rows: usize },

    /// The classifier cannot produce class probabilities, which
    /// the AUC metric requires.
    #[error("classifier does not expose class probabilities, required for AUC")]
    ProbabilityUnsupported,

    /// A stage received no rows to work with.
    #[error("empty dataset: {0}")]
    EmptyDataset(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Model blob (de)serialization failure.
    #[error("model serialization failed: {0}")]
    Model(#[from] bincode::Error),
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let e = PipelineError::Schema("v2".to_string());
        assert!(e.to_string().contains("v2"));

        let e = PipelineError::ShapeMismatch { x_rows: 10, y_rows: 8 };
        assert!(e.to_string().contains("10"));
        assert!(e.to_string().contains("8"));

        let e = PipelineError::UnseenLabel("maybe-spam".to_string());
        assert!(e.to_string().contains("maybe-spam"));
    }
}
