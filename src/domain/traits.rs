// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The evaluator is written against this trait instead of the
// concrete forest type, so the scoring code never depends on
// how the model was built — only on what it can answer.
//
// Implementations:
//   - RandomForest (ml::forest) → the pipeline's tree ensemble
//   - test doubles in ml::evaluator's unit tests

// ─── Classifier ───────────────────────────────────────────────────────────────
/// A fitted binary classifier.
///
/// Class ids follow the label encoder: 0 is the negative class,
/// 1 the positive class.
pub trait Classifier {
    /// Predict the class id for every row of `features`.
    fn predict(&self, features: &[Vec<f64>]) -> Vec<u32>;

    /// Positive-class probability for every row, if this model
    /// can produce one. `None` means the model has no probability
    /// output — AUC cannot be computed from it.
    fn predict_proba(&self, features: &[Vec<f64>]) -> Option<Vec<f64>>;
}
