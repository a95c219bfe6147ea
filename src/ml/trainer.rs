// ============================================================
// Layer 5 — Model Trainer
// ============================================================
// The single fit call of the pipeline. The only precondition is
// the shape contract — the feature matrix and label vector must
// agree on the row count — and it is checked before any
// training work begins.

use crate::domain::error::{PipelineError, Result};
use crate::ml::forest::{ForestConfig, RandomForest};

/// The externally tunable training parameters.
#[derive(Debug, Clone, Copy)]
pub struct TrainParams {
    pub n_estimators: usize,
    pub random_state: u64,
}

/// Fit a random forest on the training matrix.
///
/// Fails with ShapeMismatch before fitting if `x` and `y`
/// disagree on the number of rows.
pub fn train_model(x: &[Vec<f64>], y: &[u32], params: TrainParams) -> Result<RandomForest> {
    if x.len() != y.len() {
        return Err(PipelineError::ShapeMismatch {
            x_rows: x.len(),
            y_rows: y.len(),
        });
    }
    if x.is_empty() {
        return Err(PipelineError::EmptyDataset(
            "cannot train on zero samples".to_string(),
        ));
    }

    tracing::debug!(
        "Training random forest: {} trees, seed {}, {} samples",
        params.n_estimators,
        params.random_state,
        x.len()
    );

    let mut forest = RandomForest::new(ForestConfig {
        n_estimators: params.n_estimators,
        random_state: params.random_state,
        ..Default::default()
    });
    forest.fit(x, y);

    tracing::debug!("Model training completed");
    Ok(forest)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_fails_before_fitting() {
        let x = vec![vec![0.0], vec![1.0], vec![2.0]];
        let y = vec![0, 1];

        let err = train_model(&x, &y, TrainParams { n_estimators: 5, random_state: 2 })
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::ShapeMismatch { x_rows: 3, y_rows: 2 }
        ));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = train_model(&[], &[], TrainParams { n_estimators: 5, random_state: 2 })
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset(_)));
    }

    #[test]
    fn test_trains_with_requested_ensemble_size() {
        let x: Vec<Vec<f64>> = (0..40).map(|i| vec![i as f64]).collect();
        let y: Vec<u32> = (0..40).map(|i| u32::from(i >= 20)).collect();

        let model = train_model(&x, &y, TrainParams { n_estimators: 7, random_state: 2 })
            .unwrap();
        assert_eq!(model.n_trees(), 7);
    }
}
