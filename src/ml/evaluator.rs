// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Scores a fitted classifier against the held-out test matrix
// and produces the final metrics report.
//
//   accuracy   — fraction of correct class predictions
//   precision  — TP / (TP + FP), 0.0 when nothing is predicted
//                positive (never an error)
//   recall     — TP / (TP + FN), 0.0 when no positives exist
//   auc        — rank statistic (Mann-Whitney) over the model's
//                positive-class probabilities; ties get half
//                credit. Requires probability output — a model
//                without one is a hard error.
//
// Metrics are computed once per run and never aggregated.

use crate::domain::dataset::MetricsReport;
use crate::domain::error::{PipelineError, Result};
use crate::domain::traits::Classifier;

/// Evaluate `model` on the test matrix and return the report.
pub fn evaluate_model<C: Classifier>(
    model: &C,
    x_test: &[Vec<f64>],
    y_test: &[u32],
) -> Result<MetricsReport> {
    if x_test.len() != y_test.len() {
        return Err(PipelineError::ShapeMismatch {
            x_rows: x_test.len(),
            y_rows: y_test.len(),
        });
    }
    if x_test.is_empty() {
        return Err(PipelineError::EmptyDataset(
            "cannot evaluate on zero samples".to_string(),
        ));
    }

    let y_pred = model.predict(x_test);
    let y_proba = model
        .predict_proba(x_test)
        .ok_or(PipelineError::ProbabilityUnsupported)?;

    let report = MetricsReport {
        accuracy:  accuracy(y_test, &y_pred),
        precision: precision(y_test, &y_pred),
        recall:    recall(y_test, &y_pred),
        auc:       roc_auc(y_test, &y_proba),
    };

    tracing::debug!(
        "Evaluation: accuracy={:.4} precision={:.4} recall={:.4} auc={:.4}",
        report.accuracy,
        report.precision,
        report.recall,
        report.auc
    );
    Ok(report)
}

/// Fraction of predictions matching the true label.
pub fn accuracy(y_true: &[u32], y_pred: &[u32]) -> f64 {
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// TP / (TP + FP). Returns 0.0 when the model predicts no
/// positives at all — the degenerate case is not an error.
pub fn precision(y_true: &[u32], y_pred: &[u32]) -> f64 {
    let tp = count_pairs(y_true, y_pred, 1, 1);
    let fp = count_pairs(y_true, y_pred, 0, 1);
    if tp + fp == 0 {
        return 0.0;
    }
    tp as f64 / (tp + fp) as f64
}

/// TP / (TP + FN). Returns 0.0 when the test set has no
/// positive samples.
pub fn recall(y_true: &[u32], y_pred: &[u32]) -> f64 {
    let tp = count_pairs(y_true, y_pred, 1, 1);
    let fn_ = count_pairs(y_true, y_pred, 1, 0);
    if tp + fn_ == 0 {
        return 0.0;
    }
    tp as f64 / (tp + fn_) as f64
}

/// Area under the ROC curve via the rank-sum formulation:
///
///   AUC = (R_pos - n_pos(n_pos+1)/2) / (n_pos * n_neg)
///
/// where R_pos is the rank sum of the positive samples under
/// ascending score order, with tied scores sharing their
/// average rank. With a single-class test set the statistic is
/// undefined; 0.5 is returned with a warning (the stratified
/// split never produces that case in the normal pipeline).
pub fn roc_auc(y_true: &[u32], y_score: &[f64]) -> f64 {
    let n_pos = y_true.iter().filter(|&&y| y > 0).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        tracing::warn!("AUC undefined for a single-class test set; reporting 0.5");
        return 0.5;
    }

    // Ascending score order; ties share their average rank
    let mut order: Vec<usize> = (0..y_score.len()).collect();
    order.sort_by(|&a, &b| y_score[a].partial_cmp(&y_score[b]).expect("finite scores"));

    let mut ranks = vec![0.0; y_score.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && y_score[order[j + 1]] == y_score[order[i]] {
            j += 1;
        }
        // Ranks are 1-based; a tie group spanning i..=j gets the
        // average of those positions
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = y_true
        .iter()
        .zip(&ranks)
        .filter(|(&y, _)| y > 0)
        .map(|(_, &r)| r)
        .sum();

    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    (rank_sum_pos - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg)
}

fn count_pairs(y_true: &[u32], y_pred: &[u32], truth: u32, pred: u32) -> usize {
    y_true
        .iter()
        .zip(y_pred)
        .filter(|(&t, &p)| t == truth && p == pred)
        .count()
}
