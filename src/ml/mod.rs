// ============================================================
// Layer 5 — ML Layer
// ============================================================
// All model code lives here; no other layer knows how the
// classifier works internally.
//
// What's in this layer:
//
//   tree.rs      — A single CART decision tree for binary
//                  classification (Gini impurity, midpoint
//                  thresholds, optional feature subsampling)
//
//   forest.rs    — The random forest: bootstrap-sampled trees
//                  with per-tree seeds, majority vote for class
//                  prediction, averaged leaf probabilities for
//                  the probability output
//
//   trainer.rs   — The single deterministic fit call with its
//                  shape precondition
//
//   evaluator.rs — accuracy / precision / recall / AUC against
//                  the held-out test matrix
//
// Reference: Breiman (2001) "Random Forests"

/// Single decision tree (CART, Gini impurity)
pub mod tree;

/// Bootstrap ensemble of decision trees
pub mod forest;

/// Shape-checked deterministic model fitting
pub mod trainer;

/// Test-set scoring and the metrics report
pub mod evaluator;
