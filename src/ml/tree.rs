// ============================================================
// Layer 5 — Decision Tree (CART)
// ============================================================
// A single binary-classification tree grown greedily: at each
// node, try midpoint thresholds over (a random subset of) the
// features and keep the split with the best Gini gain.
//
// Determinism: the only randomness is the feature subsampling
// order, drawn from a ChaCha8 stream keyed by the configured
// seed — the same data and seed always grow the same tree.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Growth limits and seeding for a single tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum depth of the tree
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples each child must keep
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Seed for the feature subsampling stream
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth:         32,
            min_samples_split: 2,
            min_samples_leaf:  1,
            max_features:      None,
            seed:              0,
        }
    }
}

/// One node of the grown tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    /// Terminal node holding the positive-class fraction of the
    /// training samples that reached it
    Leaf { prob: f64, n_samples: usize },

    /// Internal split: rows with feature <= threshold go left
    Split {
        feature:   usize,
        threshold: f64,
        left:      Box<Node>,
        right:     Box<Node>,
    },
}

/// A fitted (or not yet fitted) decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    config: TreeConfig,
    root:   Option<Node>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self { config, root: None }
    }

    /// Grow the tree on `x`/`y`. Labels are 0 (negative) or
    /// positive (treated as class 1).
    ///
    /// Callers validate shapes before reaching this point.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[u32]) {
        let indices: Vec<usize> = (0..x.len()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.root = Some(self.build_node(x, y, &indices, 0, &mut rng));
    }

    fn build_node(
        &self,
        x: &[Vec<f64>],
        y: &[u32],
        indices: &[usize],
        depth: usize,
        rng: &mut ChaCha8Rng,
    ) -> Node {
        let impurity = gini(y, indices);

        // Stop growing: depth limit, too few samples, or pure node
        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || impurity < 1e-10
        {
            return self.leaf(y, indices);
        }

        match self.find_best_split(x, y, indices, impurity, rng) {
            Some((feature, threshold, left_idx, right_idx)) => {
                if left_idx.len() < self.config.min_samples_leaf
                    || right_idx.len() < self.config.min_samples_leaf
                {
                    return self.leaf(y, indices);
                }

                let left  = self.build_node(x, y, &left_idx, depth + 1, rng);
                let right = self.build_node(x, y, &right_idx, depth + 1, rng);
                Node::Split {
                    feature,
                    threshold,
                    left:  Box::new(left),
                    right: Box::new(right),
                }
            }
            None => self.leaf(y, indices),
        }
    }

    fn leaf(&self, y: &[u32], indices: &[usize]) -> Node {
        Node::Leaf {
            prob:      positive_fraction(y, indices),
            n_samples: indices.len(),
        }
    }

    /// Best (feature, threshold, left, right) by Gini gain over
    /// a shuffled subset of the features, or None when no split
    /// improves on the parent.
    fn find_best_split(
        &self,
        x: &[Vec<f64>],
        y: &[u32],
        indices: &[usize],
        parent_impurity: f64,
        rng: &mut ChaCha8Rng,
    ) -> Option<(usize, f64, Vec<usize>, Vec<usize>)> {
        let n_features = x.first().map_or(0, |row| row.len());
        let n_consider = self.config.max_features.unwrap_or(n_features).min(n_features);

        let mut feature_order: Vec<usize> = (0..n_features).collect();
        feature_order.shuffle(rng);
        feature_order.truncate(n_consider);

        let mut best_gain  = 0.0;
        let mut best_split = None;

        for &feature in &feature_order {
            // Candidate thresholds: midpoints between consecutive
            // distinct values of this feature
            let mut values: Vec<f64> = indices.iter().map(|&i| x[i][feature]).collect();
            values.sort_by(|a, b| a.partial_cmp(b).expect("finite feature values"));
            values.dedup();

            for pair in values.windows(2) {
                let threshold = (pair[0] + pair[1]) / 2.0;

                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
                    indices.iter().partition(|&&i| x[i][feature] <= threshold);

                if left_idx.is_empty() || right_idx.is_empty() {
                    continue;
                }

                let n_left  = left_idx.len() as f64;
                let n_right = right_idx.len() as f64;
                let weighted = (n_left * gini(y, &left_idx) + n_right * gini(y, &right_idx))
                    / (n_left + n_right);

                let gain = parent_impurity - weighted;
                if gain > best_gain {
                    best_gain  = gain;
                    best_split = Some((feature, threshold, left_idx, right_idx));
                }
            }
        }

        best_split
    }

    /// Positive-class probability for one row.
    pub fn predict_proba_one(&self, features: &[f64]) -> f64 {
        match &self.root {
            Some(node) => Self::traverse(node, features),
            None => 0.5,
        }
    }

    /// Predicted class id for one row.
    pub fn predict_one(&self, features: &[f64]) -> u32 {
        if self.predict_proba_one(features) > 0.5 { 1 } else { 0 }
    }

    fn traverse(node: &Node, features: &[f64]) -> f64 {
        match node {
            Node::Leaf { prob, .. } => *prob,
            Node::Split { feature, threshold, left, right } => {
                if features[*feature] <= *threshold {
                    Self::traverse(left, features)
                } else {
                    Self::traverse(right, features)
                }
            }
        }
    }
}

/// Gini impurity of the binary labels at `indices`.
fn gini(y: &[u32], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let p = positive_fraction(y, indices);
    2.0 * p * (1.0 - p)
}

/// Fraction of labels at `indices` belonging to class 1.
fn positive_fraction(y: &[u32], indices: &[usize]) -> f64 {
    let positive = indices.iter().filter(|&&i| y[i] > 0).count();
    positive as f64 / indices.len() as f64
}
