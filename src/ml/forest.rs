// ============================================================
// Layer 5 — Random Forest
// ============================================================
// Bootstrap ensemble of decision trees:
//   - each tree trains on a bootstrap resample of the data,
//     drawn from a ChaCha8 stream seeded with
//     random_state + tree_index
//   - each split considers ceil(sqrt(n_features)) features
//   - class prediction: averaged leaf probability > 0.5
//   - probability output: mean of the per-tree leaf
//     probabilities
//
// Trees are built one after another; the fit is a single
// deterministic call for a fixed random_state.
//
// Reference: Breiman (2001) "Random Forests"

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::domain::traits::Classifier;
use crate::ml::tree::{DecisionTree, TreeConfig};

/// Forest hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    /// Number of trees in the ensemble
    pub n_estimators: usize,
    /// Base seed; tree i uses random_state + i
    pub random_state: u64,
    /// Depth limit applied to every tree
    pub max_depth: usize,
    /// Minimum samples to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples per child
    pub min_samples_leaf: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators:      100,
            random_state:      0,
            max_depth:         32,
            min_samples_split: 2,
            min_samples_leaf:  1,
        }
    }
}

/// The pipeline's tree-ensemble classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    config: ForestConfig,
    trees:  Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self { config, trees: Vec::new() }
    }

    /// Fit the whole ensemble. Replaces any previous fit.
    ///
    /// Callers validate shapes before reaching this point.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[u32]) {
        let n_samples  = x.len();
        let n_features = x.first().map_or(0, |row| row.len());
        let per_split  = ((n_features as f64).sqrt().ceil() as usize).max(1);

        self.trees = Vec::with_capacity(self.config.n_estimators);
        for i in 0..self.config.n_estimators {
            let seed = self.config.random_state.wrapping_add(i as u64);

            // Bootstrap resample: n_samples draws with replacement
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let sample: Vec<usize> = (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();

            let boot_x: Vec<Vec<f64>> = sample.iter().map(|&j| x[j].clone()).collect();
            let boot_y: Vec<u32>      = sample.iter().map(|&j| y[j]).collect();

            let mut tree = DecisionTree::new(TreeConfig {
                max_depth:         self.config.max_depth,
                min_samples_split: self.config.min_samples_split,
                min_samples_leaf:  self.config.min_samples_leaf,
                max_features:      Some(per_split),
                seed,
            });
            tree.fit(&boot_x, &boot_y);
            self.trees.push(tree);
        }

        tracing::debug!(
            "Fitted {} trees on {} samples x {} features",
            self.trees.len(),
            n_samples,
            n_features
        );
    }

    /// Mean leaf probability across the ensemble for one row.
    pub fn predict_proba_one(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.5;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba_one(features)).sum();
        sum / self.trees.len() as f64
    }

    /// Predicted class id for one row.
    pub fn predict_one(&self, features: &[f64]) -> u32 {
        if self.predict_proba_one(features) > 0.5 { 1 } else { 0 }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &[Vec<f64>]) -> Vec<u32> {
        features.iter().map(|row| self.predict_one(row)).collect()
    }

    fn predict_proba(&self, features: &[Vec<f64>]) -> Option<Vec<f64>> {
        Some(features.iter().map(|row| self.predict_proba_one(row)).collect())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Vec<Vec<f64>>, Vec<u32>) {
        let x: Vec<Vec<f64>> = (0..100)
            .map(|i| vec![i as f64 / 10.0, (i % 7) as f64])
            .collect();
        let y: Vec<u32> = (0..100).map(|i| u32::from(i as f64 / 10.0 > 5.0)).collect();
        (x, y)
    }

    #[test]
    fn test_forest_learns_separable_data() {
        let (x, y) = separable();
        let mut forest = RandomForest::new(ForestConfig {
            n_estimators: 20,
            random_state: 2,
            ..Default::default()
        });
        forest.fit(&x, &y);

        assert_eq!(forest.n_trees(), 20);
        let preds = forest.predict(&x);
        let correct = preds.iter().zip(&y).filter(|(p, l)| p == l).count();
        assert!(correct as f64 / x.len() as f64 > 0.9);
    }

    #[test]
    fn test_fit_is_deterministic_for_a_seed() {
        let (x, y) = separable();

        let mut a = RandomForest::new(ForestConfig {
            n_estimators: 10,
            random_state: 2,
            ..Default::default()
        });
        let mut b = RandomForest::new(ForestConfig {
            n_estimators: 10,
            random_state: 2,
            ..Default::default()
        });
        a.fit(&x, &y);
        b.fit(&x, &y);

        assert_eq!(a.predict_proba(&x), b.predict_proba(&x));
    }

    #[test]
    fn test_probability_output_is_present_and_bounded() {
        let (x, y) = separable();
        let mut forest = RandomForest::new(ForestConfig {
            n_estimators: 5,
            random_state: 0,
            ..Default::default()
        });
        forest.fit(&x, &y);

        let probs = forest.predict_proba(&x).expect("forest exposes probabilities");
        assert_eq!(probs.len(), x.len());
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_serialized_roundtrip_predicts_identically() {
        let (x, y) = separable();
        let mut forest = RandomForest::new(ForestConfig {
            n_estimators: 5,
            random_state: 3,
            ..Default::default()
        });
        forest.fit(&x, &y);

        let blob = bincode::serialize(&forest).unwrap();
        let restored: RandomForest = bincode::deserialize(&blob).unwrap();

        assert_eq!(forest.predict(&x), restored.predict(&x));
        assert_eq!(restored.n_trees(), 5);
    }
}
