// ============================================================
// Layer 6 — Parameter Loading
// ============================================================
// The externally tunable surface of the pipeline, loaded from
// params.yaml:
//
//   data_ingestion:
//     test_size: 0.2
//     random_state: 2
//   feature_engineering:
//     max_features: 30
//   model_building:
//     n_estimators: 22
//     random_state: 2
//
// Every field carries a default, so a missing file, section or
// key falls back to the values above. Malformed YAML is a hard
// error — a half-read parameter file must never silently
// configure a run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::Result;

/// The full parameter tree, one section per pipeline stage that
/// takes tunables.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub data_ingestion: IngestionParams,

    #[serde(default)]
    pub feature_engineering: FeatureParams,

    #[serde(default)]
    pub model_building: ModelParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionParams {
    /// Share of rows held out for the test split
    #[serde(default = "default_test_size")]
    pub test_size: f64,

    /// Seed for the stratified split
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureParams {
    /// Vocabulary size cap for the TF-IDF space
    #[serde(default = "default_max_features")]
    pub max_features: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Number of trees in the forest
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,

    /// Seed for the forest fit
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

fn default_test_size() -> f64 {
    0.2
}

fn default_random_state() -> u64 {
    2
}

fn default_max_features() -> usize {
    30
}

fn default_n_estimators() -> usize {
    22
}

impl Default for IngestionParams {
    fn default() -> Self {
        Self {
            test_size:    default_test_size(),
            random_state: default_random_state(),
        }
    }
}

impl Default for FeatureParams {
    fn default() -> Self {
        Self { max_features: default_max_features() }
    }
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            random_state: default_random_state(),
        }
    }
}

/// Load parameters from a YAML file.
///
/// A missing file is not an error — the documented defaults are
/// returned (and logged). Malformed YAML propagates as a Yaml
/// error.
pub fn load_params(path: &Path) -> Result<Params> {
    if !path.exists() {
        tracing::warn!(
            "Parameter file '{}' not found — using defaults",
            path.display()
        );
        return Ok(Params::default());
    }

    let text = std::fs::read_to_string(path)?;
    let params: Params = serde_yaml::from_str(&text)?;
    tracing::debug!("Parameters loaded from '{}'", path.display());
    Ok(params)
}
