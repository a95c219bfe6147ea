// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// One subcommand per pipeline stage plus `run` for the full
// pipeline. All stages share the same flag set; values left
// unset on the command line come from params.yaml, and values
// missing there fall back to the documented defaults.
//
// clap's derive macros generate the help text, the error
// messages and the type conversions.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::pipeline_use_case::PipelineConfig;
use crate::infra::params::load_params;

/// The pipeline stages available to the user.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the raw CSV, normalize its schema, split train/test
    Ingest(PipelineArgs),

    /// Deduplicate, encode labels and normalize the text column
    Preprocess(PipelineArgs),

    /// Fit TF-IDF on the train split and project both splits
    Features(PipelineArgs),

    /// Fit the random-forest classifier on the train matrix
    Train(PipelineArgs),

    /// Score the model on the test matrix and write the report
    Evaluate(PipelineArgs),

    /// Run all five stages in order
    Run(PipelineArgs),
}

/// Flags shared by every stage.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Path of the raw input dataset (used by ingest/run)
    #[arg(long, default_value = "experiments/spam.csv")]
    pub dataset: PathBuf,

    /// Root directory for all pipeline artifacts
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Path of the parameter file
    #[arg(long, default_value = "params.yaml")]
    pub params: PathBuf,

    /// Test split fraction (overrides params.yaml)
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Split seed (overrides params.yaml)
    #[arg(long)]
    pub seed: Option<u64>,

    /// TF-IDF vocabulary cap (overrides params.yaml)
    #[arg(long)]
    pub max_features: Option<usize>,

    /// Forest size (overrides params.yaml)
    #[arg(long)]
    pub n_estimators: Option<usize>,
}

impl PipelineArgs {
    /// Resolve the final run configuration: params.yaml first,
    /// then command-line overrides on top. This is the boundary
    /// between Layer 1 and Layer 2 — the application layer never
    /// sees clap types.
    pub fn into_config(self) -> anyhow::Result<PipelineConfig> {
        let params = load_params(&self.params)?;

        Ok(PipelineConfig {
            dataset:      self.dataset,
            root:         self.root,
            test_size:    self.test_size.unwrap_or(params.data_ingestion.test_size),
            split_seed:   self.seed.unwrap_or(params.data_ingestion.random_state),
            max_features: self.max_features.unwrap_or(params.feature_engineering.max_features),
            n_estimators: self.n_estimators.unwrap_or(params.model_building.n_estimators),
            model_seed:   params.model_building.random_state,
        })
    }
}
