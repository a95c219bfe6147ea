// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with `clap`.
// All business logic is delegated to Layer 2 (application) —
// this layer only routes, never computes.
//
// Each pipeline stage is its own subcommand so a run can be
// resumed stage by stage after a failure; `run` executes the
// whole pipeline in order.

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Commands;

use crate::application::pipeline_use_case::PipelineUseCase;

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive.
#[derive(Parser, Debug)]
#[command(
    name = "spam-pipeline",
    version = "0.1.0",
    about = "Train and evaluate an SMS spam classifier from a raw labeled CSV."
)]
pub struct Cli {
    /// The pipeline stage to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Ingest(args) => {
                PipelineUseCase::new(args.into_config()?).ingest()?;
                println!("Ingest complete. Raw split saved.");
            }
            Commands::Preprocess(args) => {
                PipelineUseCase::new(args.into_config()?).preprocess()?;
                println!("Preprocess complete. Interim split saved.");
            }
            Commands::Features(args) => {
                PipelineUseCase::new(args.into_config()?).engineer_features()?;
                println!("Feature engineering complete. Matrices saved.");
            }
            Commands::Train(args) => {
                PipelineUseCase::new(args.into_config()?).train()?;
                println!("Training complete. Model saved.");
            }
            Commands::Evaluate(args) => {
                PipelineUseCase::new(args.into_config()?).evaluate()?;
                println!("Evaluation complete. Metrics report saved.");
            }
            Commands::Run(args) => {
                PipelineUseCase::new(args.into_config()?).run()?;
                println!("Pipeline complete. Metrics report saved.");
            }
        }
        Ok(())
    }
}
