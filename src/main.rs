#![allow(dead_code, unused_imports)]

mod cli;
mod application;
mod domain;
mod data;
mod features;
mod ml;
mod infra;

use anyhow::Result;
use cli::Cli;
use clap::Parser;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spam_pipeline=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
