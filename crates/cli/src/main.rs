//! Speech / Silence Classifier - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use speech_classifier::{init_logging, render_report, run_pipeline, PipelineConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "speech-classifier",
    version,
    about = "Extract speech/silence features and cross-validate a naive-Bayes classifier"
)]
struct Cli {
    /// Directory of sample files (names containing "silence" or "speech")
    input: PathBuf,
    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of cross-validation folds
    #[arg(long)]
    folds: Option<usize>,
    /// Reshuffled repetitions after the first run
    #[arg(long, value_name = "TIMES")]
    shuffle: Option<usize>,
    /// Seed for reshuffling
    #[arg(long)]
    seed: Option<u64>,
    /// Directory for the feature sheet and text dump
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Skip writing the feature sheet and text dump
    #[arg(long)]
    no_export: bool,
    /// Print reports as JSON
    #[arg(long)]
    json: bool,
    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(folds) = self.folds {
            config.validation.fold_count = folds;
        }
        if let Some(times) = self.shuffle {
            config.shuffle_runs = times;
        }
        if let Some(seed) = self.seed {
            config.validation.seed = Some(seed);
        }
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        if self.no_export {
            config.output.export = false;
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json)?;

    info!("=== Speech/Silence Classifier v{} ===", env!("CARGO_PKG_VERSION"));

    let mut config = PipelineConfig::load(cli.config.as_deref()).context("loading configuration")?;
    cli.apply(&mut config);

    let report = run_pipeline(&cli.input, &config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}
