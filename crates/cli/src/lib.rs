//! Speech / Silence Classifier Pipeline
//!
//! Reads recorded samples, extracts features, exports them and evaluates a
//! Gaussian naive-Bayes classifier with k-fold cross-validation.

mod config;

pub use crate::config::{OutputConfig, PipelineConfig, ENV_PREFIX};

use anyhow::{Context, Result};
use feature_engine::FeatureExtractor;
use inference_engine::{CrossValidator, Dataset, EvaluationReport};
use sample_reader::SampleReader;
use serde::Serialize;
use std::path::Path;
use storage::{export_features, ExportSummary};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Initialize logging on stderr
pub fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    installed.context("Failed to set tracing subscriber")
}

/// Everything produced by one pipeline invocation
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Samples per class
    pub samples_per_class: usize,
    /// Written files, when export is enabled and succeeded
    pub export: Option<ExportSummary>,
    /// Evaluation of the original ordering
    pub baseline: EvaluationReport,
    /// Evaluations after each reshuffle
    pub shuffled: Vec<EvaluationReport>,
}

impl PipelineReport {
    /// Baseline followed by the reshuffled runs
    pub fn runs(&self) -> impl Iterator<Item = &EvaluationReport> {
        std::iter::once(&self.baseline).chain(&self.shuffled)
    }
}

/// Run the pipeline over the sample directory `input`
pub fn run_pipeline(input: &Path, config: &PipelineConfig) -> Result<PipelineReport> {
    info!("Processing samples in {}", input.display());

    let corpus = SampleReader::new(input)?
        .read_all()
        .with_context(|| format!("reading samples from {}", input.display()))?;

    let extractor = FeatureExtractor::new(config.extraction);
    let silence = extractor
        .extract_all(&corpus.silence)
        .context("extracting silence features")?;
    let speech = extractor
        .extract_all(&corpus.speech)
        .context("extracting speech features")?;

    let export = if config.output.export {
        match export_features(&config.output.dir, &silence, &speech) {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!("Failed to export features to {}: {}", config.output.dir.display(), e);
                None
            }
        }
    } else {
        None
    };

    let dataset = Dataset::new(silence, speech)?;
    let samples_per_class = dataset.len();
    let mut validator = CrossValidator::new(dataset, config.validation.clone())?;

    let baseline = validator.run();
    let shuffled = validator.shuffled_run(config.shuffle_runs);

    info!(
        "Evaluated {} samples per class over {} runs",
        samples_per_class,
        1 + shuffled.len()
    );

    Ok(PipelineReport {
        samples_per_class,
        export,
        baseline,
        shuffled,
    })
}

/// Console rendering of every run
pub fn render_report(report: &PipelineReport) -> String {
    report
        .runs()
        .map(|run| format!("{}\n", run))
        .collect()
}
