//! Naive-Bayes Inference Engine
//!
//! Evaluates speech/silence classification accuracy of a Gaussian naive-Bayes
//! model with k-fold cross-validation and optional reshuffled repetitions.

mod config;
mod folds;
mod posterior;
mod validator;

pub use config::ValidatorConfig;
pub use folds::{FoldPlan, FoldStatistics, GaussianParams, StatisticsTable};
pub use posterior::Posterior;
pub use validator::{CrossValidator, Dataset, EvaluationReport, FoldOutcome};

use feature_engine::{Feature, SignalClass};
use thiserror::Error;

/// Errors during cross-validation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Class sizes differ: {silence} silence vs {speech} speech samples")]
    ClassSizeMismatch { silence: usize, speech: usize },
    #[error("Dataset contains no samples")]
    EmptyDataset,
    #[error("Invalid fold count {folds} for {samples} samples per class")]
    InvalidFoldCount { folds: usize, samples: usize },
    #[error("Expected {expected} samples per class, got {actual}")]
    SampleCountMismatch { expected: usize, actual: usize },
    #[error("Prior for {class} must be positive and finite, got {value}")]
    InvalidPrior { class: SignalClass, value: f64 },
    #[error("{class} sample {index} has non-finite {feature} feature: {value}")]
    NonFiniteFeature {
        class: SignalClass,
        index: usize,
        feature: Feature,
        value: f64,
    },
    #[error("Statistics built for {table_samples} samples in {table_folds} folds, validator has {samples} in {folds}")]
    PlanMismatch {
        table_samples: usize,
        table_folds: usize,
        samples: usize,
        folds: usize,
    },
    #[error("Statistics built from ordering {built}, dataset is now at ordering {current}")]
    StaleStatistics { built: u64, current: u64 },
}
