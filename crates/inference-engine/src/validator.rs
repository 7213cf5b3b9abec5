//! K-fold naive-Bayes cross-validation

use crate::config::ValidatorConfig;
use crate::folds::{FoldPlan, FoldStatistics, StatisticsTable};
use crate::InferenceError;
use feature_engine::{round_to, FeatureSet, FeatureVector, SignalClass, StatisticalSummary};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Decimal places of the reported accuracy
const ACCURACY_PRECISION: i32 = 5;

/// Feature sets of both classes, paired by index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    silence: FeatureSet,
    speech: FeatureSet,
}

impl Dataset {
    /// Pair two feature sets; both must have the same length and only finite
    /// features
    pub fn new(silence: FeatureSet, speech: FeatureSet) -> Result<Self, InferenceError> {
        if silence.len() != speech.len() {
            return Err(InferenceError::ClassSizeMismatch {
                silence: silence.len(),
                speech: speech.len(),
            });
        }

        for (class, vectors) in [(SignalClass::Silence, &silence), (SignalClass::Speech, &speech)] {
            for (index, vector) in vectors.iter().enumerate() {
                if let Some((feature, value)) = vector.first_non_finite() {
                    return Err(InferenceError::NonFiniteFeature {
                        class,
                        index,
                        feature,
                        value,
                    });
                }
            }
        }

        Ok(Self { silence, speech })
    }

    /// Samples per class
    pub fn len(&self) -> usize {
        self.silence.len()
    }

    /// Check if the dataset has no samples
    pub fn is_empty(&self) -> bool {
        self.silence.is_empty()
    }

    /// Feature vectors of one class
    pub fn class(&self, class: SignalClass) -> &[FeatureVector] {
        match class {
            SignalClass::Silence => &self.silence,
            SignalClass::Speech => &self.speech,
        }
    }

    /// Reorder both classes with the same index order
    fn permute(&mut self, order: &[usize]) {
        self.silence = order.iter().map(|&i| self.silence[i]).collect();
        self.speech = order.iter().map(|&i| self.speech[i]).collect();
    }
}

/// Result of one fold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldOutcome {
    /// Fold index
    pub fold: usize,
    /// First held-out index
    pub test_start: usize,
    /// One past the last held-out index
    pub test_end: usize,
    /// Correct decisions across both classes
    pub correct: usize,
    /// Decisions made (two per held-out index)
    pub decisions: usize,
}

/// Result of one cross-validation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Per-fold outcomes in fold order
    pub folds: Vec<FoldOutcome>,
    /// Trailing samples never tested
    pub excluded_samples: usize,
    /// Mean correct decisions per fold
    pub mean_correct: f64,
    /// `mean_correct` as a percentage of the decisions per fold
    pub accuracy_percent: f64,
}

impl EvaluationReport {
    /// Correct decision count of every fold
    pub fn correct_counts(&self) -> Vec<usize> {
        self.folds.iter().map(|f| f.correct).collect()
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The results for iteration were: {:?}", self.correct_counts())?;
        write!(f, "The accuracy for the test was: {:?}%", self.accuracy_percent)
    }
}

/// K-fold cross-validator for the Gaussian naive-Bayes model
pub struct CrossValidator {
    dataset: Dataset,
    plan: FoldPlan,
    config: ValidatorConfig,
    rng: StdRng,
    ordering: u64,
}

impl CrossValidator {
    /// Create a validator over `dataset`
    pub fn new(dataset: Dataset, config: ValidatorConfig) -> Result<Self, InferenceError> {
        config.validate()?;

        if dataset.is_empty() {
            return Err(InferenceError::EmptyDataset);
        }

        if let Some(expected) = config.samples_per_class {
            if expected != dataset.len() {
                return Err(InferenceError::SampleCountMismatch {
                    expected,
                    actual: dataset.len(),
                });
            }
        }

        let plan = FoldPlan::new(dataset.len(), config.fold_count)?;
        if plan.excluded_count() > 0 {
            warn!(
                "{} samples per class do not fit in {} folds of {} and will never be tested",
                plan.excluded_count(),
                plan.fold_count(),
                plan.fold_len()
            );
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            "Creating cross-validator: {} samples per class, {} folds",
            dataset.len(),
            plan.fold_count()
        );

        Ok(Self {
            dataset,
            plan,
            config,
            rng,
            ordering: 0,
        })
    }

    /// Current dataset ordering
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Fold partition
    pub fn plan(&self) -> &FoldPlan {
        &self.plan
    }

    /// Number of reshuffles applied so far
    pub fn ordering(&self) -> u64 {
        self.ordering
    }

    /// Build training statistics for every fold of the current ordering
    pub fn build_folds(&self) -> StatisticsTable {
        StatisticsTable::build(&self.dataset, &self.plan, self.ordering)
    }

    /// Classify every held-out sample against `table`
    ///
    /// The table must come from this validator's plan and current ordering.
    pub fn evaluate(&self, table: &StatisticsTable) -> Result<EvaluationReport, InferenceError> {
        if table.plan() != &self.plan {
            return Err(InferenceError::PlanMismatch {
                table_samples: table.plan().sample_count(),
                table_folds: table.plan().fold_count(),
                samples: self.plan.sample_count(),
                folds: self.plan.fold_count(),
            });
        }

        if table.ordering() != self.ordering {
            return Err(InferenceError::StaleStatistics {
                built: table.ordering(),
                current: self.ordering,
            });
        }

        Ok(self.evaluate_table(table))
    }

    fn evaluate_table(&self, table: &StatisticsTable) -> EvaluationReport {
        let folds: Vec<FoldOutcome> = table
            .folds()
            .par_iter()
            .map(|stats| self.evaluate_fold(stats))
            .collect();

        let counts: Vec<f64> = folds.iter().map(|f| f.correct as f64).collect();
        let mean_correct = StatisticalSummary::new(&counts).mean();
        let accuracy_percent = round_to(mean_correct * self.plan.report_scale(), ACCURACY_PRECISION);

        info!("Cross-validation accuracy: {}%", accuracy_percent);

        EvaluationReport {
            folds,
            excluded_samples: self.plan.excluded_count(),
            mean_correct,
            accuracy_percent,
        }
    }

    /// Build folds and evaluate the current ordering
    pub fn run(&self) -> EvaluationReport {
        let table = self.build_folds();
        self.evaluate_table(&table)
    }

    /// Apply one random permutation to both classes, returning it
    pub fn shuffle(&mut self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        order.shuffle(&mut self.rng);
        self.dataset.permute(&order);
        self.ordering += 1;
        order
    }

    /// Reshuffle, rebuild and evaluate `times` times
    pub fn shuffled_run(&mut self, times: usize) -> Vec<EvaluationReport> {
        (0..times)
            .map(|iteration| {
                self.shuffle();
                let report = self.run();
                debug!(
                    "Shuffled run {}: {:?} -> {}%",
                    iteration,
                    report.correct_counts(),
                    report.accuracy_percent
                );
                report
            })
            .collect()
    }

    fn evaluate_fold(&self, stats: &FoldStatistics) -> FoldOutcome {
        let range = self.plan.test_range(stats.fold());

        let mut correct = 0;
        for index in range.clone() {
            for class in SignalClass::ALL {
                let observed = &self.dataset.class(class)[index];
                if stats.posterior(observed, &self.config).is_correct(class) {
                    correct += 1;
                }
            }
        }

        debug!("Fold {} ({:?}): {} correct", stats.fold(), range, correct);

        FoldOutcome {
            fold: stats.fold(),
            test_start: range.start,
            test_end: range.end,
            correct,
            decisions: self.plan.decisions_per_fold(),
        }
    }
}
