//! K-fold partitioning and per-fold training statistics

use crate::config::ValidatorConfig;
use crate::posterior::Posterior;
use crate::validator::Dataset;
use crate::InferenceError;
use feature_engine::{
    gaussian_density, Feature, FeatureVector, SignalClass, StatisticalSummary, ZeroVariancePolicy,
    FEATURE_DIMENSION,
};
use rayon::prelude::*;
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// Contiguous k-fold partition of `0..sample_count`
///
/// Fold `f` tests `[f * (N / k), (f + 1) * (N / k))`. The trailing
/// `N - k * (N / k)` samples are never tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldPlan {
    sample_count: usize,
    fold_count: usize,
}

impl FoldPlan {
    /// Create a plan; requires `1 <= fold_count <= sample_count`
    pub fn new(sample_count: usize, fold_count: usize) -> Result<Self, InferenceError> {
        if fold_count == 0 || fold_count > sample_count {
            return Err(InferenceError::InvalidFoldCount {
                folds: fold_count,
                samples: sample_count,
            });
        }

        Ok(Self {
            sample_count,
            fold_count,
        })
    }

    /// Samples per class (N)
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Number of folds (k)
    pub fn fold_count(&self) -> usize {
        self.fold_count
    }

    /// Test samples per fold (N / k)
    pub fn fold_len(&self) -> usize {
        self.sample_count / self.fold_count
    }

    /// Indices held out by `fold`
    pub fn test_range(&self, fold: usize) -> Range<usize> {
        let len = self.fold_len();
        fold * len..(fold + 1) * len
    }

    /// Indices used for training by `fold`
    pub fn training_indices(&self, fold: usize) -> impl Iterator<Item = usize> {
        let test = self.test_range(fold);
        (0..self.sample_count).filter(move |i| !test.contains(i))
    }

    /// Samples that fall in some test fold
    pub fn evaluated_count(&self) -> usize {
        self.fold_count * self.fold_len()
    }

    /// Trailing samples that no fold ever tests
    pub fn excluded_count(&self) -> usize {
        self.sample_count - self.evaluated_count()
    }

    /// Decisions made per fold: one per class per held-out index
    pub fn decisions_per_fold(&self) -> usize {
        SignalClass::ALL.len() * self.fold_len()
    }

    /// Factor turning a mean per-fold correct count into a percentage
    pub fn report_scale(&self) -> f64 {
        100.0 / self.decisions_per_fold() as f64
    }
}

/// Mean and variance of one feature for one class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaussianParams {
    pub mean: f64,
    pub variance: f64,
}

impl GaussianParams {
    /// Capture the mean and variance of a summary
    pub fn from_summary(summary: &StatisticalSummary) -> Self {
        Self {
            mean: summary.mean(),
            variance: summary.variance(),
        }
    }

    /// Density of `x` under these parameters
    pub fn density(&self, x: f64, policy: ZeroVariancePolicy) -> f64 {
        gaussian_density(x, self.mean, self.variance, policy)
    }
}

/// Training statistics of one fold, per class and feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldStatistics {
    fold: usize,
    silence: [GaussianParams; FEATURE_DIMENSION],
    speech: [GaussianParams; FEATURE_DIMENSION],
}

impl FoldStatistics {
    /// Build statistics for `fold` from every sample outside its test range
    pub fn build(dataset: &Dataset, plan: &FoldPlan, fold: usize) -> Self {
        let params_for = |class: SignalClass| {
            let vectors = dataset.class(class);
            Feature::ALL.map(|feature| {
                let training: Vec<f64> = plan
                    .training_indices(fold)
                    .map(|i| vectors[i].get(feature))
                    .collect();
                GaussianParams::from_summary(&StatisticalSummary::new(&training))
            })
        };

        Self {
            fold,
            silence: params_for(SignalClass::Silence),
            speech: params_for(SignalClass::Speech),
        }
    }

    /// Fold index
    pub fn fold(&self) -> usize {
        self.fold
    }

    /// Training parameters of `feature` under `class`
    pub fn params(&self, class: SignalClass, feature: Feature) -> GaussianParams {
        match class {
            SignalClass::Silence => self.silence[feature.index()],
            SignalClass::Speech => self.speech[feature.index()],
        }
    }

    /// Raw naive-Bayes posteriors of `observed` under both class models
    pub fn posterior(&self, observed: &FeatureVector, config: &ValidatorConfig) -> Posterior {
        let likelihood = |class: SignalClass| {
            Feature::ALL.iter().fold(config.prior(class), |acc, &feature| {
                acc * self
                    .params(class, feature)
                    .density(observed.get(feature), config.zero_variance)
            })
        };

        Posterior::new(likelihood(SignalClass::Silence), likelihood(SignalClass::Speech))
    }
}

/// Immutable training statistics of every fold
///
/// Tied to the plan and the dataset ordering it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsTable {
    plan: FoldPlan,
    ordering: u64,
    folds: Vec<FoldStatistics>,
}

impl StatisticsTable {
    /// Build a fresh table for the current ordering of `dataset`
    pub fn build(dataset: &Dataset, plan: &FoldPlan, ordering: u64) -> Self {
        let folds: Vec<FoldStatistics> = (0..plan.fold_count())
            .into_par_iter()
            .map(|fold| FoldStatistics::build(dataset, plan, fold))
            .collect();

        debug!("Built training statistics for {} folds (ordering {})", folds.len(), ordering);
        Self {
            plan: *plan,
            ordering,
            folds,
        }
    }

    /// Plan the table was built for
    pub fn plan(&self) -> &FoldPlan {
        &self.plan
    }

    /// Dataset ordering the table was built from
    pub fn ordering(&self) -> u64 {
        self.ordering
    }

    /// All folds in order
    pub fn folds(&self) -> &[FoldStatistics] {
        &self.folds
    }

    /// Number of folds
    pub fn len(&self) -> usize {
        self.folds.len()
    }

    /// Check if the table holds no folds
    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dataset(n: usize) -> Dataset {
        let silence = (0..n).map(|i| FeatureVector::new(i as f64, 1.0 + i as f64, 0.0)).collect();
        let speech = (0..n).map(|i| FeatureVector::new(10.0 + i as f64, 20.0, 0.5)).collect();
        Dataset::new(silence, speech).unwrap()
    }

    #[test]
    fn test_fold_boundaries() {
        let plan = FoldPlan::new(50, 10).unwrap();
        assert_eq!(plan.fold_len(), 5);
        assert_eq!(plan.test_range(0), 0..5);
        assert_eq!(plan.test_range(9), 45..50);
        assert_eq!(plan.excluded_count(), 0);
        assert_eq!(plan.report_scale(), 10.0);
    }

    #[test]
    fn test_remainder_is_excluded() {
        let plan = FoldPlan::new(13, 4).unwrap();
        assert_eq!(plan.fold_len(), 3);
        assert_eq!(plan.test_range(3), 9..12);
        assert_eq!(plan.evaluated_count(), 12);
        assert_eq!(plan.excluded_count(), 1);
        // the excluded sample still trains every fold
        assert!((0..4).all(|fold| plan.training_indices(fold).any(|i| i == 12)));
    }

    #[test]
    fn test_invalid_fold_counts() {
        assert!(matches!(FoldPlan::new(10, 0), Err(InferenceError::InvalidFoldCount { .. })));
        assert!(matches!(FoldPlan::new(3, 4), Err(InferenceError::InvalidFoldCount { .. })));
        assert!(FoldPlan::new(4, 4).is_ok());
    }

    #[test]
    fn test_fold_statistics_exclude_test_range() {
        let data = dataset(10);
        let plan = FoldPlan::new(10, 5).unwrap();
        let stats = FoldStatistics::build(&data, &plan, 0);

        // silence energy of samples 2..10 -> mean 5.5
        let energy = stats.params(SignalClass::Silence, Feature::EnergyLog);
        assert_eq!(energy.mean, 5.5);
        assert_eq!(energy.variance, 5.25);

        let zcr = stats.params(SignalClass::Speech, Feature::ZcrMean);
        assert_eq!(zcr.mean, 0.5);
        assert_eq!(zcr.variance, 0.0);
    }

    #[test]
    fn test_table_rebuild_is_fresh() {
        let data = dataset(10);
        let plan = FoldPlan::new(10, 5).unwrap();
        let table = StatisticsTable::build(&data, &plan, 0);
        assert_eq!(table.len(), 5);
        assert_eq!(table.plan(), &plan);
        assert_eq!(table, StatisticsTable::build(&data, &plan, 0));
        assert_ne!(table, StatisticsTable::build(&data, &plan, 1));
        assert!(table.folds().iter().enumerate().all(|(i, f)| f.fold() == i));
    }

    #[test]
    fn test_posterior_prefers_matching_class() {
        let data = dataset(10);
        let plan = FoldPlan::new(10, 5).unwrap();
        let config = ValidatorConfig::default();
        let stats = FoldStatistics::build(&data, &plan, 0);

        let silence_like = stats.posterior(&data.class(SignalClass::Silence)[0], &config);
        assert_eq!(silence_like.decide(), Some(SignalClass::Silence));

        let speech_like = stats.posterior(&data.class(SignalClass::Speech)[1], &config);
        assert_eq!(speech_like.decide(), Some(SignalClass::Speech));
    }

    proptest! {
        #[test]
        fn prop_test_folds_are_disjoint(n in 1usize..200, k in 1usize..50) {
            prop_assume!(k <= n);
            let plan = FoldPlan::new(n, k).unwrap();

            let mut seen = vec![false; n];
            for fold in 0..k {
                for i in plan.test_range(fold) {
                    prop_assert!(!seen[i]);
                    seen[i] = true;
                }
                prop_assert_eq!(plan.training_indices(fold).count(), n - plan.fold_len());
            }

            let tested = seen.iter().filter(|&&s| s).count();
            prop_assert_eq!(tested, plan.evaluated_count());
            prop_assert!(tested <= n);
            prop_assert!(seen[..tested].iter().all(|&s| s));
        }
    }
}
