//! Statistical Summary Computation

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Decimal places kept by mean, log and variance
pub const SUMMARY_PRECISION: i32 = 4;

/// Epsilon added to a zero variance by the default policy
pub const DEFAULT_VARIANCE_EPSILON: f64 = 1e-6;

/// How a Gaussian density is evaluated when the variance is not positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZeroVariancePolicy {
    /// Add `epsilon` to the variance before use
    Epsilon { epsilon: f64 },
    /// Density is 1.0 exactly at the mean and 0.0 everywhere else
    PointMass,
}

impl Default for ZeroVariancePolicy {
    fn default() -> Self {
        ZeroVariancePolicy::Epsilon {
            epsilon: DEFAULT_VARIANCE_EPSILON,
        }
    }
}

/// Round `value` to `places` decimal places, halves toward positive infinity
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor + 0.5).floor() / factor
}

/// Gaussian density of `x` for an external (mean, variance) pair
///
/// A variance that is not strictly positive is resolved through `policy`,
/// so the result is never NaN for finite inputs.
pub fn gaussian_density(x: f64, mean: f64, variance: f64, policy: ZeroVariancePolicy) -> f64 {
    if variance > 0.0 {
        return normal_pdf(x, mean, variance);
    }

    match policy {
        ZeroVariancePolicy::Epsilon { epsilon } => normal_pdf(x, mean, variance.max(0.0) + epsilon),
        ZeroVariancePolicy::PointMass => {
            if x == mean {
                1.0
            } else {
                0.0
            }
        }
    }
}

fn normal_pdf(x: f64, mean: f64, variance: f64) -> f64 {
    let scale = 1.0 / (2.0 * PI * variance).sqrt();
    let exponent = -(x - mean).powi(2) / (2.0 * variance);
    scale * exponent.exp()
}

/// Descriptive statistics over a fixed copy of a value sequence
#[derive(Debug, Clone)]
pub struct StatisticalSummary {
    /// Owned copy of the input
    values: Vec<f64>,
    /// Mean rounded to [`SUMMARY_PRECISION`]
    mean: f64,
    /// log10 of the rounded mean
    log10_mean: f64,
    /// Zero variance handling for [`Self::gaussian_density`]
    policy: ZeroVariancePolicy,
}

impl StatisticalSummary {
    /// Build a summary from a slice of values
    pub fn new(values: &[f64]) -> Self {
        let values = values.to_vec();
        let mean = if values.is_empty() {
            0.0
        } else {
            round_to(values.iter().sum::<f64>() / values.len() as f64, SUMMARY_PRECISION)
        };

        // log10 is only defined on strictly positive means
        let log10_mean = if mean > 0.0 {
            round_to(mean.log10(), SUMMARY_PRECISION)
        } else {
            f64::NAN
        };

        Self {
            values,
            mean,
            log10_mean,
            policy: ZeroVariancePolicy::default(),
        }
    }

    /// Use a different zero variance policy for density evaluation
    pub fn with_zero_variance_policy(mut self, policy: ZeroVariancePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Arithmetic mean, rounded to 4 decimal places
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Base-10 log of the rounded mean, rounded to 4 decimal places.
    /// `NaN` when the mean is not strictly positive.
    pub fn log10_of_mean(&self) -> f64 {
        self.log10_mean
    }

    /// Population variance around the stored mean, rounded to 4 decimal places
    pub fn variance(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }

        let sum: f64 = self.values.iter().map(|v| (v - self.mean).powi(2)).sum();
        round_to(sum / self.values.len() as f64, SUMMARY_PRECISION)
    }

    /// Gaussian density of `x` under this summary's mean and variance
    pub fn gaussian_density(&self, x: f64) -> f64 {
        gaussian_density(x, self.mean, self.variance(), self.policy)
    }

    /// Number of summarized values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the summary was built from no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_is_rounded() {
        let stats = StatisticalSummary::new(&[1.0, 2.0, 2.0]);
        assert_eq!(stats.mean(), 1.6667);
    }

    #[test]
    fn test_population_variance() {
        let stats = StatisticalSummary::new(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(stats.mean(), 5.0);
        assert_eq!(stats.variance(), 4.0);
    }

    #[test]
    fn test_log10_of_mean() {
        let stats = StatisticalSummary::new(&[100.0, 100.0]);
        assert_eq!(stats.log10_of_mean(), 2.0);

        let stats = StatisticalSummary::new(&[1.0, 2.0]);
        assert_eq!(stats.log10_of_mean(), 0.1761);
    }

    #[test]
    fn test_log10_undefined_for_non_positive_mean() {
        assert!(StatisticalSummary::new(&[0.0, 0.0]).log10_of_mean().is_nan());
        assert!(StatisticalSummary::new(&[-1.0, -3.0]).log10_of_mean().is_nan());
        assert!(StatisticalSummary::new(&[]).log10_of_mean().is_nan());
    }

    #[test]
    fn test_empty_values() {
        let stats = StatisticalSummary::new(&[]);
        assert!(stats.is_empty());
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.variance(), 0.0);
    }

    #[test]
    fn test_summary_owns_its_input() {
        let mut values = vec![1.0, 3.0];
        let stats = StatisticalSummary::new(&values);
        values[0] = 100.0;
        assert_eq!(stats.mean(), 2.0);
        assert_eq!(stats.variance(), 1.0);
    }

    #[test]
    fn test_density_peak_at_mean() {
        let stats = StatisticalSummary::new(&[1.0, 3.0]);
        let expected = 1.0 / (2.0 * PI).sqrt();
        assert!((stats.gaussian_density(2.0) - expected).abs() < 1e-12);
        assert!(stats.gaussian_density(5.0) < stats.gaussian_density(2.5));
    }

    #[test]
    fn test_external_density_matches_summary() {
        let stats = StatisticalSummary::new(&[1.0, 2.0, 4.0, 9.0]);
        let external = gaussian_density(3.3, stats.mean(), stats.variance(), ZeroVariancePolicy::default());
        assert_eq!(stats.gaussian_density(3.3), external);
    }

    #[test]
    fn test_zero_variance_epsilon() {
        let stats = StatisticalSummary::new(&[2.0, 2.0, 2.0]);
        assert_eq!(stats.variance(), 0.0);

        let at_mean = stats.gaussian_density(2.0);
        let expected = 1.0 / (2.0 * PI * DEFAULT_VARIANCE_EPSILON).sqrt();
        assert!((at_mean - expected).abs() < 1e-6);
        assert!(at_mean.is_finite());
        assert_eq!(stats.gaussian_density(3.0), 0.0);
    }

    #[test]
    fn test_zero_variance_point_mass() {
        let stats = StatisticalSummary::new(&[2.0, 2.0]).with_zero_variance_policy(ZeroVariancePolicy::PointMass);
        assert_eq!(stats.gaussian_density(2.0), 1.0);
        assert_eq!(stats.gaussian_density(2.0001), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234_56, 4), 1.2346);
        assert_eq!(round_to(-0.000_04, 4), 0.0);
        assert_eq!(round_to(9.999_999, 5), 10.0);
    }

    #[test]
    fn test_round_to_halves_go_up() {
        assert_eq!(round_to(0.5, 0), 1.0);
        assert_eq!(round_to(-0.5, 0), 0.0);
        assert_eq!(round_to(-2.5, 0), -2.0);
        assert_eq!(round_to(-1.25, 1), -1.2);
        assert_eq!(round_to(-1.26, 1), -1.3);
    }
}
