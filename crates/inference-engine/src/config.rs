//! Cross-validation configuration

use crate::InferenceError;
use feature_engine::{SignalClass, ZeroVariancePolicy};
use serde::{Deserialize, Serialize};

/// Cross-validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Number of folds (k)
    pub fold_count: usize,
    /// Prior probability of the silence class
    pub prior_silence: f64,
    /// Prior probability of the speech class
    pub prior_speech: f64,
    /// Expected samples per class (N), checked against the dataset when set
    pub samples_per_class: Option<usize>,
    /// Density handling for zero-variance training statistics
    pub zero_variance: ZeroVariancePolicy,
    /// Seed for reshuffling; entropy when unset
    pub seed: Option<u64>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fold_count: 10,
            prior_silence: 0.5,
            prior_speech: 0.5,
            samples_per_class: None,
            zero_variance: ZeroVariancePolicy::default(),
            seed: None,
        }
    }
}

impl ValidatorConfig {
    /// Set the fold count
    pub fn with_fold_count(mut self, fold_count: usize) -> Self {
        self.fold_count = fold_count;
        self
    }

    /// Set the reshuffle seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Prior probability of `class`
    pub fn prior(&self, class: SignalClass) -> f64 {
        match class {
            SignalClass::Silence => self.prior_silence,
            SignalClass::Speech => self.prior_speech,
        }
    }

    /// Check priors
    pub fn validate(&self) -> Result<(), InferenceError> {
        for class in SignalClass::ALL {
            let value = self.prior(class);
            if !(value.is_finite() && value > 0.0) {
                return Err(InferenceError::InvalidPrior { class, value });
            }
        }
        Ok(())
    }
}
