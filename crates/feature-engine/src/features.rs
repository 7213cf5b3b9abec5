//! Feature Vector Assembly

use crate::statistics::StatisticalSummary;
use crate::window::WindowedSignalAnalyzer;
use crate::FeatureError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 3;

/// Duration covered by one recorded sample
pub const DEFAULT_AUDIO_LENGTH_MS: u32 = 300;

/// Analysis window
pub const DEFAULT_WINDOW_MS: u32 = 30;

/// Class a recorded sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalClass {
    Silence,
    Speech,
}

impl SignalClass {
    /// Both classes, silence first
    pub const ALL: [SignalClass; 2] = [SignalClass::Silence, SignalClass::Speech];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalClass::Silence => "silence",
            SignalClass::Speech => "speech",
        }
    }

    /// Heading used by the report sinks
    pub fn heading(&self) -> &'static str {
        match self {
            SignalClass::Silence => "SILENCE SIGNALS",
            SignalClass::Speech => "SPEECH SIGNALS",
        }
    }

    /// The competing class
    pub fn other(&self) -> SignalClass {
        match self {
            SignalClass::Silence => SignalClass::Speech,
            SignalClass::Speech => SignalClass::Silence,
        }
    }
}

impl fmt::Display for SignalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a [`FeatureVector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// log10 of the mean windowed energy
    EnergyLog,
    /// log10 of the mean windowed magnitude
    MagnitudeLog,
    /// Mean zero-crossing rate
    ZcrMean,
}

impl Feature {
    /// All features in vector order
    pub const ALL: [Feature; FEATURE_DIMENSION] = [Feature::EnergyLog, Feature::MagnitudeLog, Feature::ZcrMean];

    /// Position in the vector
    pub fn index(&self) -> usize {
        match self {
            Feature::EnergyLog => 0,
            Feature::MagnitudeLog => 1,
            Feature::ZcrMean => 2,
        }
    }

    /// Column label
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::EnergyLog => "ENERGY",
            Feature::MagnitudeLog => "MAGNITUDE",
            Feature::ZcrMean => "ZERO CROSSING RATE",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features of one recorded sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// log10(mean(energy))
    pub energy_log: f64,
    /// log10(mean(magnitude))
    pub magnitude_log: f64,
    /// mean(zero crossing rate)
    pub zcr_mean: f64,
}

impl FeatureVector {
    /// Create a feature vector
    pub fn new(energy_log: f64, magnitude_log: f64, zcr_mean: f64) -> Self {
        Self {
            energy_log,
            magnitude_log,
            zcr_mean,
        }
    }

    /// Value of a single feature
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::EnergyLog => self.energy_log,
            Feature::MagnitudeLog => self.magnitude_log,
            Feature::ZcrMean => self.zcr_mean,
        }
    }

    /// Values in [`Feature::ALL`] order
    pub fn values(&self) -> [f64; FEATURE_DIMENSION] {
        [self.energy_log, self.magnitude_log, self.zcr_mean]
    }

    /// First non-finite feature, if any
    pub fn first_non_finite(&self) -> Option<(Feature, f64)> {
        Feature::ALL
            .into_iter()
            .map(|feature| (feature, self.get(feature)))
            .find(|(_, value)| !value.is_finite())
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}, {:?}]", self.energy_log, self.magnitude_log, self.zcr_mean)
    }
}

/// Feature vectors of one class, in sample order
pub type FeatureSet = Vec<FeatureVector>;

/// Timing parameters shared by every sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Duration covered by one recorded sample (milliseconds)
    pub audio_length_ms: u32,
    /// Analysis window (milliseconds)
    pub window_ms: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            audio_length_ms: DEFAULT_AUDIO_LENGTH_MS,
            window_ms: DEFAULT_WINDOW_MS,
        }
    }
}

/// Feature extractor that turns recorded samples into feature vectors
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: ExtractionConfig,
}

impl FeatureExtractor {
    /// Create a new feature extractor
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Extract the feature vector of one sample
    pub fn extract(&self, sample: &[f64]) -> Result<FeatureVector, FeatureError> {
        let analyzer = WindowedSignalAnalyzer::new(sample, self.config.audio_length_ms);
        let window_ms = self.config.window_ms;

        let energy = StatisticalSummary::new(&analyzer.energy(window_ms)?);
        let magnitude = StatisticalSummary::new(&analyzer.magnitude(window_ms)?);
        let zcr = StatisticalSummary::new(&analyzer.zero_crossing_rate(window_ms)?);

        let features = FeatureVector::new(energy.log10_of_mean(), magnitude.log10_of_mean(), zcr.mean());

        if let Some((feature, value)) = features.first_non_finite() {
            warn!(
                "Feature {} is {} for a sample of {} readings (mean energy {}, mean magnitude {})",
                feature.as_str(),
                value,
                sample.len(),
                energy.mean(),
                magnitude.mean()
            );
        }

        Ok(features)
    }

    /// Extract feature vectors for a batch of samples
    ///
    /// Samples are processed in parallel; output order matches input order.
    pub fn extract_all<S>(&self, samples: &[S]) -> Result<FeatureSet, FeatureError>
    where
        S: AsRef<[f64]> + Sync,
    {
        info!(
            "Extracting features from {} samples (audio={}ms, window={}ms)",
            samples.len(),
            self.config.audio_length_ms,
            self.config.window_ms
        );

        let features = samples
            .par_iter()
            .enumerate()
            .map(|(index, sample)| {
                self.extract(sample.as_ref()).map_err(|source| FeatureError::InSample {
                    index,
                    source: Box::new(source),
                })
            })
            .collect::<Result<FeatureSet, FeatureError>>()?;

        debug!("Extracted {} feature vectors", features.len());
        Ok(features)
    }
}
