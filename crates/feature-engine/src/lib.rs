//! Feature Engineering Engine
//!
//! Sliding-window transforms, descriptive statistics and per-sample feature
//! extraction (log-energy, log-magnitude, mean zero-crossing rate).

mod features;
mod statistics;
mod window;

pub use features::{
    ExtractionConfig, Feature, FeatureExtractor, FeatureSet, FeatureVector, SignalClass,
    DEFAULT_AUDIO_LENGTH_MS, DEFAULT_WINDOW_MS, FEATURE_DIMENSION,
};
pub use statistics::{
    gaussian_density, round_to, StatisticalSummary, ZeroVariancePolicy,
    DEFAULT_VARIANCE_EPSILON, SUMMARY_PRECISION,
};
pub use window::{normalize_signal, WindowedSignalAnalyzer, NORMALIZED_PEAK, NORMALIZED_PRECISION};

use thiserror::Error;

/// Errors during feature extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("Audio length must be greater than 0ms")]
    InvalidAudioLength,
    #[error("Window of {window_ms}ms covers no samples (sample length {sample_len}, audio length {audio_length_ms}ms)")]
    WindowTooSmall {
        window_ms: u32,
        sample_len: usize,
        audio_length_ms: u32,
    },
    #[error("Sample {index}: {source}")]
    InSample {
        index: usize,
        source: Box<FeatureError>,
    },
}
