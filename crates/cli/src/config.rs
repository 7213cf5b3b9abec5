//! Layered pipeline configuration

use config::{Config, ConfigError, Environment, File};
use feature_engine::ExtractionConfig;
use inference_engine::ValidatorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of configuration environment variables
pub const ENV_PREFIX: &str = "SPEECH_CLASSIFIER";

/// Where and whether extracted features are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the feature sheet and text dump
    pub dir: PathBuf,
    /// Write the feature sheet and text dump
    pub export: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("assets"),
            export: true,
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub extraction: ExtractionConfig,
    pub validation: ValidatorConfig,
    pub output: OutputConfig,
    /// Reshuffled repetitions after the first run
    pub shuffle_runs: usize,
}

impl PipelineConfig {
    /// Defaults, then the optional file, then `SPEECH_CLASSIFIER__<SECTION>__<KEY>`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::layered(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn layered(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&PipelineConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(env.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
