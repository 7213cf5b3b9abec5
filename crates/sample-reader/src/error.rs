//! Reader Error Types

use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading samples
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Input path is missing or not a directory
    #[error("The path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// Listing or reading failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line is not a decimal number
    #[error("{path}:{line}: invalid reading {value:?}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    /// A line parsed to NaN or infinity
    #[error("{path}:{line}: reading {value:?} is not finite")]
    NonFiniteReading {
        path: PathBuf,
        line: usize,
        value: String,
    },

    /// File holds no readings
    #[error("{0} contains no readings")]
    EmptySample(PathBuf),
}
