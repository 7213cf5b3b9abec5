//! Storage Layer
//!
//! Persists extracted features as a two-block feature sheet (CSV) and a
//! plain-text dump.

mod dump;
mod export;
mod sheet;

pub use dump::TextDump;
pub use export::{export_features, ExportSummary, DUMP_FILE_NAME, SHEET_FILE_NAME};
pub use sheet::{FeatureSheet, HEADER_ROWS, MISSING_VALUE};

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Write error: {0}")]
    Write(#[from] std::io::Error),
}
