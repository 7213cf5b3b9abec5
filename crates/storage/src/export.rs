//! Feature export to an output directory

use crate::{FeatureSheet, StorageError, TextDump};
use feature_engine::{FeatureVector, SignalClass};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name of the feature sheet
pub const SHEET_FILE_NAME: &str = "results.csv";

/// File name of the text dump
pub const DUMP_FILE_NAME: &str = "signal_information.dat";

/// Files written by [`export_features`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub sheet_path: PathBuf,
    pub dump_path: PathBuf,
    pub samples: usize,
    /// Lines written to the text dump
    pub dump_lines: usize,
}

/// Write the feature sheet and text dump for both classes into `dir`
pub fn export_features(
    dir: impl AsRef<Path>,
    silence: &[FeatureVector],
    speech: &[FeatureVector],
) -> Result<ExportSummary, StorageError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| StorageError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let sheet_path = dir.join(SHEET_FILE_NAME);
    let mut sheet = FeatureSheet::new();
    let next = sheet.write_columns(SignalClass::Silence, silence, None);
    sheet.write_columns(SignalClass::Speech, speech, Some(next));
    sheet.save(&sheet_path)?;

    let dump_path = dir.join(DUMP_FILE_NAME);
    let mut dump = TextDump::create(&dump_path)?;
    dump.write_dataset(silence, speech)?;
    let dump_lines = dump.lines();
    dump.finish()?;

    info!(
        "Exported {} feature vectors to {} ({} rows) and {} ({} lines)",
        silence.len() + speech.len(),
        sheet_path.display(),
        sheet.row_count(),
        dump_path.display(),
        dump_lines
    );

    Ok(ExportSummary {
        sheet_path,
        dump_path,
        samples: silence.len() + speech.len(),
        dump_lines,
    })
}
