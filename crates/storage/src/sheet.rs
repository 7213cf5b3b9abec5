//! Feature Sheet

use crate::StorageError;
use feature_engine::{Feature, FeatureVector, SignalClass, FEATURE_DIMENSION};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Rows above the first data row (class label, feature names)
pub const HEADER_ROWS: usize = 2;

/// Cell text for a NaN feature
pub const MISSING_VALUE: &str = "-";

/// Sparse grid of text cells, one block of feature columns per class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSheet {
    cells: BTreeMap<(usize, usize), String>,
}

impl FeatureSheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Write one class block starting at `start_column` (0 when unset)
    ///
    /// Returns the first column after the block.
    pub fn write_columns(&mut self, class: SignalClass, features: &[FeatureVector], start_column: Option<usize>) -> usize {
        let start = start_column.unwrap_or(0);

        self.set(0, start, class.heading());
        for feature in Feature::ALL {
            self.set(1, start + feature.index(), feature.as_str());
        }

        for (row, vector) in features.iter().enumerate() {
            for (offset, value) in vector.values().into_iter().enumerate() {
                self.set(HEADER_ROWS + row, start + offset, &format_cell(value));
            }
        }

        debug!("Wrote {} {} rows at column {}", features.len(), class, start);
        start + FEATURE_DIMENSION
    }

    /// Text of a cell
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.cells.get(&(row, column)).map(String::as_str)
    }

    /// Number of rows spanned, headers included
    pub fn row_count(&self) -> usize {
        self.cells.keys().map(|&(row, _)| row + 1).max().unwrap_or(0)
    }

    /// Number of columns spanned
    pub fn column_count(&self) -> usize {
        self.cells.keys().map(|&(_, column)| column + 1).max().unwrap_or(0)
    }

    /// Render as CSV; unset cells are empty
    pub fn to_csv(&self) -> String {
        let columns = self.column_count();
        let mut out = String::new();

        for row in 0..self.row_count() {
            let line: Vec<String> = (0..columns)
                .map(|column| escape(self.cell(row, column).unwrap_or("")))
                .collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }

        out
    }

    /// Write the CSV rendering to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let path = path.as_ref();
        fs::write(path, self.to_csv()).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn set(&mut self, row: usize, column: usize, text: &str) {
        self.cells.insert((row, column), text.to_string());
    }
}

fn format_cell(value: f64) -> String {
    if value.is_nan() {
        MISSING_VALUE.to_string()
    } else {
        value.to_string()
    }
}

fn escape(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}
