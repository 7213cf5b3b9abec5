//! Plain-text feature dump

use crate::StorageError;
use feature_engine::{FeatureVector, SignalClass};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Line-oriented writer of feature vectors
pub struct TextDump<W: Write> {
    writer: BufWriter<W>,
    lines: usize,
}

impl TextDump<File> {
    /// Create (or truncate) a dump file
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(file))
    }
}

impl<W: Write> TextDump<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            lines: 0,
        }
    }

    /// Write `text` verbatim
    pub fn write_label(&mut self, text: &str) -> Result<(), StorageError> {
        self.writer.write_all(text.as_bytes())?;
        self.lines += text.matches('\n').count();
        Ok(())
    }

    /// Write one `[e, m, z]` line per vector
    pub fn write_features(&mut self, features: &[FeatureVector]) -> Result<(), StorageError> {
        for vector in features {
            writeln!(self.writer, "{}", vector)?;
        }
        self.lines += features.len();
        Ok(())
    }

    /// Write both classes under their headings
    pub fn write_dataset(&mut self, silence: &[FeatureVector], speech: &[FeatureVector]) -> Result<(), StorageError> {
        self.write_label(&format!("{}\n", SignalClass::Silence.heading()))?;
        self.write_features(silence)?;
        self.write_label(&format!("\n{}\n", SignalClass::Speech.heading()))?;
        self.write_features(speech)
    }

    /// Lines written so far
    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Flush and return the inner writer
    pub fn finish(self) -> Result<W, StorageError> {
        self.writer
            .into_inner()
            .map_err(|e| StorageError::Write(e.into_error()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_layout() {
        let silence = vec![FeatureVector::new(-2.5, 1.25, 0.0)];
        let speech = vec![FeatureVector::new(3.0, 4.5, 0.1), FeatureVector::new(f64::NAN, 4.0, 0.2)];

        let mut dump = TextDump::new(Vec::new());
        dump.write_dataset(&silence, &speech).unwrap();
        assert_eq!(dump.lines(), 6);
        let bytes = dump.finish().unwrap();

        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "SILENCE SIGNALS\n[-2.5, 1.25, 0.0]\n\nSPEECH SIGNALS\n[3.0, 4.5, 0.1]\n[NaN, 4.0, 0.2]\n"
        );
    }

    #[test]
    fn test_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.dat");

        let mut dump = TextDump::create(&path).unwrap();
        dump.write_label("HEADER\n").unwrap();
        dump.finish().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "HEADER\n");
    }
}
