//! Directory Sample Loader

use crate::ReaderError;
use feature_engine::SignalClass;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Readings of one sample file
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSample {
    pub path: PathBuf,
    pub values: Vec<f64>,
}

impl AsRef<[f64]> for RecordedSample {
    fn as_ref(&self) -> &[f64] {
        &self.values
    }
}

/// Samples of both classes, each in file name order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleCorpus {
    pub silence: Vec<RecordedSample>,
    pub speech: Vec<RecordedSample>,
}

impl SampleCorpus {
    /// Samples of one class
    pub fn class(&self, class: SignalClass) -> &[RecordedSample] {
        match class {
            SignalClass::Silence => &self.silence,
            SignalClass::Speech => &self.speech,
        }
    }

    /// Total samples across both classes
    pub fn len(&self) -> usize {
        self.silence.len() + self.speech.len()
    }

    /// Check if no sample was found
    pub fn is_empty(&self) -> bool {
        self.silence.is_empty() && self.speech.is_empty()
    }
}

/// Reads every sample file of a directory
#[derive(Debug, Clone)]
pub struct SampleReader {
    dir: PathBuf,
}

impl SampleReader {
    /// Create a reader; fails unless `dir` is a directory
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, ReaderError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(ReaderError::NotADirectory(dir.to_path_buf()));
        }

        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Read every tagged file, silence and speech classes separately
    pub fn read_all(&self) -> Result<SampleCorpus, ReaderError> {
        let files = self.list_files()?;
        let mut corpus = SampleCorpus::default();

        for class in SignalClass::ALL {
            let tag = class.as_str();
            for path in files.iter().filter(|path| has_tag(path, tag)) {
                let values = read_sample(path)?;
                debug!("Read {} readings from {} ({})", values.len(), path.display(), class);
                let sample = RecordedSample {
                    path: path.clone(),
                    values,
                };
                match class {
                    SignalClass::Silence => corpus.silence.push(sample),
                    SignalClass::Speech => corpus.speech.push(sample),
                }
            }
        }

        if corpus.silence.len() != corpus.speech.len() {
            warn!(
                "Class sizes differ in {}: {} silence vs {} speech samples",
                self.dir.display(),
                corpus.silence.len(),
                corpus.speech.len()
            );
        }

        info!(
            "Loaded {} silence and {} speech samples from {}",
            corpus.silence.len(),
            corpus.speech.len(),
            self.dir.display()
        );

        Ok(corpus)
    }

    /// Regular files of the directory, sorted by name
    fn list_files(&self) -> Result<Vec<PathBuf>, ReaderError> {
        let io_error = |source| ReaderError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

fn has_tag(path: &Path, tag: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().contains(tag))
        .unwrap_or(false)
}

/// Parse one reading per line; blank lines are skipped
fn read_sample(path: &Path) -> Result<Vec<f64>, ReaderError> {
    let content = fs::read_to_string(path).map_err(|source| ReaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut values = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let value: f64 = text.parse().map_err(|source| ReaderError::Parse {
            path: path.to_path_buf(),
            line: number + 1,
            value: text.to_string(),
            source,
        })?;

        if !value.is_finite() {
            return Err(ReaderError::NonFiniteReading {
                path: path.to_path_buf(),
                line: number + 1,
                value: text.to_string(),
            });
        }

        values.push(value);
    }

    if values.is_empty() {
        return Err(ReaderError::EmptySample(path.to_path_buf()));
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).unwrap();
    }

    fn names(samples: &[RecordedSample]) -> Vec<String> {
        samples
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_rejects_non_directory() {
        let dir = TempDir::new().unwrap();
        write(&dir, "silence1.txt", "1.0\n");

        assert!(matches!(
            SampleReader::new(dir.path().join("silence1.txt")),
            Err(ReaderError::NotADirectory(_))
        ));
        assert!(matches!(
            SampleReader::new(dir.path().join("missing")),
            Err(ReaderError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_splits_classes_by_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "speech_b.txt", "3\n-4\n");
        write(&dir, "Silence_b.txt", "0.5\n0.25\n");
        write(&dir, "silence_a.txt", "1\n2\n");
        write(&dir, "SPEECH_a.txt", "10\n-20\n30\n");
        write(&dir, "notes.txt", "not a sample\n");
        fs::create_dir(dir.path().join("speech_dir")).unwrap();

        let corpus = SampleReader::new(dir.path()).unwrap().read_all().unwrap();

        assert_eq!(names(&corpus.silence), vec!["Silence_b.txt", "silence_a.txt"]);
        assert_eq!(names(&corpus.speech), vec!["SPEECH_a.txt", "speech_b.txt"]);
        assert_eq!(corpus.silence[1].values, vec![1.0, 2.0]);
        assert_eq!(corpus.class(SignalClass::Speech)[0].as_ref(), &[10.0, -20.0, 30.0]);
        assert_eq!(corpus.len(), 4);
    }

    #[test]
    fn test_name_with_both_tags_lands_in_both_classes() {
        let dir = TempDir::new().unwrap();
        write(&dir, "speech_over_silence.txt", "1\n");

        let corpus = SampleReader::new(dir.path()).unwrap().read_all().unwrap();
        assert_eq!(corpus.silence.len(), 1);
        assert_eq!(corpus.speech.len(), 1);
    }

    #[test]
    fn test_trailing_newline_and_whitespace() {
        let dir = TempDir::new().unwrap();
        write(&dir, "silence.txt", " 1.5 \r\n-2e1\n\n");

        let corpus = SampleReader::new(dir.path()).unwrap().read_all().unwrap();
        assert_eq!(corpus.silence[0].values, vec![1.5, -20.0]);
    }

    #[test]
    fn test_parse_error_names_line() {
        let dir = TempDir::new().unwrap();
        write(&dir, "speech.txt", "1.0\n2.0\nabc\n");

        match SampleReader::new(dir.path()).unwrap().read_all() {
            Err(ReaderError::Parse { line, value, path, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(value, "abc");
                assert!(path.ends_with("speech.txt"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_reading_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir, "speech.txt", "1.0\nNaN\n");

        assert!(matches!(
            SampleReader::new(dir.path()).unwrap().read_all(),
            Err(ReaderError::NonFiniteReading { line: 2, .. })
        ));
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir, "silence.txt", "");

        assert!(matches!(
            SampleReader::new(dir.path()).unwrap().read_all(),
            Err(ReaderError::EmptySample(_))
        ));
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let corpus = SampleReader::new(dir.path()).unwrap().read_all().unwrap();
        assert!(corpus.is_empty());
    }
}
