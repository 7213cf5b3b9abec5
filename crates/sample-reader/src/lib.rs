//! Sample Reader
//!
//! Loads recorded samples from a directory of newline-delimited text files,
//! split into silence and speech classes by file name.

mod error;
mod reader;

pub use error::ReaderError;
pub use reader::{RecordedSample, SampleCorpus, SampleReader};
