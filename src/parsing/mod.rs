//! Readers and writers for the sequence formats handled by the native conversion methods.
//!
//! - **FASTA**: read with noodles (plain, gzip or bgzip), written with line wrapping
//! - **FASTQ**: read with noodles, written with four-line framing
//! - **Phylip**: strict sequential writer
//!
//! ## Example
//!
//! ```rust,no_run
//! use bioconvert::parsing::fasta::read_fasta;
//! use std::path::Path;
//!
//! let records = read_fasta(Path::new("reads.fa.gz")).unwrap();
//! for record in &records {
//!     println!("{}\t{}", record.name, record.sequence.len());
//! }
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;

use crate::core::extension::is_compressed;

pub mod fasta;
pub mod fastq;
pub mod phylip;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("noodles error: {0}")]
    Noodles(String),
}

/// Open a file for buffered reading, decompressing `.gz`/`.bgz` transparently.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_buffered(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path)?;
    if is_compressed(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Sequence record shared by the FASTA and FASTQ readers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    pub name: String,
    pub description: Option<String>,
    pub sequence: Vec<u8>,
}

impl SequenceRecord {
    pub fn new(name: impl Into<String>, sequence: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sequence: sequence.into(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Header text after the marker character: `name` or `name description`
    pub fn header(&self) -> String {
        match &self.description {
            Some(description) => format!("{} {description}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Turn a raw description into `None` when blank.
pub(crate) fn non_empty_description(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
