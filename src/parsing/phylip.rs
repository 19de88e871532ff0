//! Strict sequential Phylip writer.
//!
//! ```text
//!  2 8
//! seq1      ACGTACGT
//! seq2      ACGTTCGT
//! ```
//!
//! Taxon names occupy exactly 10 columns: longer names are truncated, shorter
//! ones padded with spaces.

use std::io::Write;

use thiserror::Error;

use crate::parsing::SequenceRecord;

/// Width of the taxon name column
pub const NAME_WIDTH: usize = 10;

#[derive(Error, Debug)]
pub enum PhylipError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Phylip output needs at least one sequence")]
    Empty,

    #[error("Sequence '{name}' has length {length}, expected {expected} (sequences must be aligned)")]
    UnequalLength {
        name: String,
        length: usize,
        expected: usize,
    },
}

/// Write aligned records as strict sequential Phylip.
///
/// # Errors
///
/// Returns `PhylipError::Empty` for no records, `PhylipError::UnequalLength`
/// if the records are not all the same length, or any write error. Nothing is
/// written when validation fails.
pub fn write_phylip<W: Write>(writer: &mut W, records: &[SequenceRecord]) -> Result<(), PhylipError> {
    let expected = records.first().ok_or(PhylipError::Empty)?.sequence.len();

    if let Some(bad) = records.iter().find(|r| r.sequence.len() != expected) {
        return Err(PhylipError::UnequalLength {
            name: bad.name.clone(),
            length: bad.sequence.len(),
            expected,
        });
    }

    writeln!(writer, " {} {}", records.len(), expected)?;
    for record in records {
        writer.write_all(phylip_name(&record.name).as_bytes())?;
        writer.write_all(&record.sequence)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

/// Taxon name truncated or padded to [`NAME_WIDTH`] characters.
pub fn phylip_name(name: &str) -> String {
    let truncated: String = name.chars().take(NAME_WIDTH).collect();
    format!("{truncated:<NAME_WIDTH$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_phylip() {
        let records = vec![
            SequenceRecord::new("seq1", b"ACGTACGT".to_vec()),
            SequenceRecord::new("a_rather_long_name", b"ACGTTCGT".to_vec()),
        ];

        let mut out = Vec::new();
        write_phylip(&mut out, &records).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            " 2 8\nseq1      ACGTACGT\na_rather_lACGTTCGT\n"
        );
    }

    #[test]
    fn test_unequal_lengths() {
        let records = vec![
            SequenceRecord::new("seq1", b"ACGT".to_vec()),
            SequenceRecord::new("seq2", b"ACG".to_vec()),
        ];

        let mut out = Vec::new();
        match write_phylip(&mut out, &records).unwrap_err() {
            PhylipError::UnequalLength { name, length, expected } => {
                assert_eq!(name, "seq2");
                assert_eq!(length, 3);
                assert_eq!(expected, 4);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_empty() {
        let mut out = Vec::new();
        assert!(matches!(write_phylip(&mut out, &[]), Err(PhylipError::Empty)));
    }
}
