//! FASTQ reading via noodles and four-line FASTQ writing.

use std::io::Write;
use std::path::Path;

use noodles::fastq;

use crate::parsing::{non_empty_description, open_buffered, ParseError, SequenceRecord};

/// Quality character used when no real qualities are known (Phred 40 in Sanger encoding)
pub const PLACEHOLDER_QUALITY: u8 = b'I';

/// Read every record of a FASTQ file, keeping name, description and sequence.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or `ParseError::Noodles`
/// if a record is malformed.
pub fn read_fastq(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut reader = fastq::io::Reader::new(open_buffered(path)?);
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTQ record: {e}")))?;

        records.push(SequenceRecord {
            name: String::from_utf8_lossy(record.name()).to_string(),
            description: non_empty_description(record.description()),
            sequence: record.sequence().to_vec(),
        });
    }

    Ok(records)
}

/// Write one FASTQ record: `@header`, sequence, `+`, quality.
///
/// # Errors
///
/// Returns any write error.
pub fn write_fastq_record<W: Write>(
    writer: &mut W,
    record: &SequenceRecord,
    quality: &[u8],
) -> std::io::Result<()> {
    writeln!(writer, "@{}", record.header())?;
    writer.write_all(&record.sequence)?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(quality)?;
    writer.write_all(b"\n")
}

/// Placeholder quality string as long as the sequence
pub fn placeholder_quality(sequence: &[u8]) -> Vec<u8> {
    vec![PLACEHOLDER_QUALITY; sequence.len()]
}
