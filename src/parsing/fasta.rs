//! FASTA reading via noodles and FASTA writing.
//!
//! Supported extensions:
//! - `.fa`, `.fas`, `.fasta`, `.fna` (uncompressed)
//! - any of the above with `.gz` or `.bgz` appended (compressed)

use std::io::{BufRead, Write};
use std::path::Path;

use noodles::fasta;

use crate::parsing::{non_empty_description, open_buffered, ParseError, SequenceRecord};

/// Default number of residues per FASTA sequence line
pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Read every record of a FASTA file.
///
/// An empty file yields no records.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read or `ParseError::Noodles`
/// if a record is malformed.
pub fn read_fasta(path: &Path) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut reader = fasta::io::Reader::new(open_buffered(path)?);
    read_fasta_records(&mut reader)
}

/// Read every record from a noodles FASTA reader
fn read_fasta_records<R: BufRead>(reader: &mut fasta::io::Reader<R>) -> Result<Vec<SequenceRecord>, ParseError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        let name = String::from_utf8_lossy(record.name()).to_string();
        let description = record.description().and_then(|d| non_empty_description(d));

        records.push(SequenceRecord {
            name,
            description,
            sequence: record.sequence().as_ref().to_vec(),
        });
    }

    Ok(records)
}

/// Write one FASTA record, wrapping the sequence every `line_width` residues
/// (0 writes the whole sequence on one line).
///
/// # Errors
///
/// Returns any write error.
pub fn write_fasta_record<W: Write>(
    writer: &mut W,
    record: &SequenceRecord,
    line_width: usize,
) -> std::io::Result<()> {
    writeln!(writer, ">{}", record.header())?;

    if record.sequence.is_empty() {
        return writeln!(writer);
    }

    let width = if line_width == 0 {
        record.sequence.len()
    } else {
        line_width
    };
    for line in record.sequence.chunks(width) {
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}
