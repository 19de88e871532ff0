//! FASTA to FASTQ.
//!
//! Qualities come from an optional quality file: a FASTA-formatted file whose
//! records carry the quality string as their sequence, with the same record
//! names in the same order as the input. Without one every base gets the
//! placeholder quality `I`.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::converters::external;
use crate::core::capability::CapabilityRequirement;
use crate::core::converter::{ArgDescriptor, ArgKind, Conversion, Converter};
use crate::core::error::ConvertError;
use crate::core::method::MethodRegistry;
use crate::core::options::ConversionOptions;
use crate::parsing::fasta::read_fasta;
use crate::parsing::fastq::{placeholder_quality, write_fastq_record, PLACEHOLDER_QUALITY};
use crate::parsing::SequenceRecord;

/// Option key of the quality file argument
pub const QUALITY_FILE: &str = "quality_file";

pub struct Fasta2Fastq;

impl Converter for Fasta2Fastq {
    const ID: &'static str = "fasta2fastq";
    const INPUT_EXT: &'static [&'static str] = &[".fa", ".fas", ".fasta", ".fna"];
    const OUTPUT_EXT: &'static [&'static str] = &[".fastq", "fq"];

    fn register_methods(methods: &mut MethodRegistry) -> Result<(), ConvertError> {
        methods.register(
            Self::ID,
            "native",
            native,
            Some(CapabilityRequirement::library("noodles")),
            true,
        )?;
        methods.register(
            Self::ID,
            "seqtk",
            seqtk,
            Some(CapabilityRequirement::executable("seqtk")),
            false,
        )
    }

    fn additional_arguments() -> Vec<ArgDescriptor> {
        vec![ArgDescriptor::new(
            QUALITY_FILE,
            ArgKind::ExistingFile,
            "The path to the quality file.",
        )
        .optional()]
    }
}

fn native(conversion: &Conversion<'_>, options: &ConversionOptions) -> Result<()> {
    let records = read_fasta(conversion.input())
        .with_context(|| format!("reading {}", conversion.input().display()))?;

    let qualities = match options.path(QUALITY_FILE) {
        Some(path) => Some(read_qualities(&path, &records)?),
        None => {
            warn!("No quality file provided, using placeholder quality '{}'", PLACEHOLDER_QUALITY as char);
            None
        }
    };

    let file = File::create(conversion.output())
        .with_context(|| format!("creating {}", conversion.output().display()))?;
    let mut writer = BufWriter::new(file);

    for (i, record) in records.iter().enumerate() {
        match &qualities {
            Some(qualities) => write_fastq_record(&mut writer, record, &qualities[i].sequence)?,
            None => write_fastq_record(&mut writer, record, &placeholder_quality(&record.sequence))?,
        }
    }
    writer.flush()?;

    info!("Wrote {} FASTQ records to {}", records.len(), conversion.output().display());
    Ok(())
}

/// Read the quality file and check it lines up with the input records.
fn read_qualities(path: &Path, records: &[SequenceRecord]) -> Result<Vec<SequenceRecord>> {
    let qualities =
        read_fasta(path).with_context(|| format!("reading quality file {}", path.display()))?;
    check_records_match(records, &qualities)?;
    Ok(qualities)
}

/// Input and quality records must agree on count, names, order and length.
///
/// # Errors
///
/// Returns `ConvertError::RecordMismatch` at the first index where the names
/// differ, or `ConvertError::QualityLengthMismatch` where a quality string is
/// not as long as its sequence.
pub fn check_records_match(
    records: &[SequenceRecord],
    qualities: &[SequenceRecord],
) -> Result<(), ConvertError> {
    let longest = records.len().max(qualities.len());

    for index in 0..longest {
        let expected = records.get(index).map(|r| r.name.as_str());
        let found = qualities.get(index).map(|q| q.name.as_str());
        if expected != found {
            return Err(ConvertError::RecordMismatch {
                index,
                expected: expected.unwrap_or("<end of input>").to_string(),
                found: found.unwrap_or("<end of quality file>").to_string(),
            });
        }
        if let (Some(record), Some(quality)) = (records.get(index), qualities.get(index)) {
            if record.sequence.len() != quality.sequence.len() {
                return Err(ConvertError::QualityLengthMismatch {
                    index,
                    name: record.name.clone(),
                    sequence_length: record.sequence.len(),
                    quality_length: quality.sequence.len(),
                });
            }
        }
    }
    Ok(())
}

fn seqtk(conversion: &Conversion<'_>, options: &ConversionOptions) -> Result<()> {
    if options.contains(QUALITY_FILE) {
        bail!("the seqtk method does not support a quality file");
    }

    let placeholder = (PLACEHOLDER_QUALITY as char).to_string();
    let args: [&OsStr; 4] = [
        OsStr::new("seq"),
        OsStr::new("-F"),
        OsStr::new(&placeholder),
        conversion.input().as_os_str(),
    ];
    external::run_to_file("seqtk", args, conversion.output())
}
