//! FASTQ to FASTA. Qualities are dropped.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::converters::external;
use crate::core::capability::CapabilityRequirement;
use crate::core::converter::{ArgDescriptor, ArgKind, Conversion, Converter};
use crate::core::error::ConvertError;
use crate::core::method::MethodRegistry;
use crate::core::options::ConversionOptions;
use crate::parsing::fasta::{write_fasta_record, DEFAULT_LINE_WIDTH};
use crate::parsing::fastq::read_fastq;

/// Option key of the line width argument
pub const LINE_WIDTH: &str = "line_width";

pub struct Fastq2Fasta;

impl Converter for Fastq2Fasta {
    const ID: &'static str = "fastq2fasta";
    const INPUT_EXT: &'static [&'static str] = &[".fastq", ".fq"];
    const OUTPUT_EXT: &'static [&'static str] = &[".fa", ".fas", ".fasta"];

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
            LINE_WIDTH,
            ArgKind::Integer,
            "Residues per sequence line (0 for a single line).",
        )
        .with_default(DEFAULT_LINE_WIDTH.to_string())]
    }
}

fn line_width(options: &ConversionOptions) -> Result<usize> {
    Ok(options.usize(LINE_WIDTH)?.unwrap_or(DEFAULT_LINE_WIDTH))
}

fn native(conversion: &Conversion<'_>, options: &ConversionOptions) -> Result<()> {
    let width = line_width(options)?;
    let records = read_fastq(conversion.input())
        .with_context(|| format!("reading {}", conversion.input().display()))?;

    let file = File::create(conversion.output())
        .with_context(|| format!("creating {}", conversion.output().display()))?;
    let mut writer = BufWriter::new(file);

    for record in &records {
        write_fasta_record(&mut writer, record, width)?;
    }
    writer.flush()?;

    info!("Wrote {} FASTA records to {}", records.len(), conversion.output().display());
    Ok(())
}

fn seqtk(conversion: &Conversion<'_>, options: &ConversionOptions) -> Result<()> {
    let width = line_width(options)?.to_string();
    let args: [&OsStr; 5] = [
        OsStr::new("seq"),
        OsStr::new("-A"),
        OsStr::new("-l"),
        OsStr::new(&width),
        conversion.input().as_os_str(),
    ];
    external::run_to_file("seqtk", args, conversion.output())
}
