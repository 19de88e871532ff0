//! Command-line interface for bioconvert.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **convert**: Convert one file, picking the converter from the file extensions
//! - **list**: Show registered converters, their methods and extra arguments
//! - **batch**: Run many conversions from a tab-separated job list
//!
//! ## Usage
//!
//! ```text
//! # FASTA to FASTQ with placeholder qualities
//! bioconvert convert reads.fa reads.fastq
//!
//! # Use real qualities and write atomically
//! bioconvert convert reads.fa reads.fastq --quality-file reads.qual --atomic
//!
//! # Pick a specific method
//! bioconvert convert aln.fasta aln.phylip --method squizz
//!
//! # What is available on this machine?
//! bioconvert list --format json
//!
//! # Many files at once, four at a time
//! bioconvert batch jobs.tsv --jobs 4
//! ```

use clap::{Parser, Subcommand};

pub mod batch;
pub mod convert;
pub mod list;

#[derive(Parser)]
#[command(name = "bioconvert")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Convert between life-science file formats")]
#[command(
    long_about = "bioconvert converts between life-science file formats (FASTA, FASTQ, Phylip, EMBL, GenBank).\n\nThe converter is chosen from the input and output file extensions. Each converter offers one or more methods: a native implementation and/or external tools. The default method is used unless --method is given, and a method whose library or executable is missing fails instead of silently falling back to another one."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a file to another format
    Convert(convert::ConvertArgs),

    /// List converters and methods
    List(list::ListArgs),

    /// Run conversions listed in a tab-separated file
    Batch(batch::BatchArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
