use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;

use crate::catalog::ConverterCatalog;
use crate::cli::OutputFormat;
use crate::converters::fasta2fastq::QUALITY_FILE;
use crate::converters::fastq2fasta::LINE_WIDTH;
use crate::core::options::ConversionOptions;
use crate::dispatch::{ConversionReport, Dispatcher};
use crate::utils::output::{md5_file, write_atomically};

#[derive(Args)]
pub struct ConvertArgs {
    /// Input file; the converter is chosen from its extension (.gz/.bgz is looked through)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file; its extension selects the target format
    #[arg(required = true)]
    pub output: PathBuf,

    /// Conversion method (defaults to the converter's default method)
    #[arg(short, long)]
    pub method: Option<String>,

    /// The path to the quality file (FASTA to FASTQ)
    #[arg(long)]
    pub quality_file: Option<PathBuf>,

    /// Residues per sequence line (FASTQ to FASTA, 0 for a single line)
    #[arg(long)]
    pub line_width: Option<usize>,

    /// Additional converter option as KEY=VALUE (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub extra: Vec<String>,

    /// Write to a temporary file and rename it into place on success
    #[arg(long)]
    pub atomic: bool,

    /// Overwrite the output file if it already exists
    #[arg(long)]
    pub force: bool,

    /// Print the MD5 checksum of the output file
    #[arg(long)]
    pub checksum: bool,
}

impl ConvertArgs {
    /// Collect the converter options given on the command line
    fn options(&self) -> anyhow::Result<ConversionOptions> {
        let mut options = ConversionOptions::new();
        if let Some(path) = &self.quality_file {
            options.insert_path(QUALITY_FILE, path)?;
        }
        if let Some(width) = self.line_width {
            options.insert(LINE_WIDTH, width.to_string());
        }
        for pair in &self.extra {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("Invalid --set value '{pair}', expected KEY=VALUE"))?;
            options.insert(key.trim().replace('-', "_"), value.trim());
        }
        Ok(options)
    }
}

pub fn run(args: ConvertArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "Output file {} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let options = args.options()?;
    let dispatcher = Dispatcher::new(ConverterCatalog::builtin()?);

    if verbose {
        let converter = dispatcher.resolve(&args.input, &args.output)?;
        eprintln!(
            "Converter: {} ({} -> {})",
            converter.id, converter.input_ext, converter.output_ext
        );
    }

    let method = args.method.as_deref();
    let mut report = if args.atomic {
        write_atomically(&args.output, |temp| {
            dispatcher.convert(&args.input, temp, method, &options)
        })?
    } else {
        dispatcher.convert(&args.input, &args.output, method, &options)?
    };
    report.output.clone_from(&args.output);

    let checksum = if args.checksum {
        Some(md5_file(&report.output)?)
    } else {
        None
    };

    match format {
        OutputFormat::Text => print_text_report(&report, checksum.as_deref()),
        OutputFormat::Json => print_json_report(&report, checksum.as_deref())?,
        OutputFormat::Tsv => print_tsv_report(&report, checksum.as_deref()),
    }

    Ok(())
}

fn print_text_report(report: &ConversionReport, checksum: Option<&str>) {
    println!(
        "Converted {} -> {} ({} via {}, {:.2?})",
        report.input.display(),
        report.output.display(),
        report.converter,
        report.method,
        report.elapsed
    );
    if let Some(md5) = checksum {
        println!("MD5: {md5}");
    }
}

fn print_json_report(report: &ConversionReport, checksum: Option<&str>) -> anyhow::Result<()> {
    let mut output = serde_json::to_value(report)?;
    if let Some(md5) = checksum {
        output["md5"] = serde_json::Value::from(md5);
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &ConversionReport, checksum: Option<&str>) {
    println!("input\toutput\tconverter\tmethod\telapsed_ms\tmd5");
    println!(
        "{}\t{}\t{}\t{}\t{}\t{}",
        display(&report.input),
        display(&report.output),
        report.converter,
        report.method,
        report.elapsed.as_millis(),
        checksum.unwrap_or("")
    );
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> ConvertArgs {
        ConvertArgs {
            input: PathBuf::from("in.fa"),
            output: PathBuf::from("out.fq"),
            method: None,
            quality_file: Some(PathBuf::from("q.fa")),
            line_width: None,
            extra: extra.iter().map(|s| (*s).to_string()).collect(),
            atomic: false,
            force: false,
            checksum: false,
        }
    }

    #[test]
    fn test_options_from_flags() {
        let options = args(&["line-width=60"]).options().unwrap();
        assert_eq!(options.get(QUALITY_FILE), Some("q.fa"));
        assert_eq!(options.get(LINE_WIDTH), Some("60"));
    }

    #[test]
    fn test_bad_set_value() {
        assert!(args(&["no-equals-sign"]).options().is_err());
    }
}
