//! Aligned FASTA to Phylip.

use anyhow::{Context, Result};
use tracing::info;

use crate::converters::external;
use crate::core::capability::CapabilityRequirement;
use crate::core::converter::{Conversion, Converter};
use crate::core::error::ConvertError;
use crate::core::method::MethodRegistry;
use crate::core::options::ConversionOptions;
use crate::parsing::fasta::read_fasta;
use crate::parsing::phylip::write_phylip;

pub struct Fasta2Phylip;

impl Converter for Fasta2Phylip {
    const ID: &'static str = "fasta2phylip";
    const INPUT_EXT: &'static [&'static str] = &[".fa", ".fas", ".fasta", ".fna"];
    const OUTPUT_EXT: &'static [&'static str] = &[".phylip", ".phy"];

    fn register_methods(methods: &mut MethodRegistry) -> Result<(), ConvertError> {
        methods.register(Self::ID, "native", native, None, true)?;
        methods.register(
            Self::ID,
            "squizz",
            squizz,
            Some(CapabilityRequirement::executable("squizz")),
            false,
        )
    }
}

fn native(conversion: &Conversion<'_>, _options: &ConversionOptions) -> Result<()> {
    let records = read_fasta(conversion.input())
        .with_context(|| format!("reading {}", conversion.input().display()))?;

    // Validate the whole alignment before touching the output path
    let mut buffer = Vec::new();
    write_phylip(&mut buffer, &records)?;
    std::fs::write(conversion.output(), buffer)
        .with_context(|| format!("writing {}", conversion.output().display()))?;

    info!("Wrote {} taxa to {}", records.len(), conversion.output().display());
    Ok(())
}

fn squizz(conversion: &Conversion<'_>, _options: &ConversionOptions) -> Result<()> {
    external::run_to_file(
        "squizz",
        [
            std::ffi::OsStr::new("-c"),
            std::ffi::OsStr::new("PHYLIPI"),
            conversion.input().as_os_str(),
        ],
        conversion.output(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ConverterCatalog;
    use crate::core::capability::SystemProbe;
    use std::io::Write;
    use std::path::Path;
    use tempfile::{tempdir, NamedTempFile};

    fn convert(content: &[u8], output: &Path) -> Result<(), ConvertError> {
        let mut input = NamedTempFile::with_suffix(".fasta").unwrap();
        input.write_all(content).unwrap();
        input.flush().unwrap();

        let mut catalog = ConverterCatalog::new();
        catalog.register_converter::<Fasta2Phylip>().unwrap();
        let descriptor = catalog.get(Fasta2Phylip::ID).unwrap();
        let conversion = catalog.open(descriptor, input.path(), output)?;
        conversion.invoke(None, &ConversionOptions::new(), &SystemProbe::new())?;
        Ok(())
    }

    #[test]
    fn test_aligned_input() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.phylip");

        convert(b">human\nAC-T\n>chimpanzee_1\nACGT\n", &output).unwrap();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            " 2 4\nhuman     AC-T\nchimpanzeACGT\n"
        );
    }

    #[test]
    fn test_unaligned_input_fails_without_output() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.phy");

        let err = convert(b">a\nACGT\n>b\nAC\n", &output).unwrap_err();
        match err {
            ConvertError::ConversionFailed { method, source } => {
                assert_eq!(method, "native");
                assert!(source.to_string().contains("must be aligned"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!output.exists());
    }
}
