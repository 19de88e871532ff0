//! Built-in converters.
//!
//! | Converter | Input | Output | Methods (default first) |
//! |-----------|-------|--------|-------------------------|
//! | `fasta2fastq` | .fa .fas .fasta .fna | .fastq .fq | native, seqtk |
//! | `fastq2fasta` | .fastq .fq | .fa .fas .fasta | native, seqtk |
//! | `fasta2phylip` | .fa .fas .fasta .fna | .phylip .phy | native, squizz |
//! | `embl2genbank` | .embl | .gbk .genbank .gb | seqret, squizz |
//!
//! Native methods use the noodles readers compiled into this binary; the
//! others shell out to the named tool, which must be on `PATH`.

use crate::catalog::ConverterCatalog;
use crate::core::error::ConvertError;

pub mod embl2genbank;
mod external;
pub mod fasta2fastq;
pub mod fasta2phylip;
pub mod fastq2fasta;

pub use embl2genbank::Embl2Genbank;
pub use fasta2fastq::Fasta2Fastq;
pub use fasta2phylip::Fasta2Phylip;
pub use fastq2fasta::Fastq2Fasta;

/// Register every built-in converter.
///
/// # Errors
///
/// Returns the first registration error.
pub fn register_builtin(catalog: &mut ConverterCatalog) -> Result<(), ConvertError> {
    catalog.register_converter::<Fasta2Fastq>()?;
    catalog.register_converter::<Fastq2Fasta>()?;
    catalog.register_converter::<Fasta2Phylip>()?;
    catalog.register_converter::<Embl2Genbank>()?;
    Ok(())
}
