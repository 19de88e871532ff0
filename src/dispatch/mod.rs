//! End-to-end conversion: extension lookup, method resolution, capability check, invocation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bioconvert::{ConverterCatalog, Dispatcher};
//! use bioconvert::core::options::ConversionOptions;
//! use std::path::Path;
//!
//! let dispatcher = Dispatcher::new(ConverterCatalog::builtin().unwrap());
//! let report = dispatcher
//!     .convert(Path::new("reads.fa"), Path::new("reads.fq"), None, &ConversionOptions::new())
//!     .unwrap();
//! println!("{} via {}", report.converter, report.method);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use crate::catalog::ConverterCatalog;
use crate::core::capability::{CapabilityProbe, SystemProbe};
use crate::core::converter::ConverterDescriptor;
use crate::core::error::ConvertError;
use crate::core::extension::Extension;
use crate::core::options::ConversionOptions;

pub mod batch;

/// Outcome of a successful conversion
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub converter: String,
    pub method: String,
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(serialize_with = "serialize_millis", rename = "elapsed_ms")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

/// Resolves and runs conversions against a read-only catalog.
///
/// Cheap to clone; clones share the catalog and probe.
#[derive(Clone)]
pub struct Dispatcher {
    catalog: Arc<ConverterCatalog>,
    probe: Arc<dyn CapabilityProbe>,
}

impl Dispatcher {
    /// Dispatcher using the system probe
    pub fn new(catalog: ConverterCatalog) -> Self {
        Self::with_probe(catalog, SystemProbe::new())
    }

    pub fn with_probe(catalog: ConverterCatalog, probe: impl CapabilityProbe + 'static) -> Self {
        Self {
            catalog: Arc::new(catalog),
            probe: Arc::new(probe),
        }
    }

    pub fn catalog(&self) -> &ConverterCatalog {
        &self.catalog
    }

    pub fn probe(&self) -> &dyn CapabilityProbe {
        self.probe.as_ref()
    }

    /// Converter responsible for an (input path, output path) pair.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::NoConverterFound` if no converter claims the
    /// pair, including when either path has no usable extension.
    pub fn resolve(&self, input: &Path, output: &Path) -> Result<&ConverterDescriptor, ConvertError> {
        match (Extension::from_input_path(input), Extension::from_path(output)) {
            (Ok(input_ext), Ok(output_ext)) => self.catalog.lookup(&input_ext, &output_ext),
            (input_ext, output_ext) => Err(ConvertError::NoConverterFound {
                input: describe_extension(input_ext, input),
                output: describe_extension(output_ext, output),
            }),
        }
    }

    /// Convert `input` to `output` with the named method, or the converter's default.
    ///
    /// No other method is tried if the chosen one is unavailable or fails.
    ///
    /// # Errors
    ///
    /// Returns `NoConverterFound`, `InputNotFound`, `UnknownMethod`,
    /// `NoDefaultMethod`, `InvalidOption`, `MissingDependency`,
    /// `RecordMismatch` or `ConversionFailed`; see [`ConvertError`].
    pub fn convert(
        &self,
        input: &Path,
        output: &Path,
        method: Option<&str>,
        options: &ConversionOptions,
    ) -> Result<ConversionReport, ConvertError> {
        let start = Instant::now();
        let descriptor = self.resolve(input, output)?;
        let conversion = self.catalog.open(descriptor, input, output)?;
        let method = conversion.invoke(method, options, self.probe.as_ref())?;

        let report = ConversionReport {
            converter: descriptor.id.clone(),
            method: method.name.clone(),
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            elapsed: start.elapsed(),
        };

        info!(
            "Converted {} -> {} with {}::{} in {:.2?}",
            input.display(),
            output.display(),
            report.converter,
            report.method,
            report.elapsed
        );
        Ok(report)
    }
}

/// Extension for error messages, or the path itself when it has none
fn describe_extension(ext: Result<Extension, ConvertError>, path: &Path) -> String {
    ext.map_or_else(|_| path.display().to_string(), |ext| ext.to_string())
}
