use std::path::PathBuf;

use thiserror::Error;

use crate::core::capability::CapabilityRequirement;

/// Errors raised while registering converters or running a conversion.
///
/// Registration-time variants (`DuplicateConverter`, `DuplicateMethod`,
/// `MultipleDefaults`, `InvalidRequirement`, `InvalidExtension`) surface from
/// [`ConverterCatalog::builtin`](crate::catalog::ConverterCatalog::builtin)
/// before any request is served. All other variants are request-time.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Converter '{new}' overlaps with '{existing}' on {input} -> {output}")]
    DuplicateConverter {
        existing: String,
        new: String,
        input: String,
        output: String,
    },

    #[error("Method '{method}' is already registered for converter '{converter}'")]
    DuplicateMethod { converter: String, method: String },

    #[error("Converter '{converter}' already has default method '{existing}', cannot make '{method}' default")]
    MultipleDefaults {
        converter: String,
        existing: String,
        method: String,
    },

    #[error("Invalid capability requirement for method '{method}': {reason}")]
    InvalidRequirement { method: String, reason: String },

    #[error("Invalid extension '{0}'")]
    InvalidExtension(String),

    #[error("No converter found for {input} -> {output}")]
    NoConverterFound { input: String, output: String },

    #[error("Unknown method '{method}' for converter '{converter}' (available: {})", .available.join(", "))]
    UnknownMethod {
        converter: String,
        method: String,
        available: Vec<String>,
    },

    #[error("Converter '{0}' has no default method")]
    NoDefaultMethod(String),

    #[error("Method '{method}' of converter '{converter}' requires {requirement}, which is not available")]
    MissingDependency {
        converter: String,
        method: String,
        requirement: CapabilityRequirement,
    },

    #[error("Invalid option '{name}': {reason}")]
    InvalidOption { name: String, reason: String },

    #[error("Record {index} mismatch: expected '{expected}', found '{found}'")]
    RecordMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Record {index} ('{name}'): sequence has {sequence_length} bases but quality has {quality_length} values")]
    QualityLengthMismatch {
        index: usize,
        name: String,
        sequence_length: usize,
        quality_length: usize,
    },

    #[error("Conversion with method '{method}' failed: {source}")]
    ConversionFailed {
        method: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl ConvertError {
    /// True for errors that indicate a misconfigured converter rather than a bad request.
    #[must_use]
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateConverter { .. }
                | Self::DuplicateMethod { .. }
                | Self::MultipleDefaults { .. }
                | Self::InvalidRequirement { .. }
                | Self::InvalidExtension(_)
        )
    }
}
