//! The contract every format-pair converter implements, and the per-request
//! conversion instance that runs one of its methods.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::core::capability::CapabilityProbe;
use crate::core::error::ConvertError;
use crate::core::extension::ExtensionSet;
use crate::core::method::{Method, MethodRegistry};
use crate::core::options::ConversionOptions;

/// How many values an additional argument takes on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nargs {
    /// Exactly one value
    One,
    /// Zero or one value
    Optional,
}

/// Validator applied to an additional argument's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    /// Path to a file that must already exist
    ExistingFile,
    /// Non-negative integer
    Integer,
    /// Free text
    Text,
}

impl ArgKind {
    /// Check a raw value against this kind.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason if the value is rejected.
    pub fn validate(self, value: &str) -> Result<(), String> {
        match self {
            Self::ExistingFile => {
                if Path::new(value).is_file() {
                    Ok(())
                } else {
                    Err(format!("file not found: {value}"))
                }
            }
            Self::Integer => value
                .parse::<usize>()
                .map(|_| ())
                .map_err(|_| format!("expected a non-negative integer, got '{value}'")),
            Self::Text => Ok(()),
        }
    }
}

/// An argument a converter accepts beyond the input and output paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgDescriptor {
    /// Option key, e.g. `quality_file`
    pub name: String,
    pub nargs: Nargs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    pub kind: ArgKind,
    pub help: String,
}

impl ArgDescriptor {
    pub fn new(name: impl Into<String>, kind: ArgKind, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nargs: Nargs::One,
            default: None,
            kind,
            help: help.into(),
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.nargs = Nargs::Optional;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Command-line spelling, e.g. `--quality-file`
    pub fn flag(&self) -> String {
        format!("--{}", self.name.replace('_', "-"))
    }
}

/// A format-pair converter.
///
/// Implementors declare their extension sets and register their methods once,
/// through [`ConverterCatalog::register_converter`](crate::catalog::ConverterCatalog::register_converter).
pub trait Converter {
    /// Unique converter ID, e.g. `fasta2fastq`
    const ID: &'static str;

    /// Accepted input extensions
    const INPUT_EXT: &'static [&'static str];

    /// Produced output extensions
    const OUTPUT_EXT: &'static [&'static str];

    /// Register this converter's methods under [`Self::ID`].
    ///
    /// # Errors
    ///
    /// Propagates registration errors from the registry.
    fn register_methods(methods: &mut MethodRegistry) -> Result<(), ConvertError>;

    /// Arguments beyond the universal input and output paths
    fn additional_arguments() -> Vec<ArgDescriptor> {
        Vec::new()
    }
}

/// A registered converter type: its ID, extension sets and extra arguments.
#[derive(Debug, Clone, Serialize)]
pub struct ConverterDescriptor {
    pub id: String,
    pub input_ext: ExtensionSet,
    pub output_ext: ExtensionSet,
    arguments: Vec<ArgDescriptor>,
}

impl ConverterDescriptor {
    /// Build the descriptor of a converter type, normalizing its extensions.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidExtension` if any declared extension is invalid.
    pub fn of<C: Converter>() -> Result<Self, ConvertError> {
        Ok(Self {
            id: C::ID.to_string(),
            input_ext: ExtensionSet::parse(C::INPUT_EXT)?,
            output_ext: ExtensionSet::parse(C::OUTPUT_EXT)?,
            arguments: C::additional_arguments(),
        })
    }

    pub fn additional_arguments(&self) -> impl Iterator<Item = &ArgDescriptor> + Clone {
        self.arguments.iter()
    }

    /// Check supplied options and fill in declared defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidOption` for an option this converter does
    /// not declare or whose value fails the argument's validator.
    pub fn resolve_options(&self, options: &ConversionOptions) -> Result<ConversionOptions, ConvertError> {
        for (name, value) in options.iter() {
            let descriptor = self
                .arguments
                .iter()
                .find(|arg| arg.name == name)
                .ok_or_else(|| ConvertError::InvalidOption {
                    name: name.to_string(),
                    reason: format!("not accepted by converter '{}'", self.id),
                })?;
            descriptor
                .kind
                .validate(value)
                .map_err(|reason| ConvertError::InvalidOption {
                    name: name.to_string(),
                    reason,
                })?;
        }

        let mut resolved = options.clone();
        for arg in &self.arguments {
            if let (false, Some(default)) = (resolved.contains(&arg.name), &arg.default) {
                resolved.insert(arg.name.clone(), default.clone());
            }
        }
        Ok(resolved)
    }
}

/// One conversion request bound to a converter: the base every method receives.
#[derive(Debug)]
pub struct Conversion<'a> {
    descriptor: &'a ConverterDescriptor,
    methods: &'a MethodRegistry,
    input: PathBuf,
    output: PathBuf,
}

impl<'a> Conversion<'a> {
    /// Bind input and output paths to a converter.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InputNotFound` if the input path does not exist.
    pub fn new(
        descriptor: &'a ConverterDescriptor,
        methods: &'a MethodRegistry,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Result<Self, ConvertError> {
        let input = input.into();
        if !input.exists() {
            return Err(ConvertError::InputNotFound(input));
        }
        Ok(Self {
            descriptor,
            methods,
            input,
            output: output.into(),
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn descriptor(&self) -> &ConverterDescriptor {
        self.descriptor
    }

    /// Method names, default first. The iterator can be cloned and replayed.
    pub fn available_methods(&self) -> impl Iterator<Item = &'a str> + Clone + 'a {
        self.methods.names(&self.descriptor.id)
    }

    /// Run a method (or the default) with the given options.
    ///
    /// Returns the method that ran.
    ///
    /// # Errors
    ///
    /// Returns `UnknownMethod`/`NoDefaultMethod` if resolution fails,
    /// `InvalidOption` for unacceptable options, `MissingDependency` if the
    /// method's requirement is unmet (the method is not called), errors from
    /// the taxonomy raised by the method unchanged, and `ConversionFailed`
    /// wrapping any other failure.
    pub fn invoke(
        &self,
        method: Option<&str>,
        options: &ConversionOptions,
        probe: &dyn CapabilityProbe,
    ) -> Result<&'a Method, ConvertError> {
        let method = self.methods.resolve(&self.descriptor.id, method)?;
        let options = self.descriptor.resolve_options(options)?;

        if let Some(requirement) = &method.requirement {
            if !probe.is_available(requirement) {
                return Err(ConvertError::MissingDependency {
                    converter: self.descriptor.id.clone(),
                    method: method.name.clone(),
                    requirement: requirement.clone(),
                });
            }
        }

        debug!(
            "Running {}::{} on {} -> {}",
            self.descriptor.id,
            method.name,
            self.input.display(),
            self.output.display()
        );

        method.call(self, &options).map_err(|err| match err.downcast::<ConvertError>() {
            Ok(known) => known,
            Err(other) => ConvertError::ConversionFailed {
                method: method.name.clone(),
                source: other.into(),
            },
        })?;

        Ok(method)
    }
}
