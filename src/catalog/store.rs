use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use crate::converters;
use crate::core::converter::{Conversion, Converter, ConverterDescriptor};
use crate::core::error::ConvertError;
use crate::core::extension::Extension;
use crate::core::method::MethodRegistry;

/// The converter catalog with its method registry
#[derive(Debug, Default)]
pub struct ConverterCatalog {
    /// All registered converters, in registration order
    pub converters: Vec<ConverterDescriptor>,

    /// Index: converter ID -> index in converters vec
    id_to_index: HashMap<String, usize>,

    /// Methods of every registered converter
    methods: MethodRegistry,
}

impl ConverterCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every built-in converter registered.
    ///
    /// # Errors
    ///
    /// Returns the first registration error; built-in converters are expected
    /// to register cleanly.
    pub fn builtin() -> Result<Self, ConvertError> {
        let mut catalog = Self::new();
        converters::register_builtin(&mut catalog)?;
        debug!("Registered {} built-in converters", catalog.len());
        Ok(catalog)
    }

    /// Register a converter type and its methods.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::DuplicateConverter` if the converter's ID is taken
    /// or any of its (input, output) combinations is already claimed,
    /// `ConvertError::InvalidExtension` for bad extensions,
    /// `ConvertError::NoDefaultMethod` if it declares no default method, and
    /// any error raised while registering its methods. A failed registration
    /// leaves the catalog unchanged.
    pub fn register_converter<C: Converter>(&mut self) -> Result<(), ConvertError> {
        let descriptor = ConverterDescriptor::of::<C>()?;

        for existing in &self.converters {
            let overlap = if existing.id == descriptor.id {
                descriptor
                    .input_ext
                    .iter()
                    .next()
                    .zip(descriptor.output_ext.iter().next())
            } else {
                existing
                    .input_ext
                    .first_shared(&descriptor.input_ext)
                    .zip(existing.output_ext.first_shared(&descriptor.output_ext))
            };

            if let Some((input, output)) = overlap {
                return Err(ConvertError::DuplicateConverter {
                    existing: existing.id.clone(),
                    new: descriptor.id.clone(),
                    input: input.to_string(),
                    output: output.to_string(),
                });
            }
        }

        let mut methods = MethodRegistry::new();
        C::register_methods(&mut methods)?;
        if !methods.has_default(C::ID) {
            return Err(ConvertError::NoDefaultMethod(C::ID.to_string()));
        }
        self.methods.absorb(methods);

        debug!(
            "Registered converter {} ({} -> {}) with methods [{}]",
            descriptor.id,
            descriptor.input_ext,
            descriptor.output_ext,
            self.methods.names(&descriptor.id).collect::<Vec<_>>().join(", ")
        );

        self.id_to_index
            .insert(descriptor.id.clone(), self.converters.len());
        self.converters.push(descriptor);
        Ok(())
    }

    /// Find the converter handling an (input, output) extension pair.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::NoConverterFound` if no converter claims the pair.
    pub fn lookup(&self, input: &Extension, output: &Extension) -> Result<&ConverterDescriptor, ConvertError> {
        self.converters
            .iter()
            .find(|c| c.input_ext.contains(input) && c.output_ext.contains(output))
            .ok_or_else(|| ConvertError::NoConverterFound {
                input: input.to_string(),
                output: output.to_string(),
            })
    }

    /// Get a converter by ID
    pub fn get(&self, id: &str) -> Option<&ConverterDescriptor> {
        self.id_to_index.get(id).map(|&idx| &self.converters[idx])
    }

    /// Bind input and output paths to a registered converter.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InputNotFound` if the input does not exist.
    pub fn open<'a>(
        &'a self,
        descriptor: &'a ConverterDescriptor,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Result<Conversion<'a>, ConvertError> {
        Conversion::new(descriptor, &self.methods, input, output)
    }

    /// Methods of every registered converter
    pub fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    /// Number of converters in catalog
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Check if catalog is empty
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}
