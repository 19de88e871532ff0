use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::capability::CapabilityRequirement;
use crate::core::converter::Conversion;
use crate::core::error::ConvertError;
use crate::core::options::ConversionOptions;

/// Callable implementing one conversion strategy.
pub type MethodFn =
    Arc<dyn Fn(&Conversion<'_>, &ConversionOptions) -> anyhow::Result<()> + Send + Sync>;

/// A named conversion strategy belonging to one converter
#[derive(Clone)]
pub struct Method {
    pub name: String,
    pub requirement: Option<CapabilityRequirement>,
    pub is_default: bool,
    callable: MethodFn,
}

impl Method {
    /// Run the underlying callable without any capability or option checks.
    ///
    /// # Errors
    ///
    /// Returns whatever the callable returns.
    pub fn call(&self, conversion: &Conversion<'_>, options: &ConversionOptions) -> anyhow::Result<()> {
        (self.callable)(conversion, options)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("requirement", &self.requirement)
            .field("is_default", &self.is_default)
            .finish_non_exhaustive()
    }
}

/// Methods of every converter, keyed by converter ID, in registration order
#[derive(Debug, Default)]
pub struct MethodRegistry {
    methods: HashMap<String, Vec<Method>>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a method for a converter.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::DuplicateMethod` if the name is taken for this converter,
    /// `ConvertError::MultipleDefaults` if a default already exists and `is_default` is set,
    /// or `ConvertError::InvalidRequirement` if the requirement is malformed.
    pub fn register<F>(
        &mut self,
        converter_id: &str,
        method_name: &str,
        callable: F,
        requirement: Option<CapabilityRequirement>,
        is_default: bool,
    ) -> Result<(), ConvertError>
    where
        F: Fn(&Conversion<'_>, &ConversionOptions) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        if let Some(requirement) = &requirement {
            requirement
                .validate()
                .map_err(|reason| ConvertError::InvalidRequirement {
                    method: method_name.to_string(),
                    reason,
                })?;
        }

        let methods = self.methods.entry(converter_id.to_string()).or_default();

        if methods.iter().any(|m| m.name == method_name) {
            return Err(ConvertError::DuplicateMethod {
                converter: converter_id.to_string(),
                method: method_name.to_string(),
            });
        }

        if is_default {
            if let Some(existing) = methods.iter().find(|m| m.is_default) {
                return Err(ConvertError::MultipleDefaults {
                    converter: converter_id.to_string(),
                    existing: existing.name.clone(),
                    method: method_name.to_string(),
                });
            }
        }

        methods.push(Method {
            name: method_name.to_string(),
            requirement,
            is_default,
            callable: Arc::new(callable),
        });
        Ok(())
    }

    /// Resolve a method by name, or the converter's default when no name is given.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::UnknownMethod` if the name is not registered or
    /// `ConvertError::NoDefaultMethod` if no name is given and no default exists.
    pub fn resolve(&self, converter_id: &str, method_name: Option<&str>) -> Result<&Method, ConvertError> {
        let methods = self.methods.get(converter_id).map_or(&[][..], Vec::as_slice);

        match method_name {
            Some(name) => methods
                .iter()
                .find(|m| m.name == name)
                .ok_or_else(|| ConvertError::UnknownMethod {
                    converter: converter_id.to_string(),
                    method: name.to_string(),
                    available: self.names(converter_id).map(str::to_string).collect(),
                }),
            None => methods
                .iter()
                .find(|m| m.is_default)
                .ok_or_else(|| ConvertError::NoDefaultMethod(converter_id.to_string())),
        }
    }

    /// Methods of a converter: the default first, then the rest in registration order.
    pub fn methods<'a>(&'a self, converter_id: &str) -> impl Iterator<Item = &'a Method> + Clone + 'a {
        let methods = self.methods.get(converter_id).map_or(&[][..], Vec::as_slice);
        methods
            .iter()
            .filter(|m| m.is_default)
            .chain(methods.iter().filter(|m| !m.is_default))
    }

    /// Method names of a converter, in the same order as [`Self::methods`].
    pub fn names<'a>(&'a self, converter_id: &str) -> impl Iterator<Item = &'a str> + Clone + 'a {
        self.methods(converter_id).map(|m| m.name.as_str())
    }

    /// Move every method of `other` into this registry.
    pub fn absorb(&mut self, other: MethodRegistry) {
        for (converter_id, methods) in other.methods {
            self.methods.entry(converter_id).or_default().extend(methods);
        }
    }

    /// True if the converter has a default method.
    pub fn has_default(&self, converter_id: &str) -> bool {
        self.resolve(converter_id, None).is_ok()
    }
}
