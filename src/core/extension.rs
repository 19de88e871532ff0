use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::core::error::ConvertError;

/// Compression suffixes stripped before resolving an input extension.
pub const COMPRESSION_SUFFIXES: &[&str] = &[".gz", ".bgz"];

/// Normalized file suffix: lowercase, with exactly one leading dot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Extension(String);

impl Extension {
    /// Normalize a raw suffix such as `fq`, `.FQ` or `..fq`.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidExtension` if nothing remains after
    /// stripping dots and whitespace, or if the suffix contains a path separator.
    pub fn new(raw: &str) -> Result<Self, ConvertError> {
        let trimmed = raw.trim().trim_start_matches('.');
        if trimmed.is_empty() || trimmed.contains(['/', '\\']) {
            return Err(ConvertError::InvalidExtension(raw.to_string()));
        }
        Ok(Self(format!(".{}", trimmed.to_lowercase())))
    }

    /// Extension of an output path, taken literally from the last suffix.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidExtension` if the path has no extension.
    pub fn from_path(path: &Path) -> Result<Self, ConvertError> {
        path.extension()
            .map(|ext| ext.to_string_lossy())
            .ok_or_else(|| ConvertError::InvalidExtension(path.display().to_string()))
            .and_then(|ext| Self::new(&ext))
    }

    /// Extension of an input path, looking through a trailing compression suffix.
    ///
    /// `reads.fa.gz` resolves to `.fa`.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidExtension` if the path has no extension.
    pub fn from_input_path(path: &Path) -> Result<Self, ConvertError> {
        if is_compressed(path) {
            if let Some(stem) = path.file_stem() {
                return Self::from_path(Path::new(stem));
            }
        }
        Self::from_path(path)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True if the path ends with a recognized compression suffix.
#[must_use]
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_compressed(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    COMPRESSION_SUFFIXES
        .iter()
        .any(|suffix| path_str.ends_with(suffix))
}

/// A set of normalized extensions declared by a converter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ExtensionSet(BTreeSet<Extension>);

impl ExtensionSet {
    /// Normalize every raw suffix into a set.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidExtension` for the first invalid suffix
    /// or if the list is empty.
    pub fn parse(raw: &[&str]) -> Result<Self, ConvertError> {
        if raw.is_empty() {
            return Err(ConvertError::InvalidExtension(String::new()));
        }
        raw.iter()
            .map(|ext| Extension::new(ext))
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    #[must_use]
    pub fn contains(&self, ext: &Extension) -> bool {
        self.0.contains(ext)
    }

    /// First extension present in both sets, if any.
    #[must_use]
    pub fn first_shared<'a>(&'a self, other: &'a Self) -> Option<&'a Extension> {
        self.0.intersection(&other.0).next()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Extension> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.0.iter().map(Extension::as_str).collect();
        write!(f, "{}", joined.join(","))
    }
}
