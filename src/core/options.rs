use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::core::error::ConvertError;

/// Method-specific options supplied with a conversion request, keyed by argument name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConversionOptions(BTreeMap<String, String>);

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Insert a path-valued option.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidOption` if the path is not valid UTF-8;
    /// options are stored as text and a lossy copy would name another file.
    pub fn insert_path(&mut self, name: impl Into<String>, path: &Path) -> Result<(), ConvertError> {
        let name = name.into();
        let Some(value) = path.to_str() else {
            return Err(ConvertError::InvalidOption {
                name,
                reason: format!("path is not valid UTF-8: {}", path.display()),
            });
        };
        self.insert(name, value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn path(&self, name: &str) -> Option<PathBuf> {
        self.get(name).map(PathBuf::from)
    }

    /// Parse an integer option.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is present but not a non-negative integer.
    pub fn usize(&self, name: &str) -> anyhow::Result<Option<usize>> {
        self.get(name)
            .map(|value| {
                value
                    .parse::<usize>()
                    .with_context(|| format!("option '{name}' is not a non-negative integer: {value}"))
            })
            .transpose()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let options = ConversionOptions::new()
            .with("line_width", "60")
            .with("quality_file", "/tmp/q.fa");

        assert_eq!(options.usize("line_width").unwrap(), Some(60));
        assert_eq!(options.usize("missing").unwrap(), None);
        assert_eq!(options.path("quality_file"), Some(PathBuf::from("/tmp/q.fa")));
        assert!(options.contains("quality_file"));
    }

    #[test]
    fn test_insert_path() {
        let mut options = ConversionOptions::new();
        options.insert_path("quality_file", Path::new("/data/q.fa")).unwrap();
        assert_eq!(options.get("quality_file"), Some("/data/q.fa"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"/data/q\xff.fa"));
        let mut options = ConversionOptions::new();
        let err = options.insert_path("quality_file", path).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidOption { ref name, .. } if name == "quality_file"));
        assert!(!options.contains("quality_file"));
    }

    #[test]
    fn test_bad_integer() {
        let options = ConversionOptions::new().with("line_width", "-3");
        assert!(options.usize("line_width").is_err());
    }
}
