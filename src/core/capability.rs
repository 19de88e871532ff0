//! Runtime detection of the libraries and executables that conversion methods need.

use std::collections::BTreeSet;
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Libraries compiled into this binary; always available to native methods.
pub const BUILTIN_LIBRARIES: &[&str] = &["noodles", "flate2"];

/// Standard directories searched for shared libraries in addition to the loader path variables.
const SYSTEM_LIBRARY_DIRS: &[&str] = &[
    "/lib",
    "/lib64",
    "/usr/lib",
    "/usr/lib64",
    "/usr/local/lib",
    "/usr/lib/x86_64-linux-gnu",
    "/usr/lib/aarch64-linux-gnu",
    "/opt/homebrew/lib",
];

/// External dependency that a conversion method needs at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum CapabilityRequirement {
    /// A library that must be linked in or loadable from the system
    Library(String),
    /// An executable that must be resolvable on `PATH`
    Executable(String),
}

impl CapabilityRequirement {
    pub fn library(name: impl Into<String>) -> Self {
        Self::Library(name.into())
    }

    pub fn executable(name: impl Into<String>) -> Self {
        Self::Executable(name.into())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Library(name) | Self::Executable(name) => name,
        }
    }

    /// Check the requirement is well-formed.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the name is empty, contains
    /// whitespace, or is a library name containing a path separator.
    pub fn validate(&self) -> Result<(), String> {
        let name = self.name();
        if name.trim().is_empty() {
            return Err("requirement name is empty".to_string());
        }
        if name.chars().any(char::is_whitespace) {
            return Err(format!("requirement name '{name}' contains whitespace"));
        }
        if matches!(self, Self::Library(_)) && name.contains(['/', '\\']) {
            return Err(format!("library name '{name}' contains a path separator"));
        }
        Ok(())
    }
}

impl fmt::Display for CapabilityRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library(name) => write!(f, "library '{name}'"),
            Self::Executable(name) => write!(f, "executable '{name}'"),
        }
    }
}

/// Answers whether a requirement can be satisfied in the current environment.
///
/// Implementations must be side-effect free and must not panic.
pub trait CapabilityProbe: Send + Sync {
    fn is_available(&self, requirement: &CapabilityRequirement) -> bool;
}

/// Probe backed by the real system: built-in libraries, loader search path and `PATH`.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    builtin: BTreeSet<String>,
    library_dirs: Vec<PathBuf>,
    search_path: Option<OsString>,
}

impl SystemProbe {
    /// Probe reading the process environment.
    #[must_use]
    pub fn new() -> Self {
        let mut library_dirs = Vec::new();
        for var in ["LD_LIBRARY_PATH", "DYLD_LIBRARY_PATH"] {
            if let Some(value) = env::var_os(var) {
                library_dirs.extend(env::split_paths(&value));
            }
        }
        library_dirs.extend(SYSTEM_LIBRARY_DIRS.iter().map(PathBuf::from));

        Self {
            builtin: BUILTIN_LIBRARIES.iter().map(|s| (*s).to_string()).collect(),
            library_dirs,
            search_path: env::var_os("PATH"),
        }
    }

    /// Replace the executable search path (mainly for tests).
    #[must_use]
    pub fn with_search_path(mut self, path: impl Into<OsString>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    /// Replace the shared-library search directories.
    #[must_use]
    pub fn with_library_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.library_dirs = dirs;
        self
    }

    fn has_library(&self, name: &str) -> bool {
        if self.builtin.contains(name) {
            return true;
        }

        let candidates = [
            format!("lib{name}.so"),
            format!("lib{name}.dylib"),
            format!("{name}.dll"),
        ];
        self.library_dirs.iter().any(|dir| {
            candidates.iter().any(|file| dir.join(file).is_file())
                || has_versioned_shared_object(dir, name)
        })
    }

    /// Resolve an executable to a full path, if present.
    #[must_use]
    pub fn find_executable(&self, name: &str) -> Option<PathBuf> {
        if name.contains(std::path::MAIN_SEPARATOR) || name.contains('/') {
            let path = PathBuf::from(name);
            return is_executable(&path).then_some(path);
        }

        let search_path = self.search_path.as_ref()?;
        env::split_paths(search_path)
            .flat_map(|dir| executable_candidates(&dir, name))
            .find(|candidate| is_executable(candidate))
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityProbe for SystemProbe {
    fn is_available(&self, requirement: &CapabilityRequirement) -> bool {
        if requirement.validate().is_err() {
            return false;
        }
        match requirement {
            CapabilityRequirement::Library(name) => self.has_library(name),
            CapabilityRequirement::Executable(name) => self.find_executable(name).is_some(),
        }
    }
}

/// Match `lib<name>.so.<version>` files, which is how most distributions ship runtime libraries.
fn has_versioned_shared_object(dir: &Path, name: &str) -> bool {
    let prefix = format!("lib{name}.so.");
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(Result::ok)
        .any(|entry| entry.file_name().to_string_lossy().starts_with(&prefix))
}

#[cfg(windows)]
fn executable_candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name), dir.join(format!("{name}.exe"))]
}

#[cfg(not(windows))]
fn executable_candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_library_is_available() {
        let probe = SystemProbe::new().with_library_dirs(Vec::new());
        assert!(probe.is_available(&CapabilityRequirement::library("noodles")));
        assert!(!probe.is_available(&CapabilityRequirement::library("no_such_library_xyz")));
    }

    #[test]
    fn test_shared_library_lookup() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("libhts.so.3"), b"").unwrap();

        let probe = SystemProbe::new().with_library_dirs(vec![dir.path().to_path_buf()]);
        assert!(probe.is_available(&CapabilityRequirement::library("hts")));
        assert!(!probe.is_available(&CapabilityRequirement::library("bz2_missing")));
    }

    #[cfg(unix)]
    #[test]
    fn test_executable_lookup_requires_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("squizz");
        std::fs::write(&tool, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();

        let probe = SystemProbe::new().with_search_path(dir.path().as_os_str().to_owned());
        assert!(!probe.is_available(&CapabilityRequirement::executable("squizz")));

        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(probe.is_available(&CapabilityRequirement::executable("squizz")));
        assert_eq!(probe.find_executable("squizz"), Some(tool));
    }

    #[test]
    fn test_missing_executable() {
        let dir = tempfile::tempdir().unwrap();
        let probe = SystemProbe::new().with_search_path(dir.path().as_os_str().to_owned());
        assert!(!probe.is_available(&CapabilityRequirement::executable("seqret")));
    }

    #[test]
    fn test_validate_rejects_malformed_names() {
        assert!(CapabilityRequirement::library("").validate().is_err());
        assert!(CapabilityRequirement::executable("two words").validate().is_err());
        assert!(CapabilityRequirement::library("../libz").validate().is_err());
        assert!(CapabilityRequirement::executable("/usr/bin/env").validate().is_ok());
    }

    #[test]
    fn test_malformed_requirement_is_never_available() {
        let probe = SystemProbe::new();
        assert!(!probe.is_available(&CapabilityRequirement::library("")));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            CapabilityRequirement::executable("seqtk").to_string(),
            "executable 'seqtk'"
        );
        assert_eq!(
            CapabilityRequirement::library("noodles").to_string(),
            "library 'noodles'"
        );
    }
}
