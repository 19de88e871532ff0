//! Helpers for output files: atomic replacement and checksums.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use tempfile::Builder;

/// Run `write` against a temporary file next to `output`, then rename it into place.
///
/// The temporary file keeps the output's extension, so extension-based
/// lookups on it resolve the same way. If `write` fails the temporary file is
/// removed and `output` is left untouched.
///
/// # Errors
///
/// Returns the error from `write`, or an error if the temporary file cannot
/// be created or renamed.
pub fn write_atomically<T, E, F>(output: &Path, write: F) -> anyhow::Result<T>
where
    F: FnOnce(&Path) -> Result<T, E>,
    E: Into<anyhow::Error>,
{
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let suffix = output
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let temp = Builder::new()
        .prefix(".bioconvert-")
        .suffix(&suffix)
        .tempfile_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?
        .into_temp_path();

    let temp_path: &Path = &temp;
    let value = write(temp_path).map_err(Into::into)?;

    temp.persist(output)
        .with_context(|| format!("moving output into place at {}", output.display()))?;
    Ok(value)
}

/// Lowercase hex MD5 of a file's contents.
///
/// # Errors
///
/// Returns any read error.
pub fn md5_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut context = md5::Context::new();
    let mut buffer = vec![0u8; 64 * 1024];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        context.consume(&buffer[..n]);
    }

    Ok(format!("{:x}", context.compute()))
}
