//! Running external conversion tools.

use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use anyhow::{bail, Context, Result};
use tracing::debug;

/// Runs `program` with `args`, sending its stdout to `output`.
pub(crate) fn run_to_file<I, S>(program: &str, args: I, output: &Path) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let stdout = File::create(output)
        .with_context(|| format!("creating output file {}", output.display()))?;

    let mut command = Command::new(program);
    command.args(args).stdout(Stdio::from(stdout));
    run(program, command)
}

/// Runs `program` with `args`; the tool writes its own output file.
pub(crate) fn run_tool<I, S>(program: &str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command.args(args).stdout(Stdio::null());
    run(program, command)
}

fn run(program: &str, mut command: Command) -> Result<()> {
    debug!("Running {:?}", command);

    let Output { status, stderr, .. } = command
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning `{program}`"))?
        .wait_with_output()
        .with_context(|| format!("running `{program}`"))?;

    if !status.success() {
        let stderr = String::from_utf8_lossy(&stderr);
        bail!(
            "the `{program}` command returned {status}: {}",
            stderr.trim()
        );
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_stdout_goes_to_file() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");
        run_to_file("sh", ["-c", "printf 'hello\\n'"], &output).unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "hello\n");
    }

    #[test]
    fn test_non_zero_exit_is_an_error() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.txt");
        let err = run_to_file("sh", ["-c", "echo broken >&2; exit 3"], &output).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("broken"), "{message}");
    }

    #[test]
    fn test_missing_program() {
        assert!(run_tool("definitely-not-a-real-tool-xyz", ["--version"]).is_err());
    }
}
