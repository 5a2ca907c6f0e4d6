//! Utilities for running external commands.

use std::{
    ffi::OsStr,
    io::Write,
    path::Path,
    process::{Command, Stdio},
};

use crate::{Error, Result};

/// Run a command inheriting stdio and return an error on non-zero exit.
pub fn run_status_streaming<I, S>(cwd: &Path, program: &str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .status()
        .map_err(|source| Error::CommandStart {
            program: program.to_string(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            program: program.to_string(),
            status,
        })
    }
}

/// Run a command with stdio discarded and wait for it to exit.
///
/// Meant for launchers such as `open` and `xdg-open`, which hand off to the
/// real application and return promptly.
pub fn run_status_quiet<I, S>(program: &str, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|source| Error::CommandStart {
            program: program.to_string(),
            source,
        })?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            program: program.to_string(),
            status,
        })
    }
}

/// Run a command feeding `input` on stdin, with output suppressed.
pub fn run_with_stdin(program: &str, args: &[&str], input: &str) -> Result<()> {
    let start_err = |source| Error::CommandStart {
        program: program.to_string(),
        source,
    };
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(start_err)?;
    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes()).map_err(start_err)?;
    }
    let status = child.wait().map_err(start_err)?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            program: program.to_string(),
            status,
        })
    }
}
