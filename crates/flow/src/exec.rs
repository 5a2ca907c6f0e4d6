//! Run an executable addressed by its canonical reference.

use tracing::info;
use workspace::{AgentType, Executable, ExecutableList, Ref};

use crate::{Error, Result, cmd};

/// Shell used to run `exec` commands.
const SHELL: &str = "sh";

/// The shell command an `exec` executable runs.
pub fn command_for(exec: &Executable) -> Result<String> {
    if exec.agent != AgentType::Exec {
        return Err(Error::Unsupported {
            reference: exec.reference().to_string(),
            agent: exec.agent,
        });
    }
    exec.spec
        .get("cmd")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::MissingCommand(exec.reference().to_string()))
}

/// Resolve `reference` in `executables` and run it in its workspace root.
pub fn run(executables: &ExecutableList, reference: &str) -> Result<()> {
    let parsed: Ref = reference.parse()?;
    let exec = executables
        .find_by_ref(&parsed)
        .ok_or_else(|| Error::ExecutableNotFound(reference.trim().to_string()))?;
    let command = command_for(exec)?;
    info!(reference = %parsed, dir = %exec.workspace_path().display(), "running executable");
    cmd::run_status_streaming(exec.workspace_path(), SHELL, ["-c", command.as_str()])
}
