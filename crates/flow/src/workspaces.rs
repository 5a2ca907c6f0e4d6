//! `flow workspace create` and `flow workspace remove`.

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use tracing::{info, warn};
use workspace::create_workspace_directory;

use crate::{Error, Result};

/// Turn a `--path` argument into an absolute location.
///
/// `.` and `./x` resolve against `cwd`, `~` and `~/x` against `home`; any
/// other relative path is also taken relative to `cwd`.
pub fn resolve_path(raw: &str, cwd: &Path, home: &Path) -> PathBuf {
    match raw {
        "." => cwd.to_path_buf(),
        "~" => home.to_path_buf(),
        _ => {
            if let Some(rest) = raw.strip_prefix("./") {
                cwd.join(rest)
            } else if let Some(rest) = raw.strip_prefix("~/") {
                home.join(rest)
            } else {
                cwd.join(raw)
            }
        }
    }
}

/// Register a new workspace at `location`, creating its directory and
/// default `workspace.yaml` when missing.
pub fn create(config_path: &Path, name: &str, location: &Path, set_current: bool) -> Result<()> {
    let mut cfg = config::load_from_path(config_path)?;
    if let Some(existing) = cfg.workspaces.get(name) {
        return Err(Error::WorkspaceExists {
            name: name.to_string(),
            path: existing.clone(),
        });
    }

    create_workspace_directory(location)?;
    cfg.set_workspace(name, location);
    if set_current {
        cfg.set_current_workspace(name)?;
    }
    config::write_to_path(&cfg, config_path)?;
    info!(workspace = name, path = %location.display(), current = set_current, "workspace created");
    Ok(())
}

/// Unregister `name`. Files in the workspace directory are left alone.
pub fn remove(config_path: &Path, name: &str) -> Result<()> {
    let mut cfg = config::load_from_path(config_path)?;
    if cfg.current_workspace == name {
        return Err(Error::RemoveCurrent(name.to_string()));
    }
    if cfg.remove_workspace(name).is_none() {
        return Err(Error::WorkspaceNotFound(name.to_string()));
    }
    config::write_to_path(&cfg, config_path)?;
    warn!(workspace = name, "workspace removed");
    Ok(())
}

/// Ask a yes/no question; anything but `y` or `yes` declines.
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
