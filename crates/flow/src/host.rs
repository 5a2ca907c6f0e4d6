//! Real side effects for the interactive library.

use std::{
    env,
    path::{Path, PathBuf},
    process::Command,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use config::UserConfig;
use library::{Error as LibraryError, Host, Result as LibraryResult};
use tracing::debug;

use crate::{cmd, terminal};

/// Editor used when `$EDITOR` is unset.
const DEFAULT_EDITOR: &str = "vi";

/// System opener, editor and clipboard, plus the on-disk user config.
pub struct SystemHost {
    /// User configuration file.
    config_path: PathBuf,
    /// Raised after the editor borrowed the terminal.
    redraw: Arc<AtomicBool>,
}

impl SystemHost {
    /// A host persisting the user config at `config_path`.
    pub fn new(config_path: PathBuf, redraw: Arc<AtomicBool>) -> Self {
        Self {
            config_path,
            redraw,
        }
    }
}

/// Program that opens files and directories with their default application.
fn opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// The user's editor command line.
fn editor() -> String {
    env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Arguments for clipboard programs that read stdin as-is.
const NO_ARGS: &[&str] = &[];

/// Arguments selecting the X11 clipboard rather than the primary selection.
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];

/// Clipboard writers to try, in order.
fn clipboard_programs() -> Vec<(&'static str, &'static [&'static str])> {
    if cfg!(target_os = "macos") {
        return vec![("pbcopy", NO_ARGS)];
    }
    let mut programs = Vec::new();
    if env::var_os("WAYLAND_DISPLAY").is_some() {
        programs.push(("wl-copy", NO_ARGS));
    }
    programs.push(("xclip", XCLIP_ARGS));
    programs
}

impl Host for SystemHost {
    fn open(&self, path: &Path) -> LibraryResult<()> {
        debug!(path = %path.display(), "opening");
        cmd::run_status_quiet(opener(), [path]).map_err(|e| LibraryError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn open_in_editor(&self, path: &Path) -> LibraryResult<()> {
        let editor = editor();
        debug!(path = %path.display(), editor = %editor, "editing");
        let editor_err = |message: String| LibraryError::Editor {
            path: path.to_path_buf(),
            message,
        };

        terminal::leave().map_err(|e| editor_err(e.to_string()))?;
        // Run through the shell so `$EDITOR` may carry its own arguments.
        let status = Command::new("sh")
            .arg("-c")
            .arg(format!("{editor} \"$1\""))
            .arg("sh")
            .arg(path)
            .status();
        let restored = terminal::enter();
        self.redraw.store(true, Ordering::SeqCst);

        let status = status.map_err(|e| editor_err(e.to_string()))?;
        restored.map_err(|e| editor_err(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(editor_err(format!("{editor} exited with {status}")))
        }
    }

    fn clipboard_write(&self, text: &str) -> LibraryResult<()> {
        let mut last = String::from("no clipboard program available");
        for (program, args) in clipboard_programs() {
            match cmd::run_with_stdin(program, args, text) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!(program, error = %e, "clipboard write failed");
                    last = e.to_string();
                }
            }
        }
        Err(LibraryError::Clipboard(last))
    }

    fn load_user_config(&self) -> LibraryResult<UserConfig> {
        Ok(config::load_from_path(&self.config_path)?)
    }

    fn write_user_config(&self, cfg: &UserConfig) -> LibraryResult<()> {
        Ok(config::write_to_path(cfg, &self.config_path)?)
    }
}
