//! External collaborators the browser calls into.

use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use config::UserConfig;
use parking_lot::Mutex;

use crate::{Error, Result};

/// Side effects the browser delegates to its host environment.
pub trait Host: Send + Sync {
    /// Open a location with the system opener.
    fn open(&self, path: &Path) -> Result<()>;
    /// Edit a file in the user's editor, blocking until it exits.
    fn open_in_editor(&self, path: &Path) -> Result<()>;
    /// Replace the system clipboard contents.
    fn clipboard_write(&self, text: &str) -> Result<()>;
    /// Read the persisted user configuration.
    fn load_user_config(&self) -> Result<UserConfig>;
    /// Persist the user configuration.
    fn write_user_config(&self, cfg: &UserConfig) -> Result<()>;
}

/// In-memory host recording every call, with switchable failures.
#[derive(Clone, Default)]
pub struct MockHost {
    /// Call log.
    calls: Arc<Mutex<Vec<String>>>,
    /// Persisted configuration.
    stored: Arc<Mutex<UserConfig>>,
    /// Every configuration written.
    writes: Arc<Mutex<Vec<UserConfig>>>,
    /// Fail `open`.
    fail_open: Arc<AtomicBool>,
    /// Fail `open_in_editor`.
    fail_editor: Arc<AtomicBool>,
    /// Fail `clipboard_write`.
    fail_clipboard: Arc<AtomicBool>,
    /// Fail `load_user_config`.
    fail_load: Arc<AtomicBool>,
    /// Fail `write_user_config`.
    fail_write: Arc<AtomicBool>,
}

impl MockHost {
    /// A mock whose persisted configuration starts as `cfg`.
    pub fn with_config(cfg: UserConfig) -> Self {
        let host = Self::default();
        *host.stored.lock() = cfg;
        host
    }

    /// Calls made so far, formatted as `name:arg`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// True when a call formatted as `s` was made.
    pub fn calls_contains(&self, s: &str) -> bool {
        self.calls.lock().iter().any(|x| x == s)
    }

    /// Configurations passed to `write_user_config`, oldest first.
    pub fn writes(&self) -> Vec<UserConfig> {
        self.writes.lock().clone()
    }

    /// The currently persisted configuration.
    pub fn stored(&self) -> UserConfig {
        self.stored.lock().clone()
    }

    /// Make `open` fail.
    pub fn set_fail_open(&self, v: bool) {
        self.fail_open.store(v, Ordering::SeqCst);
    }

    /// Make `open_in_editor` fail.
    pub fn set_fail_editor(&self, v: bool) {
        self.fail_editor.store(v, Ordering::SeqCst);
    }

    /// Make `clipboard_write` fail.
    pub fn set_fail_clipboard(&self, v: bool) {
        self.fail_clipboard.store(v, Ordering::SeqCst);
    }

    /// Make `load_user_config` fail.
    pub fn set_fail_load(&self, v: bool) {
        self.fail_load.store(v, Ordering::SeqCst);
    }

    /// Make `write_user_config` fail.
    pub fn set_fail_write(&self, v: bool) {
        self.fail_write.store(v, Ordering::SeqCst);
    }

    /// Record a call.
    fn note(&self, s: String) {
        self.calls.lock().push(s);
    }
}

impl Host for MockHost {
    fn open(&self, path: &Path) -> Result<()> {
        self.note(format!("open:{}", path.display()));
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(Error::Open {
                path: path.to_path_buf(),
                message: "mock failure".into(),
            });
        }
        Ok(())
    }

    fn open_in_editor(&self, path: &Path) -> Result<()> {
        self.note(format!("edit:{}", path.display()));
        if self.fail_editor.load(Ordering::SeqCst) {
            return Err(Error::Editor {
                path: path.to_path_buf(),
                message: "mock failure".into(),
            });
        }
        Ok(())
    }

    fn clipboard_write(&self, text: &str) -> Result<()> {
        self.note(format!("clipboard:{}", text));
        if self.fail_clipboard.load(Ordering::SeqCst) {
            return Err(Error::Clipboard("mock failure".into()));
        }
        Ok(())
    }

    fn load_user_config(&self) -> Result<UserConfig> {
        self.note("load_config".to_string());
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(Error::Config(config::Error::Read {
                path: None,
                message: "mock failure".into(),
            }));
        }
        Ok(self.stored.lock().clone())
    }

    fn write_user_config(&self, cfg: &UserConfig) -> Result<()> {
        self.note("write_config".to_string());
        if self.fail_write.load(Ordering::SeqCst) {
            return Err(Error::Config(config::Error::Write {
                path: "config.yaml".into(),
                message: "mock failure".into(),
            }));
        }
        self.writes.lock().push(cfg.clone());
        *self.stored.lock() = cfg.clone();
        Ok(())
    }
}
