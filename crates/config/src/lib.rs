//! User configuration for flow.
//!
//! The user configuration lives in `config.yaml` inside the flow config
//! directory and records the registered workspaces, the current workspace and
//! namespace, and the display theme. This crate loads, validates and persists
//! it, and owns the registry of display themes.

use std::{
    collections::BTreeMap,
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

mod error;
pub mod themes;

pub use error::{Error, excerpt_at};
pub use themes::{Theme, theme};

/// Environment variable overriding the flow config directory.
pub const CONFIG_DIR_ENV: &str = "FLOW_CONFIG_DIR";

/// File name of the user configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Parse color into raw rgb tuple.
pub(crate) fn parse_rgb(s: &str) -> Option<(u8, u8, u8)> {
    colornames::Color::try_from(s).ok().map(|c| c.rgb())
}

/// Persistent user configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Registered workspaces, by name.
    #[serde(default)]
    pub workspaces: BTreeMap<String, PathBuf>,
    /// Name of the current workspace; empty when none is set.
    #[serde(default)]
    pub current_workspace: String,
    /// Current namespace; empty selects all namespaces.
    #[serde(default)]
    pub current_namespace: String,
    /// Display theme name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl UserConfig {
    /// Check semantic constraints that parsing cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.current_workspace.is_empty()
            && !self.workspaces.contains_key(&self.current_workspace)
        {
            return Err(Error::Validation {
                path: None,
                message: format!(
                    "current workspace '{}' is not registered",
                    self.current_workspace
                ),
            });
        }
        if let Some(name) = &self.theme
            && !themes::theme_exists(name)
        {
            return Err(Error::Validation {
                path: None,
                message: format!(
                    "unknown theme '{}', expected one of: {}",
                    name,
                    themes::names().join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Register (or re-point) a workspace.
    pub fn set_workspace(&mut self, name: &str, path: impl Into<PathBuf>) {
        self.workspaces.insert(name.to_string(), path.into());
    }

    /// Unregister a workspace, returning its path when it was known.
    pub fn remove_workspace(&mut self, name: &str) -> Option<PathBuf> {
        self.workspaces.remove(name)
    }

    /// Make `name` the current workspace.
    pub fn set_current_workspace(&mut self, name: &str) -> Result<(), Error> {
        if !self.workspaces.contains_key(name) {
            return Err(Error::Validation {
                path: None,
                message: format!("workspace '{}' is not registered", name),
            });
        }
        self.current_workspace = name.to_string();
        Ok(())
    }

    /// Path of the current workspace, when one is set and registered.
    pub fn current_workspace_path(&self) -> Option<&Path> {
        self.workspaces
            .get(&self.current_workspace)
            .map(PathBuf::as_path)
    }
}

/// The flow config directory: `$FLOW_CONFIG_DIR`, else `~/.flow`.
pub fn default_config_dir() -> PathBuf {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    let mut p = PathBuf::from(env::var_os("HOME").unwrap_or_default());
    p.push(".flow");
    p
}

/// The user configuration path inside [`default_config_dir`].
pub fn default_config_path() -> PathBuf {
    default_config_dir().join(CONFIG_FILE_NAME)
}

/// Load and validate the user configuration at `path`.
///
/// A missing or empty file yields the default configuration.
pub fn load_from_path(path: &Path) -> Result<UserConfig, Error> {
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no user config, using defaults");
            return Ok(UserConfig::default());
        }
        Err(e) => {
            return Err(Error::Read {
                path: Some(path.to_path_buf()),
                message: e.to_string(),
            });
        }
    };
    if source.trim().is_empty() {
        return Ok(UserConfig::default());
    }
    let cfg: UserConfig = serde_yaml::from_str(&source)
        .map_err(|e| Error::from_yaml(&source, Some(path), &e))?;
    cfg.validate().map_err(|e| match e {
        Error::Validation { message, .. } => Error::Validation {
            path: Some(path.to_path_buf()),
            message,
        },
        other => other,
    })?;
    trace!(path = %path.display(), workspaces = cfg.workspaces.len(), "loaded user config");
    Ok(cfg)
}

/// Load the user configuration from [`default_config_path`].
pub fn load() -> Result<UserConfig, Error> {
    load_from_path(&default_config_path())
}

/// Persist `cfg` to `path`, creating the parent directory when needed.
pub fn write_to_path(cfg: &UserConfig, path: &Path) -> Result<(), Error> {
    let write_err = |message: String| Error::Write {
        path: path.to_path_buf(),
        message,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }
    let text = serde_yaml::to_string(cfg).map_err(|e| write_err(e.to_string()))?;
    fs::write(path, text).map_err(|e| write_err(e.to_string()))?;
    debug!(path = %path.display(), "wrote user config");
    Ok(())
}

/// Persist `cfg` to [`default_config_path`].
pub fn write(cfg: &UserConfig) -> Result<(), Error> {
    write_to_path(cfg, &default_config_path())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn sample() -> UserConfig {
        let mut cfg = UserConfig::default();
        cfg.set_workspace("tools", "/src/tools");
        cfg.set_workspace("home", "/home/me");
        cfg.set_current_workspace("tools").unwrap();
        cfg.current_namespace = "ci".into();
        cfg
    }

    #[test]
    fn missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let cfg = load_from_path(&dir.path().join("config.yaml")).unwrap();
        assert_eq!(cfg, UserConfig::default());
    }

    #[test]
    fn write_then_load_preserves_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let cfg = sample();
        write_to_path(&cfg, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("currentWorkspace: tools"));
        assert!(text.contains("currentNamespace: ci"));
        assert_eq!(load_from_path(&path).unwrap(), cfg);
    }

    #[test]
    fn parse_error_reports_location() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "workspaces:\n  a: /a\ncurrentWorkspace: [\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        match &err {
            Error::Parse { line, excerpt, .. } => {
                assert!(*line >= 2);
                assert!(excerpt.contains('^'));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.pretty().starts_with("Config parse error at"));
    }

    #[test]
    fn unregistered_current_workspace_is_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "currentWorkspace: ghost\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, Error::Validation { path: Some(_), .. }));
    }

    #[test]
    fn unknown_theme_is_invalid() {
        let mut cfg = sample();
        cfg.theme = Some("neon".into());
        assert!(cfg.validate().is_err());
        cfg.theme = Some("charcoal".into());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn workspace_helpers() {
        let mut cfg = sample();
        assert!(cfg.set_current_workspace("ghost").is_err());
        assert_eq!(cfg.current_workspace, "tools");
        assert_eq!(cfg.current_workspace_path(), Some(Path::new("/src/tools")));
        assert_eq!(cfg.remove_workspace("home"), Some(PathBuf::from("/home/me")));
        assert_eq!(cfg.remove_workspace("home"), None);
    }
}
