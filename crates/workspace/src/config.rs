//! The `workspace.yaml` file found at the root of every workspace.

use std::{
    fs, io,
    path::{Path, PathBuf},
    slice,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result, paths};

/// File name of the workspace configuration at the workspace root.
pub const CONFIG_FILE_NAME: &str = "workspace.yaml";

/// Include/exclude rules for definition discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableFilter {
    /// Directories to search; empty means the whole workspace.
    #[serde(default)]
    pub included: Vec<PathBuf>,
    /// Directories to prune.
    #[serde(default)]
    pub excluded: Vec<PathBuf>,
}

/// Parsed workspace configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Name shown in listings; falls back to the assigned name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Tags used by list filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Discovery rules; absent means include everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executables: Option<ExecutableFilter>,

    /// Name the workspace is registered under in the user config.
    #[serde(skip)]
    assigned_name: String,
    /// Workspace root directory.
    #[serde(skip)]
    location: PathBuf,
}

impl WorkspaceConfig {
    /// Load `workspace.yaml` from `workspace_path`, binding `name` and location.
    ///
    /// A missing file yields the default configuration.
    pub fn load(name: &str, workspace_path: &Path) -> Result<Self> {
        let path = workspace_path.join(CONFIG_FILE_NAME);
        let mut cfg = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Self::default(),
            Ok(text) => serde_yaml::from_str(&text).map_err(|source| Error::ConfigDecode {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no workspace config; using defaults");
                Self::default()
            }
            Err(source) => return Err(Error::ConfigRead { path, source }),
        };
        cfg.set_context(name, workspace_path);
        Ok(cfg)
    }

    /// Write this configuration to `workspace.yaml` under `workspace_path`.
    pub fn write(&self, workspace_path: &Path) -> Result<()> {
        let path = workspace_path.join(CONFIG_FILE_NAME);
        let text = serde_yaml::to_string(self).map_err(|e| Error::ConfigWrite {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, text).map_err(|e| Error::ConfigWrite {
            path,
            message: e.to_string(),
        })
    }

    /// Bind the registered name and root directory.
    pub fn set_context(&mut self, name: &str, location: &Path) {
        self.assigned_name = name.to_string();
        self.location = location.to_path_buf();
    }

    /// Name the workspace is registered under.
    pub fn assigned_name(&self) -> &str {
        &self.assigned_name
    }

    /// Display name, or the assigned name when none is configured.
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.assigned_name
        } else {
            &self.display_name
        }
    }

    /// Workspace root directory.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Path of this workspace's `workspace.yaml`.
    pub fn config_path(&self) -> PathBuf {
        self.location.join(CONFIG_FILE_NAME)
    }

    /// Normalized include rules. An empty rule set means `[root]`.
    pub fn include_paths(&self, root: &Path) -> Vec<PathBuf> {
        let configured = self
            .executables
            .as_ref()
            .map(|f| f.included.as_slice())
            .unwrap_or_default();
        if configured.is_empty() {
            return vec![paths::clean(root)];
        }
        anchor(root, configured)
    }

    /// Normalized exclude rules.
    pub fn exclude_paths(&self, root: &Path) -> Vec<PathBuf> {
        let configured = self
            .executables
            .as_ref()
            .map(|f| f.excluded.as_slice())
            .unwrap_or_default();
        anchor(root, configured)
    }
}

/// Join relative rule entries onto `root` and clean every entry.
fn anchor(root: &Path, entries: &[PathBuf]) -> Vec<PathBuf> {
    entries
        .iter()
        .map(|p| {
            if p.is_absolute() {
                paths::clean(p)
            } else {
                paths::clean(&root.join(p))
            }
        })
        .collect()
}

/// Create `location` and a default `workspace.yaml` inside it when missing.
pub fn create_workspace_directory(location: &Path) -> Result<()> {
    match fs::metadata(location) {
        Ok(meta) if !meta.is_dir() => {
            return Err(Error::InvalidLocation {
                path: location.to_path_buf(),
                message: "exists but is not a directory".to_string(),
            });
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(location).map_err(|e| Error::InvalidLocation {
                path: location.to_path_buf(),
                message: format!("unable to create directory: {e}"),
            })?;
        }
        Err(e) => {
            return Err(Error::InvalidLocation {
                path: location.to_path_buf(),
                message: format!("unable to inspect directory: {e}"),
            });
        }
    }

    let cfg_path = location.join(CONFIG_FILE_NAME);
    match fs::metadata(&cfg_path) {
        Ok(meta) if meta.is_dir() => Err(Error::InvalidLocation {
            path: cfg_path,
            message: "workspace config exists but is a directory".to_string(),
        }),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => WorkspaceConfig::default().write(location),
        Err(e) => Err(Error::ConfigRead {
            path: cfg_path,
            source: e,
        }),
    }
}

/// All known workspaces, in registration order.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceList(Vec<WorkspaceConfig>);

impl WorkspaceList {
    /// Wrap a list of loaded workspace configs.
    pub fn new(items: Vec<WorkspaceConfig>) -> Self {
        Self(items)
    }

    /// Find a workspace by assigned name, falling back to display name.
    pub fn find_by_name(&self, name: &str) -> Option<&WorkspaceConfig> {
        self.0
            .iter()
            .find(|w| w.assigned_name() == name)
            .or_else(|| self.0.iter().find(|w| w.display_name == name))
    }

    /// Assigned names in list order.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(WorkspaceConfig::assigned_name).collect()
    }

    /// Iterate in list order.
    pub fn iter(&self) -> slice::Iter<'_, WorkspaceConfig> {
        self.0.iter()
    }

    /// Number of workspaces.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no workspace is known.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
