//! Workspace and executable catalog built from the user configuration.

use config::UserConfig;
use tracing::{debug, warn};
use workspace::{ExecutableList, WorkspaceConfig, WorkspaceList, load_definitions};

/// Everything discovery found across the registered workspaces.
#[derive(Debug, Clone, Default)]
pub struct Cache {
    /// Registered workspaces, in name order.
    pub workspaces: WorkspaceList,
    /// Executables of every workspace, in workspace then discovery order.
    pub executables: ExecutableList,
}

impl Cache {
    /// Load every registered workspace and discover its executables.
    ///
    /// A workspace whose configuration cannot be loaded is left out; one
    /// whose definitions fail to load is listed without executables.
    pub fn build(cfg: &UserConfig) -> Self {
        let mut workspaces = Vec::with_capacity(cfg.workspaces.len());
        let mut executables = Vec::new();
        for (name, path) in &cfg.workspaces {
            let ws = match WorkspaceConfig::load(name, path) {
                Ok(ws) => ws,
                Err(e) => {
                    warn!(workspace = %name, error = %e, "skipping workspace");
                    continue;
                }
            };
            match load_definitions(name, path) {
                Ok(definitions) => executables.extend(definitions.executables()),
                Err(e) => warn!(workspace = %name, error = %e, "unable to load definitions"),
            }
            workspaces.push(ws);
        }
        debug!(
            workspaces = workspaces.len(),
            executables = executables.len(),
            "built cache"
        );
        Self {
            workspaces: WorkspaceList::new(workspaces),
            executables: ExecutableList::new(executables),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn collects_every_registered_workspace() {
        let dir = TempDir::new().unwrap();
        let alpha = dir.path().join("alpha");
        let beta = dir.path().join("beta");
        fs::create_dir_all(alpha.join("ci")).unwrap();
        fs::create_dir_all(&beta).unwrap();
        fs::write(
            alpha.join("ci/build.flow"),
            "namespace: ci\nexecutables:\n  - verb: run\n    name: build\n    type: exec\n    spec:\n      cmd: make\n",
        )
        .unwrap();
        fs::write(beta.join("workspace.yaml"), "displayName: Beta\n").unwrap();
        fs::write(beta.join("broken.flow"), "executables: [oops").unwrap();

        let mut cfg = UserConfig::default();
        cfg.set_workspace("alpha", &alpha);
        cfg.set_workspace("beta", &beta);
        cfg.set_workspace("ghost", dir.path().join("ghost"));
        fs::create_dir_all(dir.path().join("ghost/workspace.yaml")).unwrap();

        let cache = Cache::build(&cfg);
        assert_eq!(cache.workspaces.names(), vec!["alpha", "beta"]);
        assert_eq!(
            cache.workspaces.find_by_name("Beta").unwrap().assigned_name(),
            "beta"
        );
        let refs: Vec<String> = cache
            .executables
            .iter()
            .map(|e| e.reference().to_string())
            .collect();
        assert_eq!(refs, vec!["run alpha/ci:build"]);
    }

    #[test]
    fn empty_config_builds_empty_cache() {
        let cache = Cache::build(&UserConfig::default());
        assert!(cache.workspaces.is_empty());
        assert!(cache.executables.is_empty());
    }
}
