//! Walk a workspace tree and collect definition files.

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::{Error, Result, WorkspaceConfig, paths};

/// File extension marking a definition file.
pub const DEFINITION_EXT: &str = "flow";

/// Collect every definition file under `workspace_path` that the workspace's
/// include/exclude rules admit.
///
/// Entries are visited depth first in file-name order. An excluded directory
/// is pruned with its whole subtree; a path the include rules reject is
/// skipped but its children are still visited. Symlinks to files are recorded
/// by their link path; linked directories are not entered. Any walk error
/// fails the call.
pub fn find_definition_files(workspace: &str, workspace_path: &Path) -> Result<Vec<PathBuf>> {
    let cfg = WorkspaceConfig::load(workspace, workspace_path)?;
    let root = paths::clean(workspace_path);
    let include_paths = cfg.include_paths(&root);
    let exclude_paths = cfg.exclude_paths(&root);
    debug!(
        workspace,
        root = %root.display(),
        included = include_paths.len(),
        excluded = exclude_paths.len(),
        "scanning workspace"
    );

    let mut found = Vec::new();
    let mut walker = WalkDir::new(&root).sort_by_file_name().into_iter();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|source| Error::Traversal {
            root: root.clone(),
            source,
        })?;
        let path = entry.path();

        if paths::excluded(path, &exclude_paths) {
            trace!(path = %path.display(), "excluded");
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            continue;
        }
        if !paths::included(path, &include_paths) {
            continue;
        }
        // Links are not followed by the walk; a linked file still counts.
        let is_file =
            entry.file_type().is_file() || (entry.path_is_symlink() && path.is_file());
        if is_file && path.extension() == Some(OsStr::new(DEFINITION_EXT)) {
            trace!(path = %path.display(), "found definition file");
            found.push(path.to_path_buf());
        }
    }
    Ok(found)
}
