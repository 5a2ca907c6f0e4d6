//! Definition documents and the per-workspace definition catalog.

use std::{
    fs,
    path::{Path, PathBuf},
    slice,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use crate::{AgentType, Error, Executable, ExecutableList, Result, discovery};

/// Parsed contents of one `.flow` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Namespace shared by every executable in the file; empty is the default namespace.
    #[serde(default)]
    pub namespace: String,
    /// Tags used by list filters.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Declared executables, in file order.
    #[serde(default)]
    pub executables: ExecutableList,

    /// Owning workspace name.
    #[serde(skip)]
    workspace: String,
    /// Owning workspace root.
    #[serde(skip)]
    workspace_path: PathBuf,
    /// File the definition was loaded from.
    #[serde(skip)]
    path: PathBuf,
}

impl Definition {
    /// Bind workspace context and cascade it, with the namespace, to every executable.
    pub fn set_context(&mut self, workspace: &str, workspace_path: &Path, path: &Path) {
        self.workspace = workspace.to_string();
        self.workspace_path = workspace_path.to_path_buf();
        self.path = path.to_path_buf();
        for exec in self.executables.iter_mut() {
            exec.set_context(workspace, workspace_path, &self.namespace, path);
        }
    }

    /// Owning workspace name.
    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    /// Owning workspace root.
    pub fn workspace_path(&self) -> &Path {
        &self.workspace_path
    }

    /// File the definition was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the definition carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// True when `tags` is empty or the definition carries any of them.
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.is_empty() || tags.iter().any(|t| self.has_tag(t))
    }
}

/// Open and decode a single definition file.
pub fn load_definition(path: &Path) -> Result<Definition> {
    let text = fs::read_to_string(path).map_err(|source| Error::DefinitionOpen {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| Error::DefinitionDecode {
        path: path.to_path_buf(),
        source,
    })
}

/// Discover and load every definition in a workspace.
///
/// All-or-nothing: the first file that cannot be read or decoded fails the call.
pub fn load_definitions(workspace: &str, workspace_path: &Path) -> Result<DefinitionList> {
    let files = discovery::find_definition_files(workspace, workspace_path)?;
    let mut definitions = Vec::with_capacity(files.len());
    for file in files {
        let mut definition = load_definition(&file)?;
        definition.set_context(workspace, workspace_path, &file);
        definitions.push(definition);
    }
    trace!(workspace, count = definitions.len(), "loaded definitions");
    Ok(DefinitionList(definitions))
}

/// Definitions of one workspace (or several), in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionList(Vec<Definition>);

impl DefinitionList {
    /// Wrap an ordered list of definitions.
    pub fn new(items: Vec<Definition>) -> Self {
        Self(items)
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in catalog order.
    pub fn iter(&self) -> slice::Iter<'_, Definition> {
        self.0.iter()
    }

    /// Definitions declaring `namespace`; identity for an empty namespace.
    pub fn filter_by_namespace(&self, namespace: &str) -> Self {
        if namespace.is_empty() {
            return self.clone();
        }
        let definitions: Vec<Definition> = self
            .0
            .iter()
            .filter(|d| d.namespace == namespace)
            .cloned()
            .collect();
        trace!(definitions = definitions.len(), "filtered definitions by namespace");
        Self(definitions)
    }

    /// Definitions carrying `tag`; identity for an empty tag.
    ///
    /// A definition listing the tag more than once still appears once.
    pub fn filter_by_tag(&self, tag: &str) -> Self {
        if tag.is_empty() {
            return self.clone();
        }
        let definitions: Vec<Definition> =
            self.0.iter().filter(|d| d.has_tag(tag)).cloned().collect();
        trace!(definitions = definitions.len(), "filtered definitions by tag");
        Self(definitions)
    }

    /// Find an executable by agent type and name across all definitions.
    ///
    /// The first definition containing a match wins and its namespace is
    /// returned alongside the executable. A definition whose own lookup fails
    /// for any reason other than a miss is logged and skipped.
    pub fn lookup_executable_by_type_and_name(
        &self,
        agent: AgentType,
        name: &str,
    ) -> Result<(&str, &Executable)> {
        debug!(%agent, name, "looking up executable");
        for definition in &self.0 {
            match definition.executables.find_by_type_and_name(agent, name) {
                Ok(exec) => return Ok((definition.namespace.as_str(), exec)),
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    error!(error = %e, path = %definition.path.display(), "failed to look up executable");
                }
            }
        }
        Err(Error::ExecutableNotFound {
            agent,
            name: name.to_string(),
        })
    }

    /// All executables, flattened in catalog order.
    pub fn executables(&self) -> ExecutableList {
        self.0
            .iter()
            .flat_map(|d| d.executables.iter().cloned())
            .collect()
    }
}

impl FromIterator<Definition> for DefinitionList {
    fn from_iter<I: IntoIterator<Item = Definition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DefinitionList {
    type Item = &'a Definition;
    type IntoIter = slice::Iter<'a, Definition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(ns: &str, tags: &[&str], execs: &[(&str, AgentType)]) -> Definition {
        let mut d = Definition {
            namespace: ns.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            executables: execs
                .iter()
                .map(|(name, agent)| Executable::new("run", name, *agent))
                .collect(),
            ..Definition::default()
        };
        d.set_context("ws", Path::new("/ws"), Path::new("/ws/x.flow"));
        d
    }

    #[test]
    fn set_context_cascades_to_executables() {
        let d = definition("ci", &[], &[("build", AgentType::Exec)]);
        let exec = d.executables.get(0).unwrap();
        assert_eq!(exec.workspace(), "ws");
        assert_eq!(exec.namespace(), "ci");
        assert_eq!(exec.workspace_path(), Path::new("/ws"));
        assert_eq!(exec.definition_path(), Path::new("/ws/x.flow"));
    }

    #[test]
    fn empty_filters_are_identity() {
        let list = DefinitionList::new(vec![
            definition("a", &["x"], &[]),
            definition("b", &[], &[]),
            definition("", &["y"], &[]),
        ]);
        assert_eq!(list.filter_by_namespace(""), list);
        assert_eq!(list.filter_by_tag(""), list);
    }

    #[test]
    fn namespace_filter_preserves_order() {
        let list = DefinitionList::new(vec![
            definition("a", &["1"], &[]),
            definition("b", &[], &[]),
            definition("a", &["2"], &[]),
        ]);
        let filtered = list.filter_by_namespace("a");
        let tags: Vec<&str> = filtered.iter().map(|d| d.tags[0].as_str()).collect();
        assert_eq!(tags, vec!["1", "2"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn tag_filter_never_duplicates() {
        let list = DefinitionList::new(vec![
            definition("a", &["dup", "dup", "dup"], &[]),
            definition("b", &["other"], &[]),
        ]);
        let filtered = list.filter_by_tag("dup");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.iter().next().unwrap().namespace, "a");
    }

    #[test]
    fn lookup_returns_namespace_of_first_match() {
        let list = DefinitionList::new(vec![definition("ci", &[], &[("n", AgentType::Exec)])]);
        let (ns, exec) = list.lookup_executable_by_type_and_name(AgentType::Exec, "n").unwrap();
        assert_eq!(ns, "ci");
        assert_eq!(exec.name, "n");

        let err = list
            .lookup_executable_by_type_and_name(AgentType::Exec, "m")
            .unwrap_err();
        match err {
            Error::ExecutableNotFound { agent, name } => {
                assert_eq!(agent, AgentType::Exec);
                assert_eq!(name, "m");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lookup_skips_ambiguous_definitions() {
        let list = DefinitionList::new(vec![
            definition("bad", &[], &[("n", AgentType::Exec), ("n", AgentType::Exec)]),
            definition("good", &[], &[("n", AgentType::Exec)]),
        ]);
        let (ns, _) = list.lookup_executable_by_type_and_name(AgentType::Exec, "n").unwrap();
        assert_eq!(ns, "good");
    }

    #[test]
    fn lookup_order_is_catalog_order() {
        let list = DefinitionList::new(vec![
            definition("first", &[], &[("n", AgentType::Exec)]),
            definition("second", &[], &[("n", AgentType::Exec)]),
        ]);
        let (ns, _) = list.lookup_executable_by_type_and_name(AgentType::Exec, "n").unwrap();
        assert_eq!(ns, "first");
    }
}
