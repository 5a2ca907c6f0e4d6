//! Executable entries declared inside definition files.

use std::{
    fmt,
    path::{Path, PathBuf},
    slice,
    str::FromStr,
    vec,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Kind of agent that knows how to run an executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    /// Run a shell command.
    Exec,
    /// Launch an application.
    Launch,
    /// Open a URI or file.
    Open,
    /// Issue an HTTP request.
    Request,
    /// Render a document.
    Render,
    /// Run other executables one after another.
    Serial,
    /// Run other executables concurrently.
    Parallel,
}

impl AgentType {
    /// Lowercase name used on disk.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exec => "exec",
            Self::Launch => "launch",
            Self::Open => "open",
            Self::Request => "request",
            Self::Render => "render",
            Self::Serial => "serial",
            Self::Parallel => "parallel",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared audience of an executable.
///
/// Listings only act on [`Visibility::Hidden`]; the other levels are kept as
/// metadata and shown in detail views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Meant for any workspace.
    #[default]
    Public,
    /// Meant for use within its own workspace. Still listed elsewhere.
    Private,
    /// Meant for use within its own namespace. Still listed elsewhere.
    Internal,
    /// Never listed; still runnable by reference.
    Hidden,
}

/// Action word an executable is invoked with (`run`, `build`, `open`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Verb(String);

impl Verb {
    /// Build a verb, normalizing to lowercase.
    pub fn new(verb: &str) -> Self {
        Self(verb.trim().to_ascii_lowercase())
    }

    /// The verb text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the empty verb (used as "any verb" by filters).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Workspace-level context bound onto an executable after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ExecutableContext {
    /// Owning workspace name.
    workspace: String,
    /// Owning workspace root.
    workspace_path: PathBuf,
    /// Namespace of the declaring definition.
    namespace: String,
    /// Definition file the executable was read from.
    definition_path: PathBuf,
}

/// One runnable task entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Executable {
    /// Action word.
    pub verb: Verb,
    /// Name, unique per agent type within a definition.
    pub name: String,
    /// Alternate names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Tags used by list filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Listing visibility.
    #[serde(default)]
    pub visibility: Visibility,
    /// Agent that runs this executable.
    #[serde(rename = "type")]
    pub agent: AgentType,
    /// Agent-specific settings, kept opaque.
    #[serde(default, skip_serializing_if = "serde_yaml::Value::is_null")]
    pub spec: serde_yaml::Value,

    #[serde(skip)]
    context: ExecutableContext,
}

impl Executable {
    /// Create a bare executable (no context bound).
    pub fn new(verb: &str, name: &str, agent: AgentType) -> Self {
        Self {
            verb: Verb::new(verb),
            name: name.to_string(),
            aliases: Vec::new(),
            description: String::new(),
            tags: Vec::new(),
            visibility: Visibility::default(),
            agent,
            spec: serde_yaml::Value::Null,
            context: ExecutableContext::default(),
        }
    }

    /// Bind the owning workspace, namespace and source file.
    pub fn set_context(
        &mut self,
        workspace: &str,
        workspace_path: &Path,
        namespace: &str,
        definition_path: &Path,
    ) {
        self.context = ExecutableContext {
            workspace: workspace.to_string(),
            workspace_path: workspace_path.to_path_buf(),
            namespace: namespace.to_string(),
            definition_path: definition_path.to_path_buf(),
        };
    }

    /// Owning workspace name.
    pub fn workspace(&self) -> &str {
        &self.context.workspace
    }

    /// Owning workspace root.
    pub fn workspace_path(&self) -> &Path {
        &self.context.workspace_path
    }

    /// Namespace of the declaring definition (empty for the default namespace).
    pub fn namespace(&self) -> &str {
        &self.context.namespace
    }

    /// The `.flow` file this executable was declared in.
    pub fn definition_path(&self) -> &Path {
        &self.context.definition_path
    }

    /// True when `name` is the name or one of the aliases.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// True when the executable carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Canonical reference for this executable.
    pub fn reference(&self) -> Ref {
        Ref {
            verb: self.verb.clone(),
            workspace: self.context.workspace.clone(),
            namespace: self.context.namespace.clone(),
            name: self.name.clone(),
        }
    }
}

/// Canonical executable reference: `verb workspace/namespace:name`.
///
/// The namespace part is omitted for the default namespace, unless the name
/// itself contains `:`; then the empty namespace is written out (`ws/:a:b`)
/// so the reference parses back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ref {
    /// Action word.
    pub verb: Verb,
    /// Workspace name.
    pub workspace: String,
    /// Namespace, empty for the default namespace.
    pub namespace: String,
    /// Executable name.
    pub name: String,
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() && !self.name.contains(':') {
            write!(f, "{} {}/{}", self.verb, self.workspace, self.name)
        } else {
            write!(
                f,
                "{} {}/{}:{}",
                self.verb, self.workspace, self.namespace, self.name
            )
        }
    }
}

impl FromStr for Ref {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidReference(s.to_string());
        let (verb, id) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let (workspace, rest) = id.trim().split_once('/').ok_or_else(invalid)?;
        let (namespace, name) = match rest.split_once(':') {
            Some((ns, name)) => (ns, name),
            None => ("", rest),
        };
        if verb.is_empty() || workspace.is_empty() || name.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            verb: Verb::new(verb),
            workspace: workspace.to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }
}

/// Ordered list of executables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutableList(Vec<Executable>);

impl ExecutableList {
    /// Wrap an ordered vector of executables.
    pub fn new(items: Vec<Executable>) -> Self {
        Self(items)
    }

    /// Number of executables.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in list order.
    pub fn iter(&self) -> slice::Iter<'_, Executable> {
        self.0.iter()
    }

    /// Mutable iteration in list order.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Executable> {
        self.0.iter_mut()
    }

    /// Element at `idx`.
    pub fn get(&self, idx: usize) -> Option<&Executable> {
        self.0.get(idx)
    }

    /// Find the single executable of `agent` type called `name` (or aliased so).
    pub fn find_by_type_and_name(&self, agent: AgentType, name: &str) -> Result<&Executable> {
        let mut matches = self
            .0
            .iter()
            .filter(|e| e.agent == agent && e.matches_name(name));
        let Some(first) = matches.next() else {
            return Err(Error::ExecutableNotFound {
                agent,
                name: name.to_string(),
            });
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(Error::AmbiguousExecutable {
                agent,
                name: name.to_string(),
                count: extra + 1,
            });
        }
        Ok(first)
    }

    /// Find the executable addressed by a canonical reference.
    pub fn find_by_ref(&self, reference: &Ref) -> Option<&Executable> {
        self.0.iter().find(|e| {
            e.verb == reference.verb
                && e.workspace() == reference.workspace
                && e.namespace() == reference.namespace
                && e.matches_name(&reference.name)
        })
    }

    /// Executables owned by `workspace`; identity for an empty name.
    pub fn filter_by_workspace(&self, workspace: &str) -> Self {
        if workspace.is_empty() {
            return self.clone();
        }
        self.retain_cloned(|e| e.workspace() == workspace)
    }

    /// Executables in `namespace`; identity for an empty name.
    pub fn filter_by_namespace(&self, namespace: &str) -> Self {
        if namespace.is_empty() {
            return self.clone();
        }
        self.retain_cloned(|e| e.namespace() == namespace)
    }

    /// Executables with `verb`; identity for the empty verb.
    pub fn filter_by_verb(&self, verb: &Verb) -> Self {
        if verb.is_empty() {
            return self.clone();
        }
        self.retain_cloned(|e| &e.verb == verb)
    }

    /// Executables carrying any of `tags`; identity for an empty tag list.
    pub fn filter_by_tags(&self, tags: &[String]) -> Self {
        if tags.is_empty() {
            return self.clone();
        }
        self.retain_cloned(|e| tags.iter().any(|t| e.has_tag(t)))
    }

    /// Cloned sub-list of the entries matching `keep`.
    fn retain_cloned(&self, keep: impl Fn(&Executable) -> bool) -> Self {
        Self(self.0.iter().filter(|e| keep(e)).cloned().collect())
    }
}

impl FromIterator<Executable> for ExecutableList {
    fn from_iter<I: IntoIterator<Item = Executable>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ExecutableList {
    type Item = Executable;
    type IntoIter = vec::IntoIter<Executable>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExecutableList {
    type Item = &'a Executable;
    type IntoIter = slice::Iter<'a, Executable>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
