//! Query narrowing what the browser lists.

use workspace::Verb;

/// Context value meaning "use the caller's current context".
pub const CURRENT_CONTEXT: &str = ".";

/// Read-only query narrowing what the browser shows.
///
/// Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Workspace name.
    pub workspace: String,
    /// Namespace name.
    pub namespace: String,
    /// Verb.
    pub verb: Verb,
    /// Executables carrying any of these tags.
    pub tags: Vec<String>,
}

impl Filter {
    /// True when no field narrows the result.
    pub fn is_empty(&self) -> bool {
        self.workspace.is_empty()
            && self.namespace.is_empty()
            && self.verb.is_empty()
            && self.tags.is_empty()
    }

    /// Short human-readable summary, `*` when empty.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.workspace.is_empty() {
            parts.push(format!("ws={}", self.workspace));
        }
        if !self.namespace.is_empty() {
            parts.push(format!("ns={}", self.namespace));
        }
        if !self.verb.is_empty() {
            parts.push(format!("verb={}", self.verb));
        }
        if !self.tags.is_empty() {
            parts.push(format!("tags={}", self.tags.join("|")));
        }
        if parts.is_empty() {
            "*".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Substitute `current` for the [`CURRENT_CONTEXT`] marker.
pub fn resolve_context_value(value: &str, current: &str) -> String {
    if value == CURRENT_CONTEXT {
        current.to_string()
    } else {
        value.to_string()
    }
}
