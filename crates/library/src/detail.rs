//! Text rendering of the selected executable for the detail pane.

use std::fmt::{self, Write as _};

use workspace::Executable;

/// Number of detail formats `f` cycles through.
pub const FORMAT_COUNT: usize = 3;

/// How the detail pane renders an executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailFormat {
    /// Readable summary.
    Document,
    /// YAML serialization.
    Yaml,
    /// Pretty-printed JSON serialization.
    Json,
}

impl DetailFormat {
    /// Format for a cycle index; wraps modulo [`FORMAT_COUNT`].
    pub fn from_index(idx: usize) -> Self {
        match idx % FORMAT_COUNT {
            0 => Self::Document,
            1 => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Short label shown in the pane title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for DetailFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Render `exec` in `format`.
///
/// Serialization failures are rendered inline; the pane always has something to show.
pub fn render(exec: &Executable, format: DetailFormat) -> String {
    match format {
        DetailFormat::Document => document(exec),
        DetailFormat::Yaml => serde_yaml::to_string(exec)
            .unwrap_or_else(|e| format!("unable to render yaml: {e}")),
        DetailFormat::Json => serde_json::to_string_pretty(exec)
            .unwrap_or_else(|e| format!("unable to render json: {e}")),
    }
}

/// Human-readable summary of `exec`.
fn document(exec: &Executable) -> String {
    let mut out = String::new();
    let _ignored = writeln!(out, "{} {}", exec.verb, exec.name);
    let _ignored = writeln!(out);
    let _ignored = writeln!(out, "reference:  {}", exec.reference());
    let _ignored = writeln!(out, "type:       {}", exec.agent);
    let _ignored = writeln!(out, "visibility: {:?}", exec.visibility);
    let _ignored = writeln!(out, "workspace:  {}", exec.workspace());
    if !exec.namespace().is_empty() {
        let _ignored = writeln!(out, "namespace:  {}", exec.namespace());
    }
    if !exec.aliases.is_empty() {
        let _ignored = writeln!(out, "aliases:    {}", exec.aliases.join(", "));
    }
    if !exec.tags.is_empty() {
        let _ignored = writeln!(out, "tags:       {}", exec.tags.join(", "));
    }
    let _ignored = writeln!(out, "defined in: {}", exec.definition_path().display());
    if !exec.description.trim().is_empty() {
        let _ignored = writeln!(out);
        for line in exec.description.trim_end().lines() {
            let _ignored = writeln!(out, "{}", line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use workspace::AgentType;

    use super::*;

    fn exec() -> Executable {
        let mut e = Executable::new("run", "build", AgentType::Exec);
        e.tags = vec!["ci".into()];
        e.description = "Build everything.\nSlowly.".into();
        e.set_context("tools", Path::new("/ws"), "ci", Path::new("/ws/b.flow"));
        e
    }

    #[test]
    fn format_cycle_wraps() {
        assert_eq!(DetailFormat::from_index(0), DetailFormat::Document);
        assert_eq!(DetailFormat::from_index(2), DetailFormat::Json);
        assert_eq!(DetailFormat::from_index(3), DetailFormat::Document);
    }

    #[test]
    fn document_shows_reference_and_description() {
        let text = render(&exec(), DetailFormat::Document);
        assert!(text.starts_with("run build\n"));
        assert!(text.contains("reference:  run tools/ci:build"));
        assert!(text.contains("tags:       ci"));
        assert!(text.ends_with("Slowly.\n"));
    }

    #[test]
    fn structured_formats_serialize() {
        let yaml = render(&exec(), DetailFormat::Yaml);
        assert!(yaml.contains("name: build"));
        let json = render(&exec(), DetailFormat::Json);
        assert!(json.contains("\"name\": \"build\""));
    }
}
