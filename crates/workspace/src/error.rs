use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

use crate::AgentType;

/// Convenient result type for the workspace crate.
pub type Result<T> = StdResult<T, Error>;

/// Errors produced while discovering, loading or querying workspace definitions.
#[derive(Debug, Error)]
pub enum Error {
    /// The workspace configuration file exists but could not be read.
    #[error("unable to read workspace config {}: {source}", path.display())]
    ConfigRead {
        /// Path of the workspace config file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// The workspace configuration file is not a valid document.
    #[error("unable to decode workspace config {}: {source}", path.display())]
    ConfigDecode {
        /// Path of the workspace config file.
        path: PathBuf,
        /// Underlying decode failure.
        source: serde_yaml::Error,
    },

    /// The workspace configuration file could not be written.
    #[error("unable to write workspace config {}: {message}", path.display())]
    ConfigWrite {
        /// Path of the workspace config file.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },

    /// A workspace location exists but has the wrong kind (file vs directory).
    #[error("invalid workspace location {}: {message}", path.display())]
    InvalidLocation {
        /// Offending path.
        path: PathBuf,
        /// Human-readable error message.
        message: String,
    },

    /// Walking the workspace tree failed.
    #[error("unable to walk workspace {}: {source}", root.display())]
    Traversal {
        /// Root of the failed traversal.
        root: PathBuf,
        /// Underlying walk failure.
        source: walkdir::Error,
    },

    /// A definition file could not be opened.
    #[error("unable to open definition file {}: {source}", path.display())]
    DefinitionOpen {
        /// Path of the definition file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// A definition file is not a valid document.
    #[error("unable to decode definition file {}: {source}", path.display())]
    DefinitionDecode {
        /// Path of the definition file.
        path: PathBuf,
        /// Underlying decode failure.
        source: serde_yaml::Error,
    },

    /// No executable matched the lookup.
    #[error("{agent} executable {name} not found")]
    ExecutableNotFound {
        /// Requested agent type.
        agent: AgentType,
        /// Requested name.
        name: String,
    },

    /// More than one executable in a single definition matched the lookup.
    #[error("{count} {agent} executables match {name}")]
    AmbiguousExecutable {
        /// Requested agent type.
        agent: AgentType,
        /// Requested name.
        name: String,
        /// Number of matching entries.
        count: usize,
    },

    /// A reference string could not be parsed.
    #[error("invalid executable reference '{0}'")]
    InvalidReference(String),
}

impl Error {
    /// True when this error is a lookup miss rather than a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ExecutableNotFound { .. })
    }
}
