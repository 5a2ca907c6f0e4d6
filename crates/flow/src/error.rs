use std::{io, path::PathBuf, process::ExitStatus, result::Result as StdResult};

use thiserror::Error;

/// Convenient result type for the flow binary.
pub type Result<T> = StdResult<T, Error>;

/// Errors surfaced by flow subcommands.
#[derive(Debug, Error)]
pub enum Error {
    /// User configuration could not be loaded, validated or written.
    #[error(transparent)]
    Config(#[from] config::Error),

    /// Workspace discovery or lookup failed.
    #[error(transparent)]
    Workspace(#[from] workspace::Error),

    /// The interactive library failed.
    #[error(transparent)]
    Library(#[from] library::Error),

    /// An external program could not be started.
    #[error("failed to start {program}: {source}")]
    CommandStart {
        /// Program name.
        program: String,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// An external program exited unsuccessfully.
    #[error("{program} exited with {status}")]
    CommandFailed {
        /// Program name.
        program: String,
        /// Exit status reported by the OS.
        status: ExitStatus,
    },

    /// `workspace create` was given a name that is already registered.
    #[error("workspace {name} already exists at {}", path.display())]
    WorkspaceExists {
        /// Requested workspace name.
        name: String,
        /// Location already registered under that name.
        path: PathBuf,
    },

    /// The named workspace is not registered.
    #[error("workspace {0} was not found")]
    WorkspaceNotFound(String),

    /// The current workspace cannot be removed.
    #[error("cannot remove the current workspace {0}")]
    RemoveCurrent(String),

    /// No executable matches the reference.
    #[error("executable {0} not found")]
    ExecutableNotFound(String),

    /// The executable's agent type cannot be run from the command line.
    #[error("{reference} is a {agent} executable; only exec executables can be run")]
    Unsupported {
        /// Canonical reference of the executable.
        reference: String,
        /// Its agent type.
        agent: workspace::AgentType,
    },

    /// An exec executable declares no command.
    #[error("{0} does not declare a cmd")]
    MissingCommand(String),

    /// Terminal or prompt I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Human-friendly rendering; config errors include their source excerpt.
    pub fn pretty(&self) -> String {
        match self {
            Self::Config(e) => e.pretty(),
            Self::Library(library::Error::Config(e)) => e.pretty(),
            other => other.to_string(),
        }
    }
}
