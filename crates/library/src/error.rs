use std::path::PathBuf;

use thiserror::Error;

/// Result type used by the library browser and its collaborators.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the browser's external collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// The system opener could not open a location.
    #[error("unable to open {}: {message}", path.display())]
    Open {
        /// Location that failed to open.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },
    /// The editor could not be launched or exited unsuccessfully.
    #[error("unable to edit {}: {message}", path.display())]
    Editor {
        /// File handed to the editor.
        path: PathBuf,
        /// Underlying failure.
        message: String,
    },
    /// Writing to the system clipboard failed.
    #[error("clipboard write failed: {0}")]
    Clipboard(String),
    /// Loading or persisting the user configuration failed.
    #[error(transparent)]
    Config(#[from] config::Error),
}
