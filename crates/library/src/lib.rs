//! Interactive three-pane browser over workspaces, namespaces and executables.
//!
//! [`Library`] is a single-threaded state machine: the caller feeds it one
//! [`Event`] at a time through [`Library::update`] and draws it with
//! [`view::render`]. Side effects go through the injected [`Host`]; running
//! an executable hands the terminal back through the [`Container`] and
//! continues on a detached thread.

mod container;
mod context;
pub mod detail;
mod error;
mod event;
mod executable_pane;
mod filter;
mod host;
pub mod model;
pub mod view;
mod viewport;
mod workspace_pane;

pub use container::{Container, ContainerHandle, container};
pub use context::{Context, RunFn};
pub use detail::DetailFormat;
pub use error::{Error, Result};
pub use event::{Event, Key, Passthrough};
pub use filter::{CURRENT_CONTEXT, Filter, resolve_context_value};
pub use host::{Host, MockHost};
pub use model::{Library, Notice, NoticeLevel};
pub use viewport::Viewport;
