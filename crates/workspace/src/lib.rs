//! Workspace discovery and the executable catalog.
//!
//! A workspace is a directory tree holding a `workspace.yaml` and any number of
//! `.flow` definition files. This crate:
//! - decides which paths take part in discovery ([`paths`])
//! - walks the tree and collects definition files ([`find_definition_files`])
//! - parses each file into a [`Definition`] and binds workspace context onto it
//! - answers namespace/tag filters and type+name lookups over a [`DefinitionList`]
//!
//! Discovery is synchronous and all-or-nothing; nothing is cached between calls.

mod config;
mod definition;
mod discovery;
mod error;
mod executable;
pub mod paths;

pub use config::{
    CONFIG_FILE_NAME, ExecutableFilter, WorkspaceConfig, WorkspaceList, create_workspace_directory,
};
pub use definition::{Definition, DefinitionList, load_definition, load_definitions};
pub use discovery::{DEFINITION_EXT, find_definition_files};
pub use error::{Error, Result};
pub use executable::{AgentType, Executable, ExecutableList, Ref, Verb, Visibility};
