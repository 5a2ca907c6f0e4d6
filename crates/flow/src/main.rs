//! Binary entrypoint for flow.
use std::{
    env,
    io::{self, Write},
    path::PathBuf,
    process,
    sync::{Arc, atomic::AtomicBool},
};

use clap::{Parser, Subcommand};
use library::{Context, Filter, Library, RunFn, resolve_context_value};
use logging::LogArgs;
use tracing::debug;
use workspace::Verb;

/// Workspace and executable catalog.
mod cache;
/// Utilities for running external commands.
mod cmd;
mod error;
mod exec;
/// Real host collaborators for the library.
mod host;
mod terminal;
mod workspaces;

use error::{Error, Result};

use crate::{cache::Cache, host::SystemHost};

/// Log file name inside the flow config directory.
const LOG_FILE_NAME: &str = "flow.log";

#[derive(Parser, Debug)]
#[command(name = "flow", about = "Discover, browse and run workspace executables", version)]
/// Command-line interface for the `flow` binary.
struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,

    /// Logging controls
    #[command(flatten)]
    log: LogArgs,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Browse workspaces, namespaces and executables interactively.
    #[command(visible_alias = "lib")]
    Library {
        /// Only show this workspace ("." for the current one)
        #[arg(short, long)]
        workspace: Option<String>,

        /// Only show this namespace ("." for the current one)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Only show executables with this verb
        #[arg(short, long)]
        verb: Option<String>,

        /// Only show executables carrying any of these tags
        #[arg(short, long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Manage registered workspaces.
    #[command(subcommand, visible_alias = "ws")]
    Workspace(WorkspaceCommand),

    /// Run an executable by reference, e.g. `flow exec run tools/ci:build`.
    Exec {
        /// Canonical reference: `verb workspace/namespace:name`
        #[arg(required = true, num_args = 1..)]
        reference: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
/// `flow workspace` subcommands.
enum WorkspaceCommand {
    /// Create a workspace directory and register it.
    Create {
        /// Name to register the workspace under
        name: String,

        /// Workspace directory (defaults to <config dir>/<name>)
        #[arg(short, long, value_name = "PATH")]
        path: Option<String>,

        /// Make the new workspace the current one
        #[arg(short, long)]
        set: bool,
    },

    /// Unregister a workspace; its files are left in place.
    #[command(visible_alias = "rm")]
    Remove {
        /// Registered workspace name
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // The library owns the terminal, so its logs go to a file.
    let log_file = config::default_config_dir().join(LOG_FILE_NAME);
    let log_target = matches!(cli.command, Command::Library { .. }).then_some(log_file.as_path());
    if let Err(e) = logging::init(&cli.log.spec(), log_target) {
        eprintln!("unable to open log file {}: {e}", log_file.display());
    }

    if let Err(e) = dispatch(cli.command) {
        eprintln!("{}", e.pretty());
        process::exit(1);
    }
}

/// Run one subcommand.
fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Library {
            workspace,
            namespace,
            verb,
            tags,
        } => run_library(
            workspace.as_deref().unwrap_or_default(),
            namespace.as_deref().unwrap_or_default(),
            verb.as_deref().unwrap_or_default(),
            tags,
        ),
        Command::Workspace(WorkspaceCommand::Create { name, path, set }) => {
            let location = match path {
                Some(raw) => {
                    let home = PathBuf::from(env::var_os("HOME").unwrap_or_default());
                    workspaces::resolve_path(&raw, &env::current_dir()?, &home)
                }
                None => config::default_config_dir().join(&name),
            };
            workspaces::create(&config::default_config_path(), &name, &location, set)?;
            println!("Workspace {name} created in {}", location.display());
            if set {
                println!("Workspace {name} set as current workspace");
            }
            Ok(())
        }
        Command::Workspace(WorkspaceCommand::Remove { name, yes }) => {
            let prompt = format!("Are you sure you want to remove the workspace '{name}'?");
            if !yes && !workspaces::confirm(&prompt, &mut io::stdin().lock(), &mut io::stdout())? {
                eprintln!("Aborting");
                return Ok(());
            }
            workspaces::remove(&config::default_config_path(), &name)?;
            println!("Workspace '{name}' removed");
            Ok(())
        }
        Command::Exec { reference } => {
            let cfg = config::load()?;
            let cache = Cache::build(&cfg);
            exec::run(&cache.executables, &reference.join(" "))
        }
    }
}

/// Start the interactive library over every registered workspace.
fn run_library(workspace: &str, namespace: &str, verb: &str, tags: Vec<String>) -> Result<()> {
    let config_path = config::default_config_path();
    let cfg = config::load_from_path(&config_path)?;
    let filter = Filter {
        workspace: resolve_context_value(workspace, &cfg.current_workspace),
        namespace: resolve_context_value(namespace, &cfg.current_namespace),
        verb: Verb::new(verb),
        tags,
    };
    debug!(filter = %filter.summary(), "starting library");

    let cache = Cache::build(&cfg);
    let (container, handle) = library::container();
    let redraw = Arc::new(AtomicBool::new(false));
    let host = Arc::new(SystemHost::new(config_path, Arc::clone(&redraw)));

    let executables = cache.executables.clone();
    let run: RunFn = Arc::new(move |reference: &str| {
        exec::run(&executables, reference).map_err(|e| {
            eprintln!("{}", e.pretty());
            io::stderr().flush().ok();
            e.to_string()
        })
    });

    let theme = config::theme(cfg.theme.as_deref());
    let ctx = Context::new(cfg, host, run, handle);
    let lib = Library::new(ctx, cache.workspaces, cache.executables, filter, theme);
    terminal::run(lib, &container, &redraw)
}
