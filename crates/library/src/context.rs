use std::sync::Arc;

use config::UserConfig;
use tracing::Span;

use crate::{ContainerHandle, Host};

/// Runs an executable by canonical reference, after the UI is gone.
pub type RunFn = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// Everything a browser session needs from its caller.
///
/// Collaborators are injected here rather than reached through globals; log
/// events emitted by the session are recorded inside `span`.
#[derive(Clone)]
pub struct Context {
    /// In-memory mirror of the persisted user configuration.
    pub config: UserConfig,
    /// Side-effect collaborators.
    pub host: Arc<dyn Host>,
    /// Detached run entry point.
    pub run: RunFn,
    /// Run side of the terminal hand-off.
    pub container: ContainerHandle,
    /// Parent span for the session's log events.
    pub span: Span,
}

impl Context {
    /// Build a context with a fresh `library` span.
    pub fn new(
        config: UserConfig,
        host: Arc<dyn Host>,
        run: RunFn,
        container: ContainerHandle,
    ) -> Self {
        Self {
            config,
            host,
            run,
            container,
            span: tracing::info_span!("library"),
        }
    }

    /// Replace the session span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}
