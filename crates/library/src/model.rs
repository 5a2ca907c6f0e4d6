//! The library browser state machine.

use std::{collections::BTreeSet, fmt::Display};

use config::Theme;
use tracing::{debug, error, info};
use workspace::{Executable, ExecutableList, Visibility, WorkspaceConfig, WorkspaceList};

use crate::{
    Context, Event, Filter, Key, Viewport,
    detail::{self, DetailFormat},
    executable_pane, workspace_pane,
};

/// Workspace-list entry standing for every workspace.
pub const ALL_WORKSPACES_LABEL: &str = "*";
/// Namespace-list entry standing for every namespace.
pub const ALL_NAMESPACES_LABEL: &str = "*";
/// Namespace-list entry standing for the default (empty) namespace.
pub const WITHOUT_NAMESPACE_LABEL: &str = "(no namespace)";

/// Number of panes: workspaces, executable list, executable detail.
pub const PANE_COUNT: usize = 3;
/// Number of help pages `h` steps through.
pub const HELP_PAGES: usize = 2;
/// Rows reserved below the panes for the footer.
pub const FOOTER_HEIGHT: u16 = 1;
/// Narrowest workspace pane, borders included.
const MIN_WORKSPACE_PANE_WIDTH: u16 = 20;

/// Severity of a transient notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation of a completed action.
    Info,
    /// An action failed or could not be attempted.
    Error,
}

/// Message shown in the footer until the next key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Message text.
    pub text: String,
    /// Severity.
    pub level: NoticeLevel,
}

/// State of one interactive browser session.
///
/// Selection indices point into the visible lists, which are rebuilt from
/// the catalogs, the filter and the view flags after every event.
pub struct Library {
    /// Collaborators and the user configuration mirror.
    pub(crate) ctx: Context,
    /// Every known workspace.
    pub(crate) workspaces: WorkspaceList,
    /// Every known executable, in catalog order.
    pub(crate) executables: ExecutableList,
    /// Query narrowing the visible lists.
    pub(crate) filter: Filter,
    /// Display colors.
    pub(crate) theme: Theme,

    /// Active pane, 0..PANE_COUNT.
    pub(crate) current_pane: usize,
    /// Index into `visible_workspaces`.
    pub(crate) current_workspace: usize,
    /// Index into `visible_namespaces`.
    pub(crate) current_namespace: usize,
    /// Index into `visible_executables`.
    pub(crate) current_executable: usize,
    /// Detail format cycle index.
    pub(crate) current_format: usize,

    /// Workspace entries shown in pane 0.
    pub(crate) visible_workspaces: Vec<String>,
    /// Namespace entries shown in pane 0's namespace view.
    pub(crate) visible_namespaces: Vec<String>,
    /// Executables shown in pane 1.
    pub(crate) visible_executables: ExecutableList,

    /// Pane 0 lists namespaces instead of workspaces.
    pub(crate) show_namespaces: bool,
    /// Panes 1 and 2 are shown side by side.
    pub(crate) split_view: bool,
    /// Help overlay visible.
    pub(crate) show_help: bool,
    /// Visible help page.
    pub(crate) help_page: usize,
    /// Transient footer message.
    pub(crate) notice: Option<Notice>,

    /// Terminal width.
    pub(crate) width: u16,
    /// Terminal height.
    pub(crate) height: u16,
    /// Outer pane widths.
    pub(crate) pane_widths: [u16; PANE_COUNT],
    /// Per-pane scroll state.
    pub(crate) panes: [Viewport; PANE_COUNT],
}

impl Library {
    /// Start a session over the given catalogs.
    pub fn new(
        ctx: Context,
        workspaces: WorkspaceList,
        executables: ExecutableList,
        filter: Filter,
        theme: Theme,
    ) -> Self {
        let mut lib = Self {
            ctx,
            workspaces,
            executables,
            filter,
            theme,
            current_pane: 0,
            current_workspace: 0,
            current_namespace: 0,
            current_executable: 0,
            current_format: 0,
            visible_workspaces: Vec::new(),
            visible_namespaces: Vec::new(),
            visible_executables: ExecutableList::default(),
            show_namespaces: false,
            split_view: false,
            show_help: false,
            help_page: 0,
            notice: None,
            width: 0,
            height: 0,
            pane_widths: [0; PANE_COUNT],
            panes: [Viewport::default(); PANE_COUNT],
        };
        lib.recompute();
        let span = lib.ctx.span.clone();
        span.in_scope(|| {
            debug!(
                workspaces = lib.workspaces.len(),
                executables = lib.executables.len(),
                filter = %lib.filter.summary(),
                theme = lib.theme.name,
                "library session started"
            );
        });
        lib
    }

    /// Process one event.
    pub fn update(&mut self, event: &Event) {
        let span = self.ctx.span.clone();
        let _entered = span.enter();

        match event {
            Event::Resize { width, height } => {
                self.width = *width;
                self.height = *height;
                self.set_size();
            }
            Event::Key(key) => {
                self.notice = None;
                self.handle_global_key(*key);
            }
            Event::Other(_) => {}
        }

        workspace_pane::update(self, event);
        executable_pane::update(self, event);

        self.recompute();
    }

    /// Pane navigation, split view and help keys.
    fn handle_global_key(&mut self, key: Key) {
        match key {
            Key::Left => {
                if self.current_pane == 0 {
                    return;
                }
                self.current_pane -= 1;
                if self.current_pane == 0 {
                    self.current_executable = 0;
                    self.panes[1].goto_top();
                }
                debug!(pane = self.current_pane, "pane left");
            }
            Key::Right | Key::Enter => {
                if self.current_pane == PANE_COUNT - 1 {
                    return;
                }
                self.current_pane += 1;
                debug!(pane = self.current_pane, "pane right");
            }
            Key::Tab => {
                self.split_view = !self.split_view;
                self.set_size();
            }
            Key::Char('h') => {
                if self.show_help && self.help_page == 0 {
                    self.help_page = 1;
                } else {
                    self.show_help = !self.show_help;
                    self.help_page = 0;
                }
            }
            _ => {}
        }
    }

    /// Recompute pane geometry from the terminal size and split flag.
    fn set_size(&mut self) {
        let inner_height = self.height.saturating_sub(FOOTER_HEIGHT).saturating_sub(2);
        let ws_width = (self.width / 4)
            .max(MIN_WORKSPACE_PANE_WIDTH)
            .min(self.width);
        let rest = self.width - ws_width;
        let (one, two) = if self.split_view {
            let one = rest / 2;
            (one, rest - one)
        } else {
            (rest, rest)
        };
        self.pane_widths = [ws_width, one, two];
        for (pane, width) in self.panes.iter_mut().zip(self.pane_widths) {
            pane.set_size(width.saturating_sub(2), inner_height);
        }
    }

    /// Rebuild the visible lists and clamp every selection into range.
    pub(crate) fn recompute(&mut self) {
        self.visible_workspaces = self.compute_visible_workspaces();
        self.current_workspace = clamp(self.current_workspace, self.visible_workspaces.len());

        self.visible_namespaces = self.compute_visible_namespaces();
        self.current_namespace = clamp(self.current_namespace, self.visible_namespaces.len());

        self.visible_executables = self.compute_visible_executables();
        self.current_executable = clamp(self.current_executable, self.visible_executables.len());

        let left_rows = if self.show_namespaces {
            self.visible_namespaces.len()
        } else {
            self.visible_workspaces.len()
        };
        self.panes[0].set_content_height(left_rows);
        self.panes[1].set_content_height(self.visible_executables.len());
        let detail_rows = self.detail_text().map_or(0, |t| t.lines().count());
        self.panes[2].set_content_height(detail_rows);
    }

    /// The filter workspace alone, or the sentinel followed by every workspace.
    fn compute_visible_workspaces(&self) -> Vec<String> {
        if !self.filter.workspace.is_empty() {
            return match self.workspaces.find_by_name(&self.filter.workspace) {
                Some(_) => vec![self.filter.workspace.clone()],
                None => Vec::new(),
            };
        }
        let mut names: Vec<String> = self
            .workspaces
            .names()
            .into_iter()
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        if names.len() > 1 {
            names.insert(0, ALL_WORKSPACES_LABEL.to_string());
        }
        names
    }

    /// Non-hidden executables under the selected workspace, narrowed by verb and tags.
    fn scoped_executables(&self) -> ExecutableList {
        let base = match self.selected_workspace() {
            None => return ExecutableList::default(),
            Some(ALL_WORKSPACES_LABEL) => self.executables.clone(),
            Some(name) => {
                let assigned = self
                    .workspaces
                    .find_by_name(name)
                    .map_or(name, WorkspaceConfig::assigned_name);
                self.executables.filter_by_workspace(assigned)
            }
        };
        base.filter_by_verb(&self.filter.verb)
            .filter_by_tags(&self.filter.tags)
            .into_iter()
            .filter(|e| e.visibility != Visibility::Hidden)
            .collect()
    }

    /// Namespace labels for the executables under the selected workspace.
    fn compute_visible_namespaces(&self) -> Vec<String> {
        let scoped = self.scoped_executables();
        if !self.filter.namespace.is_empty() {
            let known = scoped.iter().any(|e| e.namespace() == self.filter.namespace);
            return if known {
                vec![self.filter.namespace.clone()]
            } else {
                Vec::new()
            };
        }

        let mut named = BTreeSet::new();
        let mut has_default = false;
        for exec in &scoped {
            if exec.namespace().is_empty() {
                has_default = true;
            } else {
                named.insert(exec.namespace().to_string());
            }
        }
        if named.is_empty() && !has_default {
            return Vec::new();
        }
        let mut out = vec![ALL_NAMESPACES_LABEL.to_string()];
        if has_default {
            out.push(WITHOUT_NAMESPACE_LABEL.to_string());
        }
        out.extend(named);
        out
    }

    /// Executables under the selected workspace and namespace.
    fn compute_visible_executables(&self) -> ExecutableList {
        let namespace: Option<&str> = if self.show_namespaces {
            match self.selected_namespace() {
                None | Some(ALL_NAMESPACES_LABEL) => None,
                Some(WITHOUT_NAMESPACE_LABEL) => Some(""),
                Some(ns) => Some(ns),
            }
        } else if !self.filter.namespace.is_empty() {
            Some(self.filter.namespace.as_str())
        } else {
            None
        };
        let scoped = self.scoped_executables();
        match namespace {
            None => scoped,
            Some(ns) => scoped.into_iter().filter(|e| e.namespace() == ns).collect(),
        }
    }

    /// Show `text` in the footer until the next key event.
    pub(crate) fn set_notice(&mut self, text: &str, level: NoticeLevel) {
        self.notice = Some(Notice {
            text: text.to_string(),
            level,
        });
    }

    /// Log `err` and surface `text` as an error notice.
    pub(crate) fn fail(&mut self, text: &str, err: &dyn Display) {
        error!(error = %err, "{}", text);
        self.set_notice(text, NoticeLevel::Error);
    }

    /// Surface a successful action.
    pub(crate) fn succeed(&mut self, text: &str) {
        info!("{}", text);
        self.set_notice(text, NoticeLevel::Info);
    }

    /// Index of the active pane (0 workspaces, 1 executable list, 2 detail).
    pub fn current_pane(&self) -> usize {
        self.current_pane
    }

    /// Selection index into [`Library::visible_workspaces`].
    pub fn current_workspace(&self) -> usize {
        self.current_workspace
    }

    /// Selection index into [`Library::visible_namespaces`].
    pub fn current_namespace(&self) -> usize {
        self.current_namespace
    }

    /// Selection index into [`Library::visible_executables`].
    pub fn current_executable(&self) -> usize {
        self.current_executable
    }

    /// Detail format cycle index, always below [`detail::FORMAT_COUNT`].
    pub fn current_format(&self) -> usize {
        self.current_format
    }

    /// The detail format selected by [`Library::current_format`].
    pub fn detail_format(&self) -> DetailFormat {
        DetailFormat::from_index(self.current_format)
    }

    /// Workspace names shown in pane 0, sentinel first when present.
    pub fn visible_workspaces(&self) -> &[String] {
        &self.visible_workspaces
    }

    /// Namespace labels shown in pane 0's namespace view.
    pub fn visible_namespaces(&self) -> &[String] {
        &self.visible_namespaces
    }

    /// Executables shown in pane 1.
    pub fn visible_executables(&self) -> &ExecutableList {
        &self.visible_executables
    }

    /// The selected workspace entry (possibly the sentinel).
    pub fn selected_workspace(&self) -> Option<&str> {
        self.visible_workspaces
            .get(self.current_workspace)
            .map(String::as_str)
    }

    /// Configuration of the selected workspace; `None` for the sentinel.
    pub fn selected_workspace_config(&self) -> Option<&WorkspaceConfig> {
        match self.selected_workspace() {
            None | Some(ALL_WORKSPACES_LABEL) => None,
            Some(name) => self.workspaces.find_by_name(name),
        }
    }

    /// The selected namespace label.
    pub fn selected_namespace(&self) -> Option<&str> {
        self.visible_namespaces
            .get(self.current_namespace)
            .map(String::as_str)
    }

    /// The selected executable.
    pub fn selected_executable(&self) -> Option<&Executable> {
        self.visible_executables.get(self.current_executable)
    }

    /// Rendered detail of the selected executable in the current format.
    pub fn detail_text(&self) -> Option<String> {
        self.selected_executable()
            .map(|e| detail::render(e, self.detail_format()))
    }

    /// The current transient notice.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// True when pane 0 lists namespaces instead of workspaces.
    pub fn show_namespaces(&self) -> bool {
        self.show_namespaces
    }

    /// True when the executable list and detail panes are shown side by side.
    pub fn split_view(&self) -> bool {
        self.split_view
    }

    /// True when the help overlay is visible.
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Visible help page.
    pub fn help_page(&self) -> usize {
        self.help_page
    }

    /// Scroll state of `pane`.
    ///
    /// # Panics
    /// Panics when `pane >= PANE_COUNT`.
    pub fn viewport(&self, pane: usize) -> &Viewport {
        &self.panes[pane]
    }

    /// Outer widths of the three panes.
    pub fn pane_widths(&self) -> [u16; PANE_COUNT] {
        self.pane_widths
    }

    /// Last known terminal size.
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// The active filter.
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// The display theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// The session context, including the user configuration mirror.
    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

/// Clamp `idx` so it is 0 or strictly below `len`.
fn clamp(idx: usize, len: usize) -> usize {
    idx.min(len.saturating_sub(1))
}
