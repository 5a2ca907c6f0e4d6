use std::{path::Path, sync::Arc, time::Duration};

use config::UserConfig;
use library::{
    Container, Context, Event, Filter, Key, Library, MockHost, NoticeLevel, Passthrough,
    container,
};
use parking_lot::Mutex;
use workspace::{
    AgentType, Executable, ExecutableList, Verb, Visibility, WorkspaceConfig, WorkspaceList,
};

struct Harness {
    lib: Library,
    host: MockHost,
    container: Container,
    runs: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn press(&mut self, key: Key) {
        self.lib.update(&Event::Key(key));
    }

    fn press_all(&mut self, keys: &[Key]) {
        for key in keys {
            self.press(*key);
        }
    }

    fn notice(&self) -> Option<(String, NoticeLevel)> {
        self.lib.notice().map(|n| (n.text.clone(), n.level))
    }
}

fn workspace(name: &str, display: &str) -> WorkspaceConfig {
    let mut ws = WorkspaceConfig::default();
    ws.display_name = display.to_string();
    ws.set_context(name, &Path::new("/ws").join(name));
    ws
}

fn exec(ws: &str, ns: &str, verb: &str, name: &str) -> Executable {
    let mut e = Executable::new(verb, name, AgentType::Exec);
    let root = Path::new("/ws").join(ws);
    let file = root.join(if ns.is_empty() { "root.flow" } else { "a.flow" });
    e.set_context(ws, &root, ns, &file);
    e
}

fn catalog() -> (WorkspaceList, ExecutableList) {
    let workspaces = WorkspaceList::new(vec![workspace("alpha", ""), workspace("beta", "")]);
    let mut secret = exec("alpha", "ci", "run", "secret");
    secret.visibility = Visibility::Hidden;
    let mut prod = exec("beta", "ops", "deploy", "prod");
    prod.tags = vec!["release".into()];
    let executables = ExecutableList::new(vec![
        exec("alpha", "ci", "run", "build"),
        exec("alpha", "ci", "run", "test"),
        exec("alpha", "", "open", "docs"),
        secret,
        prod,
    ]);
    (workspaces, executables)
}

fn harness_with(
    workspaces: WorkspaceList,
    executables: ExecutableList,
    filter: Filter,
    stored: UserConfig,
) -> Harness {
    let host = MockHost::with_config(stored.clone());
    let (container, handle) = container();
    let runs = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&runs);
    let ctx = Context::new(
        stored,
        Arc::new(host.clone()),
        Arc::new(move |reference: &str| {
            recorded.lock().push(reference.to_string());
            Ok::<(), String>(())
        }),
        handle,
    );
    let mut lib = Library::new(ctx, workspaces, executables, filter, config::theme(None));
    lib.update(&Event::Resize {
        width: 120,
        height: 40,
    });
    Harness {
        lib,
        host,
        container,
        runs,
    }
}

fn harness() -> Harness {
    let (workspaces, executables) = catalog();
    harness_with(workspaces, executables, Filter::default(), stored_config())
}

fn stored_config() -> UserConfig {
    let mut cfg = UserConfig::default();
    cfg.set_workspace("alpha", "/ws/alpha");
    cfg.set_workspace("beta", "/ws/beta");
    cfg.current_namespace = "old".into();
    cfg
}

fn names(list: &ExecutableList) -> Vec<&str> {
    list.iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn initial_lists_include_sentinels() {
    let h = harness();
    assert_eq!(h.lib.visible_workspaces(), ["*", "alpha", "beta"]);
    assert_eq!(
        h.lib.visible_namespaces(),
        ["*", "(no namespace)", "ci", "ops"]
    );
    assert_eq!(
        names(h.lib.visible_executables()),
        vec!["build", "test", "docs", "prod"]
    );
}

#[test]
fn down_stops_at_last_workspace() {
    let mut h = harness();
    assert_eq!(h.lib.visible_workspaces().len(), 3);
    h.press_all(&[Key::Down, Key::Down]);
    assert_eq!(h.lib.current_workspace(), 2);
    h.press(Key::Down);
    assert_eq!(h.lib.current_workspace(), 2);
    h.press_all(&[Key::Up, Key::Up, Key::Up]);
    assert_eq!(h.lib.current_workspace(), 0);
}

#[test]
fn selecting_a_workspace_scopes_the_lists() {
    let mut h = harness();
    h.press(Key::Down);
    assert_eq!(h.lib.selected_workspace(), Some("alpha"));
    assert_eq!(h.lib.visible_namespaces(), ["*", "(no namespace)", "ci"]);
    assert_eq!(
        names(h.lib.visible_executables()),
        vec!["build", "test", "docs"]
    );
}

#[test]
fn only_hidden_executables_are_left_out_of_listings() {
    let workspaces = WorkspaceList::new(vec![workspace("alpha", ""), workspace("beta", "")]);
    let mut private = exec("alpha", "ci", "run", "private");
    private.visibility = Visibility::Private;
    let mut internal = exec("alpha", "ci", "run", "internal");
    internal.visibility = Visibility::Internal;
    let mut hidden = exec("alpha", "ci", "run", "hidden");
    hidden.visibility = Visibility::Hidden;
    let executables = ExecutableList::new(vec![private, internal, hidden]);
    let h = harness_with(workspaces, executables, Filter::default(), stored_config());

    assert_eq!(h.lib.selected_workspace(), Some("*"));
    assert_eq!(
        names(h.lib.visible_executables()),
        vec!["private", "internal"]
    );
}

#[test]
fn space_resets_namespace_index() {
    let mut h = harness();
    h.press(Key::Space);
    assert!(h.lib.show_namespaces());
    h.press_all(&[Key::Down, Key::Down]);
    assert_eq!(h.lib.current_namespace(), 2);
    assert_eq!(names(h.lib.visible_executables()), vec!["build", "test"]);

    h.press(Key::Space);
    assert!(!h.lib.show_namespaces());
    assert_eq!(h.lib.current_namespace(), 0);
    h.press(Key::Space);
    assert_eq!(h.lib.current_namespace(), 0);
}

#[test]
fn no_namespace_entry_selects_default_namespace() {
    let mut h = harness();
    h.press_all(&[Key::Space, Key::Down]);
    assert_eq!(h.lib.selected_namespace(), Some("(no namespace)"));
    assert_eq!(names(h.lib.visible_executables()), vec!["docs"]);
}

#[test]
fn returning_to_workspaces_resets_executable() {
    let mut h = harness();
    h.press(Key::Right);
    assert_eq!(h.lib.current_pane(), 1);
    h.press_all(&[Key::Down, Key::Down, Key::Down]);
    assert_eq!(h.lib.current_executable(), 3);

    h.press(Key::Left);
    assert_eq!(h.lib.current_pane(), 0);
    assert_eq!(h.lib.current_executable(), 0);
    assert_eq!(h.lib.viewport(1).y_offset, 0);
}

#[test]
fn pane_index_is_bounded() {
    let mut h = harness();
    h.press(Key::Left);
    assert_eq!(h.lib.current_pane(), 0);
    h.press_all(&[Key::Enter, Key::Right, Key::Right]);
    assert_eq!(h.lib.current_pane(), 2);
    h.press(Key::Left);
    assert_eq!(h.lib.current_pane(), 1);
}

#[test]
fn only_list_pane_moves_the_executable_selection() {
    let mut h = harness();
    h.press_all(&[Key::Right, Key::Right]);
    h.press(Key::Down);
    assert_eq!(h.lib.current_executable(), 0);
    h.press(Key::Left);
    h.press(Key::Down);
    assert_eq!(h.lib.current_executable(), 1);
    h.press(Key::Up);
    h.press(Key::Up);
    assert_eq!(h.lib.current_executable(), 0);
}

#[test]
fn format_cycles_only_in_detail_pane() {
    let mut h = harness();
    h.press_all(&[Key::Right, Key::Char('f')]);
    assert_eq!(h.lib.current_format(), 0);

    h.press(Key::Right);
    h.press(Key::Char('f'));
    assert_eq!(h.lib.current_format(), 1);
    assert_eq!(h.lib.viewport(2).y_offset, 0);
    h.press_all(&[Key::Char('f'), Key::Char('f')]);
    assert_eq!(h.lib.current_format(), 0);
}

#[test]
fn set_current_on_all_namespaces_is_refused() {
    let mut h = harness();
    h.press_all(&[Key::Down, Key::Space]);
    assert_eq!(h.lib.selected_namespace(), Some("*"));

    h.press(Key::Char('s'));
    assert_eq!(
        h.notice(),
        Some(("no namespace selected".to_string(), NoticeLevel::Error))
    );
    assert!(h.host.writes().is_empty());
    assert!(!h.host.calls_contains("write_config"));
    assert_eq!(h.lib.context().config.current_namespace, "old");
}

#[test]
fn set_current_namespace_persists_then_mirrors() {
    let mut h = harness();
    h.press_all(&[Key::Down, Key::Space, Key::Down, Key::Down]);
    assert_eq!(h.lib.selected_namespace(), Some("ci"));

    h.press(Key::Char('s'));
    assert_eq!(
        h.notice(),
        Some(("context updated".to_string(), NoticeLevel::Info))
    );
    let writes = h.host.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].current_namespace, "ci");
    assert_eq!(h.lib.context().config.current_namespace, "ci");
}

#[test]
fn set_current_without_namespace_clears_it() {
    let mut h = harness();
    h.press_all(&[Key::Down, Key::Space, Key::Down]);
    h.press(Key::Char('s'));
    assert_eq!(h.host.stored().current_namespace, "");
    assert_eq!(h.lib.context().config.current_namespace, "");
}

#[test]
fn set_current_workspace_persists_assigned_name() {
    let mut h = harness();
    h.press_all(&[Key::Down, Key::Down]);
    h.press(Key::Char('s'));
    assert_eq!(h.host.stored().current_workspace, "beta");
    assert_eq!(h.lib.context().config.current_workspace, "beta");
    assert_eq!(h.host.calls(), vec!["load_config", "write_config"]);
}

#[test]
fn set_current_on_all_workspaces_is_refused() {
    let mut h = harness();
    h.press(Key::Char('s'));
    assert_eq!(
        h.notice(),
        Some(("no workspace selected".to_string(), NoticeLevel::Error))
    );
    assert!(h.host.calls().is_empty());
}

#[test]
fn display_name_selection_is_a_desync() {
    let (_, executables) = catalog();
    let workspaces = WorkspaceList::new(vec![workspace("alpha", "Alpha Tools")]);
    let filter = Filter {
        workspace: "Alpha Tools".into(),
        ..Filter::default()
    };
    let mut h = harness_with(workspaces, executables, filter, stored_config());
    assert_eq!(h.lib.visible_workspaces(), ["Alpha Tools"]);
    assert_eq!(h.lib.visible_executables().len(), 3);

    h.press(Key::Char('s'));
    assert_eq!(
        h.notice(),
        Some((
            "current workspace out of sync".to_string(),
            NoticeLevel::Error
        ))
    );
    assert!(h.host.writes().is_empty());
}

#[test]
fn write_failure_leaves_mirror_untouched() {
    let mut h = harness();
    h.host.set_fail_write(true);
    h.press(Key::Down);
    h.press(Key::Char('s'));
    assert_eq!(
        h.notice(),
        Some(("unable to write user config".to_string(), NoticeLevel::Error))
    );
    assert_eq!(h.lib.context().config.current_workspace, "");
}

#[test]
fn load_failure_is_a_notice() {
    let mut h = harness();
    h.host.set_fail_load(true);
    h.press(Key::Down);
    h.press(Key::Char('s'));
    assert_eq!(
        h.notice(),
        Some(("unable to load user config".to_string(), NoticeLevel::Error))
    );
    assert!(!h.host.calls_contains("write_config"));
}

#[test]
fn notice_lives_for_one_key_event() {
    let mut h = harness();
    h.press(Key::Char('s'));
    assert!(h.notice().is_some());
    h.lib.update(&Event::Other(Passthrough::ScrollDown));
    assert!(h.notice().is_some());
    h.press(Key::Up);
    assert!(h.notice().is_none());
}

#[test]
fn open_and_edit_workspace() {
    let mut h = harness();
    h.press(Key::Char('o'));
    assert_eq!(
        h.notice(),
        Some(("no workspace selected".to_string(), NoticeLevel::Error))
    );

    h.press(Key::Down);
    h.press(Key::Char('o'));
    h.press(Key::Char('e'));
    assert!(h.host.calls_contains("open:/ws/alpha"));
    assert!(h.host.calls_contains("edit:/ws/alpha/workspace.yaml"));
    assert!(h.notice().is_none());

    h.host.set_fail_open(true);
    h.press(Key::Char('o'));
    assert_eq!(
        h.notice(),
        Some(("unable to open workspace".to_string(), NoticeLevel::Error))
    );
}

#[test]
fn copy_and_edit_executable() {
    let mut h = harness();
    h.press(Key::Right);
    h.press(Key::Char('c'));
    assert!(h.host.calls_contains("clipboard:run alpha/ci:build"));
    assert_eq!(
        h.notice(),
        Some((
            "copied reference to clipboard".to_string(),
            NoticeLevel::Info
        ))
    );

    h.press(Key::Char('e'));
    assert!(h.host.calls_contains("edit:/ws/alpha/a.flow"));

    h.host.set_fail_clipboard(true);
    h.press(Key::Char('c'));
    assert_eq!(
        h.notice(),
        Some((
            "unable to copy reference to clipboard".to_string(),
            NoticeLevel::Error
        ))
    );
}

#[test]
fn actions_on_empty_executable_list_are_ignored() {
    let (workspaces, _) = catalog();
    let mut h = harness_with(
        workspaces,
        ExecutableList::default(),
        Filter::default(),
        stored_config(),
    );
    h.press(Key::Right);
    h.press_all(&[Key::Down, Key::Char('c'), Key::Char('r')]);
    assert_eq!(h.lib.current_executable(), 0);
    assert!(h.host.calls().is_empty());
    assert!(h.lib.selected_executable().is_none());
}

#[test]
fn run_hands_off_and_runs_reference() {
    let mut h = harness();
    h.press_all(&[Key::Right, Key::Down]);
    h.press(Key::Char('r'));

    assert!(h.container.wait_shutdown(Duration::from_secs(5)));
    h.container.released();
    assert!(h.container.wait_for_handoff_timeout(Duration::from_secs(5)));
    assert_eq!(*h.runs.lock(), vec!["run alpha/ci:test".to_string()]);
}

#[test]
fn filters_narrow_executables() {
    let (workspaces, executables) = catalog();
    let filter = Filter {
        verb: Verb::new("deploy"),
        ..Filter::default()
    };
    let h = harness_with(
        workspaces.clone(),
        executables.clone(),
        filter,
        stored_config(),
    );
    assert_eq!(names(h.lib.visible_executables()), vec!["prod"]);

    let filter = Filter {
        tags: vec!["release".into()],
        ..Filter::default()
    };
    let h = harness_with(
        workspaces.clone(),
        executables.clone(),
        filter,
        stored_config(),
    );
    assert_eq!(names(h.lib.visible_executables()), vec!["prod"]);

    let filter = Filter {
        namespace: "ci".into(),
        ..Filter::default()
    };
    let h = harness_with(workspaces, executables, filter, stored_config());
    assert_eq!(h.lib.visible_namespaces(), ["ci"]);
    assert_eq!(names(h.lib.visible_executables()), vec!["build", "test"]);
}

#[test]
fn unknown_workspace_filter_shows_nothing() {
    let (workspaces, executables) = catalog();
    let filter = Filter {
        workspace: "ghost".into(),
        ..Filter::default()
    };
    let mut h = harness_with(workspaces, executables, filter, stored_config());
    assert!(h.lib.visible_workspaces().is_empty());
    assert!(h.lib.visible_executables().is_empty());
    h.press_all(&[Key::Down, Key::Char('s'), Key::Right, Key::Char('c')]);
    assert!(h.host.calls().is_empty());
}

#[test]
fn help_pages_and_split_view() {
    let mut h = harness();
    h.press(Key::Char('h'));
    assert!(h.lib.show_help());
    assert_eq!(h.lib.help_page(), 0);
    h.press(Key::Char('h'));
    assert!(h.lib.show_help());
    assert_eq!(h.lib.help_page(), 1);
    h.press(Key::Char('h'));
    assert!(!h.lib.show_help());
    assert_eq!(h.lib.help_page(), 0);

    let [_, one, two] = h.lib.pane_widths();
    assert_eq!(one, two);
    h.press(Key::Tab);
    assert!(h.lib.split_view());
    let [ws, one, two] = h.lib.pane_widths();
    assert_eq!(ws + one + two, 120);
}
