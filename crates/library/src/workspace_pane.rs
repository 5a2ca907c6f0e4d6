//! Key handling for pane 0: workspace and namespace selection.

use tracing::debug;

use crate::{
    Event, Key, Library,
    model::{ALL_NAMESPACES_LABEL, ALL_WORKSPACES_LABEL, WITHOUT_NAMESPACE_LABEL},
};

/// Handle `event` when pane 0 is active.
pub(crate) fn update(lib: &mut Library, event: &Event) {
    if lib.current_pane != 0 || lib.visible_workspaces.is_empty() {
        return;
    }

    if let Event::Key(key) = event {
        match key {
            Key::Down => move_left_selection(lib, true),
            Key::Up => move_left_selection(lib, false),
            Key::Space => {
                if !lib.visible_namespaces.is_empty() {
                    lib.show_namespaces = !lib.show_namespaces;
                    lib.current_namespace = 0;
                    lib.panes[0].goto_top();
                    debug!(show_namespaces = lib.show_namespaces, "toggled namespaces");
                }
            }
            Key::Char('o') => open_workspace(lib),
            Key::Char('e') => edit_workspace(lib),
            Key::Char('s') => set_current_context(lib),
            _ => {}
        }
    }
    lib.panes[0].update(event);
}

/// Move the namespace or workspace selection by one, without wrapping.
fn move_left_selection(lib: &mut Library, down: bool) {
    let (idx, len) = if lib.show_namespaces {
        (&mut lib.current_namespace, lib.visible_namespaces.len())
    } else {
        (&mut lib.current_workspace, lib.visible_workspaces.len())
    };
    if down {
        if *idx + 1 < len {
            *idx += 1;
        }
    } else if *idx > 0 && *idx < len {
        *idx -= 1;
    }
    let row = *idx;
    lib.panes[0].ensure_visible(row);
}

/// Open the selected workspace's directory.
fn open_workspace(lib: &mut Library) {
    let Some(location) = lib
        .selected_workspace_config()
        .map(|w| w.location().to_path_buf())
    else {
        lib.fail("no workspace selected", &"empty selection");
        return;
    };
    if let Err(e) = lib.ctx.host.open(&location) {
        lib.fail("unable to open workspace", &e);
    }
}

/// Edit the selected workspace's `workspace.yaml`.
fn edit_workspace(lib: &mut Library) {
    let Some(config_path) = lib.selected_workspace_config().map(|w| w.config_path()) else {
        lib.fail("no workspace selected", &"empty selection");
        return;
    };
    if let Err(e) = lib.ctx.host.open_in_editor(&config_path) {
        lib.fail("unable to open workspace in editor", &e);
    }
}

/// Persist the selected workspace or namespace as the current context.
///
/// The on-disk configuration is reloaded first and written before the
/// in-memory mirror changes; any refusal or failure leaves both untouched.
fn set_current_context(lib: &mut Library) {
    let Some(assigned) = lib
        .selected_workspace_config()
        .map(|w| w.assigned_name().to_string())
    else {
        lib.fail("no workspace selected", &"empty selection");
        return;
    };
    let selected_ws = lib.selected_workspace().unwrap_or_default().to_string();
    let selected_ns = lib.selected_namespace().map(str::to_string);

    let mut cfg = match lib.ctx.host.load_user_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            lib.fail("unable to load user config", &e);
            return;
        }
    };

    if lib.show_namespaces {
        match selected_ns.as_deref() {
            Some(WITHOUT_NAMESPACE_LABEL) => cfg.current_namespace.clear(),
            None | Some(ALL_NAMESPACES_LABEL) => {
                lib.fail("no namespace selected", &"all-namespaces entry selected");
                return;
            }
            Some(ns) => cfg.current_namespace = ns.to_string(),
        }
    } else {
        if selected_ws == ALL_WORKSPACES_LABEL {
            lib.fail("no workspace selected", &"all-workspaces entry selected");
            return;
        }
        if selected_ws != assigned {
            lib.fail(
                "current workspace out of sync",
                &format!("selected '{selected_ws}' resolves to '{assigned}'"),
            );
            return;
        }
        cfg.current_workspace = assigned;
    }

    if let Err(e) = lib.ctx.host.write_user_config(&cfg) {
        lib.fail("unable to write user config", &e);
        return;
    }
    lib.ctx.config.current_workspace = cfg.current_workspace;
    lib.ctx.config.current_namespace = cfg.current_namespace;
    lib.succeed("context updated");
}
