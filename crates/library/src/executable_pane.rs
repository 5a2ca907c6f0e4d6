//! Key handling for panes 1 and 2: the executable list and its detail view.

use std::{process, sync::Arc, thread};

use tracing::{debug, error, info};

use crate::{Event, Key, Library, detail::FORMAT_COUNT};

/// Handle `event` when pane 1 or 2 is active.
///
/// Only pane 1 owns the selection; pane 2 is a read-only detail view.
pub(crate) fn update(lib: &mut Library, event: &Event) {
    let pane = lib.current_pane;
    if pane != 1 && pane != 2 {
        return;
    }
    if lib.visible_executables.is_empty() {
        return;
    }

    if let Event::Key(key) = event {
        match key {
            Key::Down if pane == 1 => {
                if lib.current_executable + 1 < lib.visible_executables.len() {
                    lib.current_executable += 1;
                    selection_moved(lib);
                }
            }
            Key::Up if pane == 1 => {
                if lib.current_executable > 0 {
                    lib.current_executable -= 1;
                    selection_moved(lib);
                }
            }
            Key::Char('e') => edit_executable(lib),
            Key::Char('c') => copy_reference(lib),
            Key::Char('r') => run_executable(lib),
            Key::Char('f') if pane == 2 => {
                lib.current_format = (lib.current_format + 1) % FORMAT_COUNT;
                lib.panes[2].goto_top();
                debug!(format = %lib.detail_format(), "cycled detail format");
            }
            _ => {}
        }
    }
    lib.panes[pane].update(event);
}

/// Keep the new selection visible and show its detail from the top.
fn selection_moved(lib: &mut Library) {
    lib.panes[1].ensure_visible(lib.current_executable);
    lib.panes[2].goto_top();
}

/// Edit the definition file declaring the selected executable.
fn edit_executable(lib: &mut Library) {
    let Some(path) = lib
        .selected_executable()
        .map(|e| e.definition_path().to_path_buf())
    else {
        lib.fail("no executable selected", &"empty selection");
        return;
    };
    if let Err(e) = lib.ctx.host.open_in_editor(&path) {
        lib.fail("unable to open executable in editor", &e);
    }
}

/// Copy the selected executable's canonical reference.
fn copy_reference(lib: &mut Library) {
    let Some(reference) = lib
        .selected_executable()
        .map(|e| e.reference().to_string())
    else {
        lib.fail("no executable selected", &"empty selection");
        return;
    };
    match lib.ctx.host.clipboard_write(&reference) {
        Ok(()) => lib.succeed("copied reference to clipboard"),
        Err(e) => lib.fail("unable to copy reference to clipboard", &e),
    }
}

/// Hand the terminal over and run the selected executable on a detached thread.
///
/// The event loop never hears back. A failed run terminates the process,
/// since the interactive session is already gone by then.
fn run_executable(lib: &mut Library) {
    let Some(reference) = lib
        .selected_executable()
        .map(|e| e.reference().to_string())
    else {
        lib.fail("no executable selected", &"empty selection");
        return;
    };
    info!(reference = %reference, "handing off to run");

    let container = lib.ctx.container.clone();
    let run = Arc::clone(&lib.ctx.run);
    let span = lib.ctx.span.clone();
    let spawned = thread::Builder::new()
        .name("flow-run".into())
        .spawn(move || {
            let _entered = span.enter();
            container.shutdown();
            match run(&reference) {
                Ok(()) => container.finish(),
                Err(e) => {
                    error!(error = %e, reference = %reference, "unable to execute command");
                    process::exit(1);
                }
            }
        });
    if let Err(e) = spawned {
        lib.fail("unable to start run", &e);
    }
}
