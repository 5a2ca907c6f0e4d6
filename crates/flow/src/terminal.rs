//! Terminal ownership for the interactive library.
//!
//! The event loop draws the [`Library`] until the user quits or a run asks for
//! the terminal. A hand-off restores the terminal first, then acknowledges it
//! and waits for the run to finish.

use std::{
    io::{self, Stdout},
    panic,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use library::{Container, Event, Key, Library, view};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, info};

use crate::Result;

/// How long to wait for input before checking for a hand-off request.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal type driven by the loop.
type Term = Terminal<CrosstermBackend<Stdout>>;

/// Why the event loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    /// The user quit.
    Quit,
    /// A run asked for the terminal.
    Handoff,
}

/// Put the terminal into raw mode on the alternate screen.
pub fn enter() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
}

/// Undo [`enter`].
pub fn leave() -> io::Result<()> {
    terminal::disable_raw_mode()?;
    execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)
}

/// True for the keys that end the session.
fn is_quit(event: &Event) -> bool {
    matches!(event, Event::Key(Key::Char('q') | Key::Ctrl('c')))
}

/// Run the interactive session until quit or hand-off.
///
/// `redraw` is raised by collaborators that borrowed the terminal (the editor)
/// and forces a full repaint.
pub fn run(mut lib: Library, container: &Container, redraw: &AtomicBool) -> Result<()> {
    let hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        leave().ok();
        hook(info);
    }));

    enter()?;
    let outcome = Terminal::new(CrosstermBackend::new(io::stdout()))
        .and_then(|mut term| event_loop(&mut term, &mut lib, container, redraw));
    leave()?;

    if outcome? == Exit::Handoff {
        info!("terminal released to run");
        container.released();
        container.wait_for_handoff();
    }
    Ok(())
}

/// Draw and dispatch events until the session ends.
fn event_loop(
    term: &mut Term,
    lib: &mut Library,
    container: &Container,
    redraw: &AtomicBool,
) -> io::Result<Exit> {
    let (width, height) = terminal::size()?;
    lib.update(&Event::Resize { width, height });

    loop {
        if redraw.swap(false, Ordering::SeqCst) {
            term.clear()?;
        }
        term.draw(|frame| view::render(frame, lib))?;

        if container.shutdown_requested() {
            return Ok(Exit::Handoff);
        }
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let event = Event::from(event::read()?);
        if is_quit(&event) {
            debug!("quit requested");
            return Ok(Exit::Quit);
        }
        lib.update(&event);
    }
}
