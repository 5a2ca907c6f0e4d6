//! Input events understood by the library browser.

use crossterm::event::{
    Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

/// One input event for [`crate::Library::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// The terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },
    /// A key was pressed.
    Key(Key),
    /// Anything else; forwarded to the active pane's viewport.
    Other(Passthrough),
}

/// Keys the browser distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Space bar.
    Space,
    /// Escape.
    Esc,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
    /// A printable character without the control modifier.
    Char(char),
    /// A character pressed together with the control modifier.
    Ctrl(char),
}

/// Non-key events the viewports react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    /// Mouse wheel up.
    ScrollUp,
    /// Mouse wheel down.
    ScrollDown,
    /// Nothing the browser handles.
    Ignored,
}

impl From<KeyEvent> for Event {
    fn from(ev: KeyEvent) -> Self {
        if ev.kind == KeyEventKind::Release {
            return Self::Other(Passthrough::Ignored);
        }
        let key = match ev.code {
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Esc => Key::Esc,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Char(c) if ev.modifiers.contains(KeyModifiers::CONTROL) => Key::Ctrl(c),
            KeyCode::Char(' ') => Key::Space,
            KeyCode::Char(c) => Key::Char(c),
            _ => return Self::Other(Passthrough::Ignored),
        };
        Self::Key(key)
    }
}

impl From<TermEvent> for Event {
    fn from(ev: TermEvent) -> Self {
        match ev {
            TermEvent::Resize(width, height) => Self::Resize { width, height },
            TermEvent::Key(key) => key.into(),
            TermEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => Self::Other(Passthrough::ScrollUp),
                MouseEventKind::ScrollDown => Self::Other(Passthrough::ScrollDown),
                _ => Self::Other(Passthrough::Ignored),
            },
            _ => Self::Other(Passthrough::Ignored),
        }
    }
}
