//! Scroll state for a single pane.

use crate::{Event, Key, Passthrough};

/// Lines moved per mouse wheel step.
const WHEEL_STEP: usize = 3;

/// Vertical scroll state of one pane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Inner width in columns.
    pub width: u16,
    /// Inner height in rows.
    pub height: u16,
    /// First visible content row.
    pub y_offset: usize,
    /// Total content rows.
    pub content_height: usize,
}

impl Viewport {
    /// Largest offset that still fills the viewport.
    fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(usize::from(self.height))
    }

    /// Resize, keeping the offset in range.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.y_offset = self.y_offset.min(self.max_offset());
    }

    /// Set the content height, keeping the offset in range.
    pub fn set_content_height(&mut self, rows: usize) {
        self.content_height = rows;
        self.y_offset = self.y_offset.min(self.max_offset());
    }

    /// Scroll to the first row.
    pub fn goto_top(&mut self) {
        self.y_offset = 0;
    }

    /// Scroll to the last page.
    pub fn goto_bottom(&mut self) {
        self.y_offset = self.max_offset();
    }

    /// Scroll up by `n` rows.
    pub fn scroll_up(&mut self, n: usize) {
        self.y_offset = self.y_offset.saturating_sub(n);
    }

    /// Scroll down by `n` rows, stopping at the last page.
    pub fn scroll_down(&mut self, n: usize) {
        self.y_offset = (self.y_offset + n).min(self.max_offset());
    }

    /// Scroll up one page.
    pub fn page_up(&mut self) {
        self.scroll_up(usize::from(self.height.max(1)));
    }

    /// Scroll down one page.
    pub fn page_down(&mut self) {
        self.scroll_down(usize::from(self.height.max(1)));
    }

    /// Scroll the minimum amount that brings `row` into view.
    pub fn ensure_visible(&mut self, row: usize) {
        let height = usize::from(self.height);
        if height == 0 {
            return;
        }
        if row < self.y_offset {
            self.y_offset = row;
        } else if row >= self.y_offset + height {
            self.y_offset = row + 1 - height;
        }
    }

    /// React to the scrolling keys and wheel events.
    pub fn update(&mut self, event: &Event) {
        match event {
            Event::Key(Key::PageUp) => self.page_up(),
            Event::Key(Key::PageDown) => self.page_down(),
            Event::Key(Key::Home) => self.goto_top(),
            Event::Key(Key::End) => self.goto_bottom(),
            Event::Other(Passthrough::ScrollUp) => self.scroll_up(WHEEL_STEP),
            Event::Other(Passthrough::ScrollDown) => self.scroll_down(WHEEL_STEP),
            _ => {}
        }
    }
}
