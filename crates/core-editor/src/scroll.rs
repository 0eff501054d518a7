//! Viewport and scroll bookkeeping.
//!
//! The window over the expression's visual rows is anchored at the bottom:
//! with a zero offset the last row of the expression sits on the last row of
//! the viewport, and raising the offset reveals earlier rows. The offset is
//! clamped into `[0, max(0, total_rows - viewport_rows)]` at every use.

use crate::Editor;
use anyhow::Result;
use core_term::TermSize;
use std::io::Write;

impl<W: Write, S: TermSize> Editor<W, S> {
    /// Total visual height of the expression under the current width and
    /// prompt, cached until the next mutation.
    pub fn expression_height(&mut self) -> usize {
        if let Some(h) = self.height_cache {
            return h;
        }
        let m = self.metrics();
        let h = (0..self.buffer.line_count())
            .map(|y| m.height_of_len(self.buffer.char_len(y)))
            .sum();
        self.height_cache = Some(h);
        h
    }

    /// Reveal one earlier visual row, repainting if the window moved.
    pub fn scroll_up(&mut self) -> Result<()> {
        let max = self.max_scroll();
        let next = (self.scroll_offset + 1).min(max);
        if next != self.scroll_offset {
            self.scroll_offset = next;
            self.repaint()?;
        }
        Ok(())
    }

    /// Slide one visual row back toward the bottom anchor.
    pub fn scroll_down(&mut self) -> Result<()> {
        let next = self.scroll_offset.saturating_sub(1);
        if next != self.scroll_offset {
            self.scroll_offset = next;
            self.repaint()?;
        }
        Ok(())
    }

    pub(crate) fn viewport_height(&self) -> usize {
        self.height().saturating_sub(self.header_height)
    }

    pub(crate) fn max_scroll(&mut self) -> usize {
        let viewport = self.viewport_height();
        self.expression_height().saturating_sub(viewport)
    }

    /// Visual rows `[start, end]` of the expression currently on screen.
    /// `end < start` means nothing is visible (the header ate the viewport).
    pub(crate) fn view_bounds(&mut self) -> (usize, usize) {
        let total = self.expression_height();
        let hidden = self.max_scroll();
        let offset = self.scroll_offset.min(hidden);
        (hidden - offset, total.saturating_sub(1 + offset))
    }

    /// Absolute visual row of the cursor, shifted by `y_shift` (a move about
    /// to happen).
    fn cursor_visual_row(&mut self, y_shift: isize) -> isize {
        let m = self.metrics();
        let mut row = 0usize;
        for y in 0..self.cursor.y {
            row += m.height_of_len(self.buffer.char_len(y));
        }
        row += m.row_of_col(self.cursor.x);
        row as isize + y_shift
    }

    /// Bring the (possibly shifted) cursor row inside the window. Returns
    /// true when the offset changed, in which case the caller repaints.
    pub(crate) fn update_scroll_offset(&mut self, y_shift: isize) -> bool {
        if self.viewport_height() == 0 {
            return false;
        }
        let total = self.expression_height() as isize;
        let hidden = self.max_scroll() as isize;
        let clamped = (self.scroll_offset as isize).min(hidden);
        let start = hidden - clamped;
        let end = total - 1 - clamped;
        let row = self.cursor_visual_row(y_shift);
        let next = if row < start {
            hidden - row
        } else if row > end {
            total - 1 - row
        } else {
            clamped
        };
        let next = next.clamp(0, hidden) as usize;
        let changed = next != clamped as usize;
        self.scroll_offset = next;
        changed
    }
}
