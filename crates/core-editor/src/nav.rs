//! Navigation engine: logical cursor moves paired with the relative terminal
//! motions that keep the real cursor in lockstep.
//!
//! Soft wrap makes the edges interesting: stepping left from the first
//! column of a continuation row lands on the last column of the row above,
//! stepping right off a line lands after the next line's prompt, and
//! vertical moves map visual columns between lines whose last rows have
//! different widths.
//!
//! Every single-step motion that changes the visual row first offers the
//! shift to the scroll logic; if the viewport has to move, the repaint
//! happens before the relative motion is emitted. Emitting first would let
//! the terminal clamp the cursor at the screen edge and silently break the
//! logical-to-real correspondence.

use crate::Editor;
use anyhow::{Result, bail};
use core_term::TermSize;
use std::io::Write;

impl<W: Write, S: TermSize> Editor<W, S> {
    /// Step one character left, crossing to the end of the previous line at
    /// column 0. Returns false at the very beginning.
    pub fn move_cursor_left(&mut self) -> Result<bool> {
        self.move_left_inner(true)
    }

    /// Step one character right, crossing to the start of the next line at
    /// end of line. Returns false at the very end.
    pub fn move_cursor_right(&mut self) -> Result<bool> {
        self.move_right_inner(true)
    }

    /// Move one visual row up, staying on the same logical line while it has
    /// rows above the cursor. Returns false on the expression's first row.
    pub fn move_cursor_up(&mut self) -> Result<bool> {
        self.move_up_inner(true)
    }

    /// Move one visual row down. Returns false on the expression's last row.
    pub fn move_cursor_down(&mut self) -> Result<bool> {
        self.move_down_inner(true)
    }

    /// Walk to an absolute logical position by repeated left/right steps,
    /// then reconcile the scroll offset. A target outside the buffer is an
    /// internal bug and surfaces as an error.
    pub fn move_cursor_to(&mut self, x: usize, y: usize) -> Result<()> {
        if self.narrow_terminal() {
            return Ok(());
        }
        self.sweep_to(x, y)?;
        if self.update_scroll_offset(0) {
            self.repaint()?;
        }
        Ok(())
    }

    /// Same walk without touching the scroll offset; used by the renderer,
    /// whose window must not move while it restores the cursor.
    pub(crate) fn move_cursor_to_unscrolled(&mut self, x: usize, y: usize) -> Result<()> {
        self.sweep_to(x, y)
    }

    pub fn move_to_begin(&mut self) -> Result<()> {
        self.move_cursor_to(0, 0)
    }

    pub fn move_to_end(&mut self) -> Result<()> {
        let y = self.buffer.line_count() - 1;
        let x = self.buffer.char_len(y);
        self.move_cursor_to(x, y)
    }

    pub fn move_to_end_of_line(&mut self) -> Result<()> {
        let x = self.buffer.char_len(self.cursor.y);
        self.move_cursor_to(x, self.cursor.y)
    }

    fn move_left_inner(&mut self, allow_scroll: bool) -> Result<bool> {
        if self.narrow_terminal() {
            return Ok(false);
        }
        let m = self.metrics();
        if self.cursor.x > 0 {
            if m.last_row_width(self.cursor.x) == 0 {
                // leftmost column of a continuation row: wrap to the last
                // column of the row above
                self.adjust_scroll_for_step(-1, allow_scroll)?;
                core_term::move_rel(&mut self.out, m.width as i32 - 1, -1)?;
            } else {
                core_term::move_rel(&mut self.out, -1, 0)?;
            }
            self.cursor.x -= 1;
            Ok(true)
        } else if self.cursor.y > 0 {
            let prev_len = self.buffer.char_len(self.cursor.y - 1);
            let target_col = m.last_row_width(prev_len) as i32;
            let cur_col = m.last_row_width(0) as i32;
            self.adjust_scroll_for_step(-1, allow_scroll)?;
            core_term::move_rel(&mut self.out, target_col - cur_col, -1)?;
            self.cursor.x = prev_len;
            self.cursor.y -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn move_right_inner(&mut self, allow_scroll: bool) -> Result<bool> {
        if self.narrow_terminal() {
            return Ok(false);
        }
        let m = self.metrics();
        let len = self.buffer.char_len(self.cursor.y);
        if self.cursor.x < len {
            if m.last_row_width(self.cursor.x) == m.width - 1 {
                // last column: the next character begins a fresh row
                self.adjust_scroll_for_step(1, allow_scroll)?;
                core_term::move_rel(&mut self.out, -(m.width as i32 - 1), 1)?;
            } else {
                core_term::move_rel(&mut self.out, 1, 0)?;
            }
            self.cursor.x += 1;
            Ok(true)
        } else if self.cursor.y + 1 < self.buffer.line_count() {
            let cur_col = m.last_row_width(len) as i32;
            self.adjust_scroll_for_step(1, allow_scroll)?;
            core_term::move_rel(&mut self.out, m.prompt as i32 - cur_col, 1)?;
            self.cursor.x = 0;
            self.cursor.y += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn move_up_inner(&mut self, allow_scroll: bool) -> Result<bool> {
        if self.narrow_terminal() {
            return Ok(false);
        }
        let m = self.metrics();
        if m.prompt + self.cursor.x >= m.width {
            // continuation row of the current line
            self.adjust_scroll_for_step(-1, allow_scroll)?;
            if self.cursor.x >= m.width {
                core_term::move_rel(&mut self.out, 0, -1)?;
                self.cursor.x -= m.width;
            } else {
                // the column above falls inside the prompt: snap to line start
                let cur_col = m.last_row_width(self.cursor.x) as i32;
                core_term::move_rel(&mut self.out, m.prompt as i32 - cur_col, -1)?;
                self.cursor.x = 0;
            }
            Ok(true)
        } else if self.cursor.y > 0 {
            let prev_len = self.buffer.char_len(self.cursor.y - 1);
            let last_width = m.last_row_width(prev_len);
            let cur_col = m.prompt + self.cursor.x;
            self.adjust_scroll_for_step(-1, allow_scroll)?;
            if last_width < cur_col {
                // previous line's last row is too short: land on its end
                core_term::move_rel(&mut self.out, last_width as i32 - cur_col as i32, -1)?;
                self.cursor.x = prev_len;
            } else {
                core_term::move_rel(&mut self.out, 0, -1)?;
                self.cursor.x = prev_len - (last_width - cur_col);
            }
            self.cursor.y -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn move_down_inner(&mut self, allow_scroll: bool) -> Result<bool> {
        if self.narrow_terminal() {
            return Ok(false);
        }
        let m = self.metrics();
        let len = self.buffer.char_len(self.cursor.y);
        let cur_col = m.last_row_width(self.cursor.x);
        if m.row_of_col(self.cursor.x) < m.row_of_col(len) {
            // more rows of this line below the cursor
            self.adjust_scroll_for_step(1, allow_scroll)?;
            let nx = (self.cursor.x + m.width).min(len);
            core_term::move_rel(&mut self.out, m.last_row_width(nx) as i32 - cur_col as i32, 1)?;
            self.cursor.x = nx;
            Ok(true)
        } else if self.cursor.y + 1 < self.buffer.line_count() {
            let next_len = self.buffer.char_len(self.cursor.y + 1);
            self.adjust_scroll_for_step(1, allow_scroll)?;
            let nx = if cur_col < m.prompt {
                // visual column inside the prompt area: line start
                0
            } else {
                (cur_col - m.prompt).min(next_len)
            };
            core_term::move_rel(&mut self.out, (m.prompt + nx) as i32 - cur_col as i32, 1)?;
            self.cursor.x = nx;
            self.cursor.y += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn sweep_to(&mut self, x: usize, y: usize) -> Result<()> {
        if self.narrow_terminal() {
            return Ok(());
        }
        while self.cursor.y < y {
            if !self.move_right_inner(false)? {
                bail!("move_cursor_to: line {y} is beyond the buffer");
            }
        }
        while self.cursor.y > y {
            if !self.move_left_inner(false)? {
                bail!("move_cursor_to: line {y} is above the buffer");
            }
        }
        while self.cursor.x < x {
            if !self.move_right_inner(false)? || self.cursor.y != y {
                bail!("move_cursor_to: overshot ({x}, {y})");
            }
        }
        while self.cursor.x > x {
            if !self.move_left_inner(false)? || self.cursor.y != y {
                bail!("move_cursor_to: overshot ({x}, {y})");
            }
        }
        Ok(())
    }

    fn adjust_scroll_for_step(&mut self, y_shift: isize, allow_scroll: bool) -> Result<()> {
        if allow_scroll && self.update_scroll_offset(y_shift) {
            self.repaint()?;
        }
        Ok(())
    }
}
