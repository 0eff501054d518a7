//! Render pass: rewind, header, visible slice, cursor restore.
//!
//! A pass paints the expression's visible rows after the prompt, honoring
//! soft wrap. Two details carry most of the correctness weight:
//!
//! * A line whose last row is exactly full gets an explicit line feed after
//!   its text. The feed enters the line's trailing empty row, which is where
//!   the end-of-line position lives, so the div/mod arithmetic stays exact.
//! * The pass records the logical position the real cursor ends on (the last
//!   painted character, or one past it) and walks from there back to the
//!   logical cursor with plain relative motions. When the bottom of a line
//!   is clipped by the viewport the terminal parks the cursor on the last
//!   column of the clipped row, and the recorded position accounts for it.
//!
//! Between logical lines exactly one line feed precedes the next prompt.
//! Fragments of a partially visible line rely on the terminal's deferred
//! auto-wrap, so consecutive full-width fragments need no separator.

use crate::Editor;
use anyhow::Result;
use core_buffer::Cursor;
use core_term::TermSize;
use std::io::Write;
use tracing::{debug, warn};

impl<W: Write, S: TermSize> Editor<W, S> {
    /// Bring the real cursor to the top-left of the previously drawn
    /// expression. When the previous expression filled the viewport the walk
    /// could leave the screen, so jump to the absolute first row instead and
    /// let the clear-and-repaint below cover everything.
    pub(crate) fn rewind_real_cursor(&mut self) -> Result<()> {
        let previous_height = self.expression_height();
        if previous_height >= self.viewport_height() {
            core_term::move_to_row(&mut self.out, 0)?;
        } else {
            let saved = self.cursor;
            self.move_cursor_to_unscrolled(0, 0)?;
            self.cursor = saved;
        }
        core_term::move_to_column(&mut self.out, 0)?;
        Ok(())
    }

    /// Erase the previous header area, run the header callback into a string
    /// buffer, print it, and record the new height.
    pub(crate) fn repaint_header(&mut self) -> Result<()> {
        core_term::clear_line_after(&mut self.out)?;
        if self.header_height > 0 {
            core_term::move_rel(&mut self.out, 0, -(self.header_height as i32))?;
            core_term::clear_screen_down(&mut self.out)?;
        }
        let mut buf = String::new();
        let rows = (self.header)(&mut buf, self.header_height);
        self.out.write_all(buf.as_bytes())?;
        self.header_height = rows;
        Ok(())
    }

    /// Paint the visible slice (or everything, in full view) and put the
    /// real cursor back on the logical cursor. `anchor_cursor` re-centers
    /// the window on the cursor first; repaints triggered by explicit
    /// scrolling pass false so they do not undo themselves.
    pub(crate) fn print_expression(&mut self, full_view: bool, anchor_cursor: bool) -> Result<()> {
        self.refresh_prompt_width();
        let m = self.metrics();
        if self.narrow_terminal() {
            warn!(
                target: "editor.render",
                width = m.width,
                prompt = m.prompt,
                "terminal narrower than the prompt, skipping paint"
            );
            core_term::clear_screen_down(&mut self.out)?;
            return Ok(());
        }
        if !full_view && anchor_cursor {
            self.update_scroll_offset(0);
        }
        core_term::clear_screen_down(&mut self.out)?;
        let (start, end) = if full_view {
            (0, usize::MAX)
        } else {
            self.view_bounds()
        };
        debug!(
            target: "editor.render",
            start,
            end,
            offset = self.scroll_offset,
            full_view,
            "paint"
        );

        let colorized = match self.colorized_cache.take() {
            Some(lines) => lines,
            None => self.build_colorized(),
        };
        let mut row_acc = 0usize;
        let mut painted_any = false;
        let mut painted: Option<(usize, usize)> = None;
        for y in 0..self.buffer.line_count() {
            let len = self.buffer.char_len(y);
            let height = m.height_of_len(len);
            let top = row_acc;
            let bottom = top + height - 1;
            row_acc += height;
            if bottom < start {
                continue;
            }
            if top > end {
                break;
            }
            if painted_any {
                core_term::line_feed(&mut self.out)?;
            }
            painted_any = true;
            if top >= start && bottom <= end {
                let prompt = (self.prompt)(y, self.color);
                self.out.write_all(prompt.as_bytes())?;
                self.out.write_all(colorized[y].as_bytes())?;
                if m.last_row_width(len) == 0 {
                    core_term::line_feed(&mut self.out)?;
                }
                painted = Some((len, y));
            } else {
                let fragments = core_layout::split_rows(&colorized[y], m);
                let last = fragments.len() - 1;
                for (k, fragment) in fragments.iter().enumerate() {
                    let abs = top + k;
                    if abs < start || abs > end {
                        continue;
                    }
                    if k == 0 {
                        let prompt = (self.prompt)(y, self.color);
                        self.out.write_all(prompt.as_bytes())?;
                    }
                    self.out.write_all(fragment.as_bytes())?;
                    if k == last && m.last_row_width(len) == 0 {
                        core_term::line_feed(&mut self.out)?;
                    }
                    let through = ((k + 1) * m.width).saturating_sub(m.prompt).min(len);
                    painted = Some(if abs == end && k < last {
                        // clipped mid-line: the cursor parks on the last
                        // column of this row, one short of `through`
                        (through - 1, y)
                    } else {
                        (through, y)
                    });
                }
            }
        }
        self.colorized_cache = Some(colorized);

        if let Some((px, py)) = painted {
            let target = self.cursor;
            self.cursor = Cursor::new(px, py);
            self.move_cursor_to_unscrolled(target.x, target.y)?;
        }
        Ok(())
    }

    /// Colorized lines for display: the highlight callback applied to the
    /// joined expression, split back on line feeds. Falls back to the plain
    /// lines when color is off or the callback changed the line structure.
    fn build_colorized(&mut self) -> Vec<String> {
        if !self.color {
            return self.buffer.lines().to_vec();
        }
        let joined = self.expression().to_string();
        let colored = (self.highlight)(&joined);
        let lines: Vec<String> = colored.split('\n').map(str::to_string).collect();
        if lines.len() == self.buffer.line_count() {
            lines
        } else {
            warn!(
                target: "editor.render",
                got = lines.len(),
                expected = self.buffer.line_count(),
                "highlighter changed the line count, painting plain"
            );
            self.buffer.lines().to_vec()
        }
    }
}
