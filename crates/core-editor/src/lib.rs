//! Multi-line, wrapping-aware expression editor core for embedding in a
//! read-eval-print loop.
//!
//! The editor keeps three views of one expression consistent:
//! * the logical cursor `(x, y)` inside the line buffer,
//! * the real terminal cursor, which differs because every logical line is
//!   prefixed by a prompt and soft-wraps at the terminal width,
//! * the viewport, a bottom-anchored window over the expression's visual
//!   rows controlled by a scroll offset.
//!
//! All mutations go through the transactional [`Editor::update`] envelope,
//! which produces exactly one repaint per call in a fixed, externally
//! observable order: hide cursor, rewind, header, mutations, clamp,
//! invalidate caches, paint, restore cursor, show cursor. Hosts supply a
//! prompt callback, an optional header callback (completion UIs paint above
//! the prompt), an optional highlight callback, an output sink, and a
//! terminal size provider; everything else lives here.
//!
//! Invariants (hold after every envelope):
//! * the buffer is never empty and `y < line_count`, `x <= char_len(y)`,
//! * the scroll offset stays within `[0, max(0, total_rows - viewport)]`,
//! * wrap arithmetic only ever sees uncolored character counts.
//!
//! The editor is single threaded and not reentrant; a render is atomic from
//! the caller's perspective. An error mid-envelope can leave stale escape
//! state behind, which the next envelope's rewind-and-clear preamble cleans
//! up.

mod nav;
mod render;
mod scroll;

use anyhow::Result;
use core_buffer::{Cursor, LineBuffer};
use core_layout::visible_width;
use core_term::{CursorRestoreGuard, TermSize};
use std::io::Write;

/// Produces the prompt for a given line index, colorized or plain.
pub type PromptFn = Box<dyn FnMut(usize, bool) -> String>;
/// Writes header rows into a string buffer, receiving the previous header
/// height and returning the number of rows written.
pub type HeaderFn = Box<dyn FnMut(&mut String, usize) -> usize>;
/// Colorizes a whole expression; must preserve line structure.
pub type HighlightFn = Box<dyn Fn(&str) -> String>;

pub struct Editor<W: Write, S: TermSize> {
    out: W,
    size: S,
    prompt: PromptFn,
    header: HeaderFn,
    highlight: HighlightFn,
    color: bool,
    buffer: LineBuffer,
    cursor: Cursor,
    scroll_offset: usize,
    prompt_width: usize,
    header_height: usize,
    width_override: Option<usize>,
    height_override: Option<usize>,
    expression_cache: Option<String>,
    height_cache: Option<usize>,
    colorized_cache: Option<Vec<String>>,
    _restore: CursorRestoreGuard,
}

impl<W: Write, S: TermSize> Editor<W, S> {
    pub fn new(out: W, size: S, prompt: PromptFn) -> Self {
        let mut editor = Self {
            out,
            size,
            prompt,
            header: Box::new(|_, _| 0),
            highlight: Box::new(|s| s.to_string()),
            color: true,
            buffer: LineBuffer::new(),
            cursor: Cursor::origin(),
            scroll_offset: 0,
            prompt_width: 0,
            header_height: 0,
            width_override: None,
            height_override: None,
            expression_cache: None,
            height_cache: None,
            colorized_cache: None,
            _restore: CursorRestoreGuard::new(),
        };
        editor.refresh_prompt_width();
        editor
    }

    pub fn set_header(&mut self, header: HeaderFn) {
        self.header = header;
    }

    pub fn set_highlight(&mut self, highlight: HighlightFn) {
        self.highlight = highlight;
        self.colorized_cache = None;
    }

    pub fn set_color(&mut self, on: bool) {
        self.color = on;
        self.colorized_cache = None;
    }

    /// Pin the width instead of asking the size provider.
    pub fn set_width_override(&mut self, width: Option<usize>) {
        self.width_override = width;
        self.height_cache = None;
    }

    /// Pin the height instead of asking the size provider.
    pub fn set_height_override(&mut self, height: Option<usize>) {
        self.height_override = height;
    }

    /// Direct access to the output sink (hosts flushing their own text,
    /// tests inspecting the escape stream).
    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.out
    }

    // ------------------------------------------------------------------
    // Transactional envelope
    // ------------------------------------------------------------------

    /// Run mutations and repaint exactly once.
    pub fn update<F: FnOnce(&mut Self)>(&mut self, mutate: F) -> Result<()> {
        self.run_update(false, Some(mutate))
    }

    /// Like [`Editor::update`] but paints the whole expression regardless of
    /// the viewport, with no scrolling arithmetic. Used at submit time.
    pub fn update_full_view<F: FnOnce(&mut Self)>(&mut self, mutate: F) -> Result<()> {
        self.run_update(true, Some(mutate))
    }

    /// Repaint without mutating: same pipeline, but no clamp, no cache
    /// invalidation, and the scroll offset is honored as-is.
    pub(crate) fn repaint(&mut self) -> Result<()> {
        self.run_update(false, None::<fn(&mut Self)>)
    }

    fn run_update<F: FnOnce(&mut Self)>(&mut self, full_view: bool, mutate: Option<F>) -> Result<()> {
        core_term::hide_cursor(&mut self.out)?;
        self.rewind_real_cursor()?;
        self.repaint_header()?;
        let mutated = mutate.is_some();
        if let Some(f) = mutate {
            f(self);
            self.cursor.clamp_to(&self.buffer);
            self.invalidate_caches();
        }
        self.print_expression(full_view, mutated)?;
        core_term::show_cursor(&mut self.out)?;
        self.out.flush()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Edit primitives (call inside `update`)
    // ------------------------------------------------------------------

    /// Insert one character at the cursor. A line feed delegates to
    /// [`Editor::insert_new_line`] with no indent; any other ASCII control
    /// character is dropped.
    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_new_line(0);
            return;
        }
        if c.is_ascii_control() {
            return;
        }
        self.buffer.insert_char(&mut self.cursor, c);
    }

    /// Insert a string character by character under the same filtering rules.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            self.insert_char(c);
        }
    }

    /// Break the current line at the cursor; the right half starts the new
    /// line after two spaces per indent level.
    pub fn insert_new_line(&mut self, indent: usize) {
        self.buffer.split_line(&mut self.cursor, indent);
    }

    /// Forward delete: the character under the cursor, or a join with the
    /// next line at end of line.
    pub fn delete(&mut self) {
        self.buffer.delete_forward(&self.cursor);
    }

    /// Backspace: the character before the cursor, or a join with the
    /// previous line at column 0.
    pub fn back(&mut self) {
        self.buffer.backspace(&mut self.cursor);
    }

    /// Reset the expression to a single empty line.
    pub fn clear_expression(&mut self) {
        self.buffer.clear();
        self.cursor = Cursor::origin();
    }

    /// Substitute the buffer wholesale (inside an envelope). The cursor is
    /// clamped right away so primitives issued later in the same envelope
    /// see a valid position.
    pub fn replace_buffer(&mut self, lines: Vec<String>) {
        self.buffer.replace(lines);
        self.cursor.clamp_to(&self.buffer);
    }

    /// Substitute the buffer and repaint.
    pub fn replace(&mut self, lines: Vec<String>) -> Result<()> {
        self.update(move |ed| ed.replace_buffer(lines))
    }

    // ------------------------------------------------------------------
    // Session boundaries
    // ------------------------------------------------------------------

    /// Start editing a fresh expression: reset scroll, buffer, caches and
    /// cursor, then print the first prompt and record its printable width.
    pub fn prompt_next(&mut self) -> Result<()> {
        self.scroll_offset = 0;
        self.buffer = LineBuffer::new();
        self.cursor = Cursor::origin();
        self.header_height = 0;
        self.invalidate_caches();
        self.refresh_prompt_width();
        let prompt = (self.prompt)(0, self.color);
        self.out.write_all(prompt.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    /// Finish editing: repaint in full view (optionally substituting the
    /// buffer first), walk the cursor to the end, and emit a final line feed
    /// so the next prompt detaches cleanly.
    pub fn end_editing(&mut self, replacement: Option<Vec<String>>) -> Result<()> {
        self.update_full_view(move |ed| {
            if let Some(lines) = replacement {
                ed.replace_buffer(lines);
            }
        })?;
        let last = self.buffer.line_count() - 1;
        let end = self.buffer.char_len(last);
        self.move_cursor_to_unscrolled(end, last)?;
        core_term::line_feed(&mut self.out)?;
        self.out.flush()?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    /// The whole expression, lines joined with line feeds.
    pub fn expression(&mut self) -> &str {
        let buffer = &self.buffer;
        self.expression_cache.get_or_insert_with(|| buffer.join())
    }

    pub fn lines(&self) -> &[String] {
        self.buffer.lines()
    }

    /// Logical cursor as `(x, y)`.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor.x, self.cursor.y)
    }

    pub fn cursor_on_last_line(&self) -> bool {
        self.cursor.y + 1 == self.buffer.line_count()
    }

    pub fn current_line(&self) -> &str {
        self.buffer.line(self.cursor.y).unwrap_or_default()
    }

    pub fn previous_line(&self) -> Option<&str> {
        self.cursor.y.checked_sub(1).and_then(|y| self.buffer.line(y))
    }

    pub fn next_line(&self) -> Option<&str> {
        self.buffer.line(self.cursor.y + 1)
    }

    /// Everything before the cursor, line feeds included.
    pub fn expression_before_cursor(&self) -> String {
        self.buffer.join_until(self.cursor.x, self.cursor.y)
    }

    /// Everything before an explicit position.
    pub fn expression_before(&self, x: usize, y: usize) -> String {
        self.buffer.join_until(x, y)
    }

    /// Visual rows hidden below the viewport's bottom anchor.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Rows the header occupied on its last draw.
    pub fn header_height(&self) -> usize {
        self.header_height
    }

    // ------------------------------------------------------------------
    // Internal plumbing shared by the submodules
    // ------------------------------------------------------------------

    pub(crate) fn width(&self) -> usize {
        self.width_override
            .unwrap_or_else(|| self.size.size().0 as usize)
            .max(1)
    }

    pub(crate) fn height(&self) -> usize {
        self.height_override
            .unwrap_or_else(|| self.size.size().1 as usize)
            .max(1)
    }

    pub(crate) fn metrics(&self) -> core_layout::WrapMetrics {
        core_layout::WrapMetrics::new(self.prompt_width, self.width())
    }

    /// Below the width floor the layout arithmetic is meaningless: painting
    /// is refused and navigation is inert until the terminal widens.
    pub(crate) fn narrow_terminal(&self) -> bool {
        let m = self.metrics();
        m.width <= m.prompt
    }

    pub(crate) fn refresh_prompt_width(&mut self) {
        self.prompt_width = visible_width(&(self.prompt)(0, false));
    }

    fn invalidate_caches(&mut self) {
        self.expression_cache = None;
        self.height_cache = None;
        self.colorized_cache = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_term::FixedSize;

    fn editor() -> Editor<Vec<u8>, FixedSize> {
        Editor::new(
            Vec::new(),
            FixedSize(80, 24),
            Box::new(|_, _| "> ".to_string()),
        )
    }

    #[test]
    fn getters_on_a_fresh_editor() {
        let mut ed = editor();
        assert_eq!(ed.lines(), [""]);
        assert_eq!(ed.cursor(), (0, 0));
        assert!(ed.cursor_on_last_line());
        assert_eq!(ed.expression(), "");
        assert_eq!(ed.previous_line(), None);
        assert_eq!(ed.next_line(), None);
    }

    #[test]
    fn neighbors_around_the_cursor() {
        let mut ed = editor();
        ed.update(|e| {
            e.insert_str("ab");
            e.insert_new_line(0);
            e.insert_str("cd");
            e.insert_new_line(0);
            e.insert_str("ef");
        })
        .unwrap();
        ed.update(|e| e.cursor = Cursor::new(0, 1)).unwrap();
        assert_eq!(ed.current_line(), "cd");
        assert_eq!(ed.previous_line(), Some("ab"));
        assert_eq!(ed.next_line(), Some("ef"));
        assert!(!ed.cursor_on_last_line());
    }

    #[test]
    fn prompt_width_comes_from_the_uncolored_prompt() {
        let ed: Editor<Vec<u8>, FixedSize> = Editor::new(
            Vec::new(),
            FixedSize(40, 10),
            Box::new(|_, colored| {
                if colored {
                    "\x1b[32m>> \x1b[0m".to_string()
                } else {
                    ">> ".to_string()
                }
            }),
        );
        assert_eq!(ed.prompt_width, 3);
    }
}
