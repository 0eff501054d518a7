//! Terminal adapter: CSI emission into a generic sink, size providers, and
//! restore guards.
//!
//! The control vocabulary is deliberately small: hide/show cursor, relative
//! motion, absolute row/column jumps, clear to end of line, clear screen
//! down, and a line feed. Nothing else is ever emitted, which keeps the
//! escape stream easy to reason about (and to assert on in tests).
//!
//! All emitters queue onto whatever `io::Write` the caller hands in; the
//! caller decides when to flush. `line_feed` writes `\r\n` because the host
//! runs the terminal raw, where a bare `\n` would not return the carriage.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveDown, MoveLeft, MoveRight, MoveToColumn, MoveToRow, MoveUp, Show},
    queue,
    terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode},
};
use std::io::Write;

/// Source of the current terminal dimensions, queried on every use so a
/// resize between calls is picked up without any event plumbing.
pub trait TermSize {
    /// `(columns, rows)`.
    fn size(&self) -> (u16, u16);
}

/// Live terminal dimensions via crossterm, with a conventional fallback when
/// the query fails (not a tty).
pub struct HostSize;

impl TermSize for HostSize {
    fn size(&self) -> (u16, u16) {
        crossterm::terminal::size().unwrap_or((80, 24))
    }
}

/// Fixed dimensions for tests and overrides.
#[derive(Debug, Clone, Copy)]
pub struct FixedSize(pub u16, pub u16);

impl TermSize for FixedSize {
    fn size(&self) -> (u16, u16) {
        (self.0, self.1)
    }
}

pub fn hide_cursor<W: Write>(out: &mut W) -> Result<()> {
    queue!(out, Hide)?;
    Ok(())
}

pub fn show_cursor<W: Write>(out: &mut W) -> Result<()> {
    queue!(out, Show)?;
    Ok(())
}

/// Relative cursor motion. Positive `dx` moves right, positive `dy` moves
/// down; zero components emit nothing.
pub fn move_rel<W: Write>(out: &mut W, dx: i32, dy: i32) -> Result<()> {
    if dx > 0 {
        queue!(out, MoveRight(dx as u16))?;
    } else if dx < 0 {
        queue!(out, MoveLeft((-dx) as u16))?;
    }
    if dy > 0 {
        queue!(out, MoveDown(dy as u16))?;
    } else if dy < 0 {
        queue!(out, MoveUp((-dy) as u16))?;
    }
    Ok(())
}

/// Jump to an absolute row (0-based), keeping the column.
pub fn move_to_row<W: Write>(out: &mut W, row: u16) -> Result<()> {
    queue!(out, MoveToRow(row))?;
    Ok(())
}

/// Jump to an absolute column (0-based), keeping the row.
pub fn move_to_column<W: Write>(out: &mut W, col: u16) -> Result<()> {
    queue!(out, MoveToColumn(col))?;
    Ok(())
}

pub fn clear_line_after<W: Write>(out: &mut W) -> Result<()> {
    queue!(out, Clear(ClearType::UntilNewLine))?;
    Ok(())
}

pub fn clear_screen_down<W: Write>(out: &mut W) -> Result<()> {
    queue!(out, Clear(ClearType::FromCursorDown))?;
    Ok(())
}

/// Advance one row and return to column 0.
pub fn line_feed<W: Write>(out: &mut W) -> Result<()> {
    out.write_all(b"\r\n")?;
    Ok(())
}

/// Emits a show-cursor sequence to the real terminal on drop, so the cursor
/// comes back even when the owner unwinds mid-paint. Acquired once per editor.
#[derive(Debug, Default)]
pub struct CursorRestoreGuard;

impl CursorRestoreGuard {
    pub fn new() -> Self {
        Self
    }
}

impl Drop for CursorRestoreGuard {
    fn drop(&mut self) {
        let _ = crossterm::execute!(std::io::stdout(), Show);
    }
}

/// RAII raw-mode session for the host binary.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self { active: true })
    }

    pub fn leave(&mut self) -> Result<()> {
        if self.active {
            disable_raw_mode()?;
            self.active = false;
        }
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
