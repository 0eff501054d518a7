//! Soft-wrap arithmetic and ANSI-aware line splitting.
//!
//! Everything here is pure: a logical line of `len` characters, prefixed by a
//! prompt of known printable width, is projected onto a terminal of finite
//! width. No I/O, no editor state.
//!
//! Guarantees:
//! * `height_of_len(len) == 1 + (prompt + len) / width`; a line whose last
//!   row is exactly full therefore occupies one extra, empty visual row (the
//!   position one past the last character lives at column 0 of that row).
//! * `last_row_width` and `row_of_col` locate any logical column on its
//!   visual row; applied to a full line length they describe the last row.
//! * `split_rows` produces exactly `height_of_len(visible chars)` fragments,
//!   one per visual row, carrying the active SGR color across wraps.
//!
//! Character model: one column per Unicode scalar. SGR escape sequences
//! (`ESC [ … m`) consume zero columns everywhere in this crate.

const SGR_RESET: &str = "\x1b[0m";

/// Wrap parameters for a prompt-prefixed logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapMetrics {
    /// Printable width of the prompt prefixing the line's first row.
    pub prompt: usize,
    /// Terminal width in columns. Never zero.
    pub width: usize,
}

impl WrapMetrics {
    pub fn new(prompt: usize, width: usize) -> Self {
        Self {
            prompt,
            width: width.max(1),
        }
    }

    /// Number of visual rows occupied by a line of `len` characters,
    /// including the empty trailing row left behind when the last row is
    /// exactly full.
    pub fn height_of_len(&self, len: usize) -> usize {
        1 + (self.prompt + len) / self.width
    }

    /// Column (0-based) at which logical column `col` lands on its visual
    /// row. Applied to the full line length this is the width of the last
    /// row; zero means the character before `col` filled its row completely.
    pub fn last_row_width(&self, col: usize) -> usize {
        (self.prompt + col) % self.width
    }

    /// Visual row (0-based, within the line) on which logical column `col`
    /// lands.
    pub fn row_of_col(&self, col: usize) -> usize {
        (self.prompt + col) / self.width
    }
}

/// Printable width of `s`, skipping SGR escape sequences.
pub fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            for e in chars.by_ref() {
                if e == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

/// Split a (possibly colorized) logical line into visual-row fragments.
///
/// Fragment `k` is the substring a terminal of `metrics.width` columns would
/// display on visual row `k` of the line once soft-wrapped after the prompt.
/// When a wrap happens while a color is active, the fragment is closed with a
/// reset and the next one reopens the color, so fragments can be painted in
/// isolation. A line whose last row is exactly full yields a final empty
/// fragment for the trailing row.
pub fn split_rows(line: &str, metrics: WrapMetrics) -> Vec<String> {
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut active: Option<String> = None;
    let mut col = metrics.prompt;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            let mut seq = String::from(c);
            for e in chars.by_ref() {
                seq.push(e);
                if e == 'm' {
                    break;
                }
            }
            current.push_str(&seq);
            active = if seq == SGR_RESET || seq == "\x1b[m" {
                None
            } else {
                Some(seq)
            };
            continue;
        }
        current.push(c);
        col += 1;
        if col == metrics.width {
            if active.is_some() {
                current.push_str(SGR_RESET);
            }
            let mut next = String::new();
            if let Some(color) = &active {
                next.push_str(color);
            }
            rows.push(std::mem::replace(&mut current, next));
            col = 0;
        }
    }
    rows.push(current);
    rows
}
