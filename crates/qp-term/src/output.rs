// SPDX-License-Identifier: MIT
//
// Escape batching and incremental cell output.
//
// Two pieces keep the byte count and syscall count of a drawing call low:
//
//   OutputBuffer — accumulates all ANSI bytes in memory so everything one
//   drawing call produces can go out in a single write() syscall.
//
//   CellWriter — tracks the terminal's cursor position and foreground color
//   and skips redundant escape sequences. If the last cell drawn was directly
//   to the left of this one, the terminal cursor is already in place and we
//   just output the glyph. If the cell's color is the one already active, no
//   SGR goes out.
//
// A canvas redraws cells one at a time as pixels land, so a horizontal run
// of plots typically costs one cursor move and one color change in total.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::ansi;
use crate::cell::PackedCell;
use crate::color::PaletteColor;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// Pending escape bytes for one drawing call, written out in one go.
///
/// Default capacity: 4 KB. A drawing call touches at most a few hundred
/// cells, each costing a glyph and maybe a cursor move.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 4096;

impl OutputBuffer {
    /// Create an empty buffer with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Pending bytes, not yet flushed.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Write a character as UTF-8.
    pub fn write_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    /// Clear the buffer for reuse (keeps allocated capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Hand the pending bytes to `w`, flush it, and start over empty.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer keeps its
    /// contents in that case.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // No-op. Real flushing goes through flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Draws cells while remembering where the cursor is and which color is set.
///
/// # What gets skipped
///
/// - **Cursor**: Skipped when the next cell is at `(last_x + 1, last_y)`,
///   since the terminal auto-advances after character output.
/// - **Color**: A cell with a palette color emits SGR only if that color is
///   not already the tracked foreground. A cell without one emits nothing
///   and inherits whatever the terminal has.
#[allow(clippy::struct_field_names)] // The `last_` prefix IS the semantic grouping.
pub struct CellWriter {
    last_x: i32,
    last_y: i32,
    last_fg: Option<PaletteColor>,
}

impl CellWriter {
    /// Create a writer with no tracked state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
        }
    }

    /// Forget the cursor and color. Needed after the screen was cleared.
    #[allow(clippy::missing_const_for_fn)] // *self = Self::new() isn't const-evaluable.
    pub fn reset_state(&mut self) {
        *self = Self::new();
    }

    /// Cell the terminal cursor was last left after, if known.
    #[must_use]
    pub const fn last_position(&self) -> Option<(i32, i32)> {
        if self.last_y < 0 {
            None
        } else {
            Some((self.last_x, self.last_y))
        }
    }

    /// Foreground the terminal is believed to be using.
    #[must_use]
    pub const fn current_fg(&self) -> Option<PaletteColor> {
        self.last_fg
    }

    /// Render cell `(x, y)`, emitting only the escape sequences needed.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: PackedCell) {
        let xi = i32::from(x);
        let yi = i32::from(y);

        // ── Cursor ──
        // The terminal advanced past the previous glyph; adjacent cells need no CUP.
        if yi != self.last_y || xi != self.last_x + 1 {
            ansi::cursor_to(out, x, y).ok();
        }

        // ── Color ──
        if let Some(color) = cell.color() {
            self.apply_fg(out, color);
        }

        // ── Glyph ──
        out.write_char(cell.glyph());

        self.last_x = xi;
        self.last_y = yi;
    }

    /// Switch the terminal foreground to `color` unless it's already active.
    pub fn apply_fg(&mut self, out: &mut OutputBuffer, color: PaletteColor) {
        if self.last_fg != Some(color) {
            ansi::fg(out, color).ok();
            self.last_fg = Some(color);
        }
    }

    /// Emit SGR reset, returning the terminal to its default foreground.
    pub fn reset_fg(&mut self, out: &mut OutputBuffer) {
        ansi::reset(out).ok();
        self.last_fg = None;
    }

    /// Move the cursor to cell `(x, y)` and remember that it's there.
    ///
    /// The next [`render_cell`](Self::render_cell) at `(x, y)` then needs no
    /// positioning of its own.
    pub fn move_to(&mut self, out: &mut OutputBuffer, x: u16, y: u16) {
        ansi::cursor_to(out, x, y).ok();
        self.last_x = i32::from(x) - 1;
        self.last_y = i32::from(y);
    }

    /// Write raw text at the current cursor and advance the tracked column
    /// by its display width.
    pub fn write_text(&mut self, out: &mut OutputBuffer, text: &str) {
        out.buf.extend_from_slice(text.as_bytes());
        let width = i32::try_from(text.width()).unwrap_or(i32::MAX);
        self.last_x = self.last_x.saturating_add(width);
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
