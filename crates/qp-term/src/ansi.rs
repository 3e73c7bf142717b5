// SPDX-License-Identifier: MIT
//
// Byte-level escape encoding.
//
// Pure functions that write escape sequences to any `impl Write`. No state
// and no decisions about when to emit; the `CellWriter` makes those. This
// module just knows the byte-level encoding of the handful of commands a canvas
// needs: absolute cursor addressing, palette foregrounds, screen clear and
// SGR reset.
//
// Cell coordinates are 0-based everywhere in qpix. CUP wants 1-based ones,
// so `cursor_to` adds one on the way out.
use std::io::{self, Write};

use crate::color::PaletteColor;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Put the cursor on cell `(x, y)` with CUP (`ESC [ row ; col H`).
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// SGR 0: back to the terminal's default attributes.
///
/// This drops the foreground color too. The stateful renderer must forget
/// its tracked color after calling this.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Foreground Color ────────────────────────────────────────────────────────

/// Set the foreground color to a palette entry.
#[inline]
pub fn fg(w: &mut impl Write, color: PaletteColor) -> io::Result<()> {
    write!(w, "\x1b[{}m", color.sgr())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Bytes one encoder writes, as text.
    fn emit<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_position() {
        assert_eq!(emit(|w| cursor_to(w, 10, 20)), "\x1b[21;11H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        let s = emit(|w| cursor_to(w, u16::MAX, u16::MAX));
        assert_eq!(s, "\x1b[65536;65536H");
    }

    #[test]
    fn cursor_visibility_sequences() {
        assert_eq!(emit(|w| cursor_hide(w)), "\x1b[?25l");
        assert_eq!(emit(|w| cursor_show(w)), "\x1b[?25h");
    }

    // ── Screen ──────────────────────────────────────────────────────────

    #[test]
    fn clear_screen_sequence() {
        assert_eq!(emit(|w| clear_screen(w)), "\x1b[2J");
    }

    #[test]
    fn reset_sequence() {
        assert_eq!(emit(|w| reset(w)), "\x1b[0m");
    }

    // ── Foreground Color ────────────────────────────────────────────────

    #[test]
    fn fg_red() {
        assert_eq!(emit(|w| fg(w, PaletteColor::Red)), "\x1b[0;31m");
    }

    #[test]
    fn fg_white_is_bright() {
        assert_eq!(emit(|w| fg(w, PaletteColor::White)), "\x1b[0;97m");
    }

    // ── Composition ─────────────────────────────────────────────────────

    #[test]
    fn multiple_sequences_compose() {
        let mut buf = Vec::new();
        clear_screen(&mut buf).unwrap();
        cursor_to(&mut buf, 5, 3).unwrap();
        fg(&mut buf, PaletteColor::Cyan).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert_eq!(s, "\x1b[2J\x1b[4;6H\x1b[0;36m");
    }
}
