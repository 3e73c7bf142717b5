// SPDX-License-Identifier: MIT
//
// Terminal dimension probe.
//
// Safety: `get_size` uses `ioctl(TIOCGWINSZ)` and `is_tty` uses `isatty`.
// These are the standard POSIX interfaces for asking a terminal about
// itself; there is no safe alternative. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// A canvas asks once, at construction, how big the terminal is. Anything
// that goes wrong (not a TTY, piped output, a zero-sized window) collapses
// to the classic 80×24 so drawing always has a surface to land on.

// ─── Size ───────────────────────────────────────────────────────────────────

/// A terminal's extent, counted in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Columns.
    pub cols: u16,
    /// Rows.
    pub rows: u16,
}

/// Size used when the terminal cannot be measured.
pub const DEFAULT_SIZE: Size = Size { cols: 80, rows: 24 };

impl Size {
    /// Total number of cells (`cols × rows`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }

    /// Fill in whichever dimensions the caller left unset.
    ///
    /// Explicit values are used as given. Missing ones come from `probed`,
    /// and from [`DEFAULT_SIZE`] when the probe found nothing usable.
    ///
    /// ```
    /// use qp_term::terminal::{Size, DEFAULT_SIZE};
    ///
    /// let probed = Some(Size { cols: 120, rows: 40 });
    /// assert_eq!(Size::resolve(Some(10), None, probed), Size { cols: 10, rows: 40 });
    /// assert_eq!(Size::resolve(None, None, None), DEFAULT_SIZE);
    /// ```
    #[must_use]
    pub fn resolve(cols: Option<u16>, rows: Option<u16>, probed: Option<Size>) -> Self {
        let probed = probed.filter(|s| s.cols > 0 && s.rows > 0);
        Self {
            cols: cols.unwrap_or_else(|| probed.map_or(DEFAULT_SIZE.cols, |s| s.cols)),
            rows: rows.unwrap_or_else(|| probed.map_or(DEFAULT_SIZE.rows, |s| s.rows)),
        }
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Ask the terminal on stdout for its size with `TIOCGWINSZ`.
///
/// `None` when stdout isn't a terminal or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdout is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDOUT_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_area() {
        assert_eq!(Size { cols: 80, rows: 24 }.area(), 1920);
    }

    #[test]
    fn size_area_large() {
        let s = Size {
            cols: u16::MAX,
            rows: u16::MAX,
        };
        assert_eq!(s.area(), u32::from(u16::MAX) * u32::from(u16::MAX));
    }

    #[test]
    fn resolve_prefers_explicit_values() {
        let probed = Some(Size { cols: 200, rows: 60 });
        assert_eq!(
            Size::resolve(Some(30), Some(10), probed),
            Size { cols: 30, rows: 10 }
        );
    }

    #[test]
    fn resolve_uses_probe_per_dimension() {
        let probed = Some(Size { cols: 200, rows: 60 });
        assert_eq!(
            Size::resolve(None, Some(10), probed),
            Size { cols: 200, rows: 10 }
        );
    }

    #[test]
    fn resolve_falls_back_without_probe() {
        assert_eq!(Size::resolve(None, None, None), DEFAULT_SIZE);
        assert_eq!(
            Size::resolve(Some(5), None, None),
            Size { cols: 5, rows: 24 }
        );
    }

    #[test]
    fn resolve_ignores_zero_sized_probe() {
        let probed = Some(Size { cols: 0, rows: 50 });
        assert_eq!(Size::resolve(None, None, probed), DEFAULT_SIZE);
    }

    #[test]
    fn get_size_does_not_panic() {
        // Under `cargo test` stdout is usually captured, so either answer is fine.
        let _ = get_size();
    }

    #[test]
    fn is_tty_does_not_panic() {
        let _ = is_tty();
    }
}
