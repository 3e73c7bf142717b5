// SPDX-License-Identifier: MIT
//
// PixelGrid — the packed sub-pixel store behind one canvas.
//
// Design:
//
//   - Flat `Vec<PackedCell>` with row-major indexing, one byte per cell.
//     Full repaints walk rows left to right, which is a linear scan.
//
//   - Pixel space is twice the cell space on each axis. Plotting ORs one
//     quadrant bit into the owning cell, so a lit sub-pixel stays lit until
//     the grid is cleared or the cell is overwritten wholesale.
//
//   - The drawing color travels in a `DrawContext` passed to every plot.
//     The grid keeps no "current color" of its own.
//
// Bounds: plot accepts `0..=width` × `0..=height` (inclusive upper bound).
// The extra column/row has no backing cell, so those writes are dropped
// after passing the range check. Negative coordinates are rejected.

use crate::cell::{PackedCell, Quadrant};
use crate::color::PaletteColor;

// ─── DrawContext ─────────────────────────────────────────────────────────────

/// Drawing state that plots carry with them.
///
/// ```
/// use qp_term::color::PaletteColor;
/// use qp_term::grid::DrawContext;
///
/// let plain = DrawContext::default();
/// assert_eq!(plain.active_color, None);
/// let red = plain.with_color(PaletteColor::Red);
/// assert_eq!(red.active_color, Some(PaletteColor::Red));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawContext {
    /// Color written into every cell a plot touches. `None` leaves the
    /// cell's existing color nibble alone.
    pub active_color: Option<PaletteColor>,
}

impl DrawContext {
    /// A context that draws in `color`.
    #[inline]
    #[must_use]
    pub const fn with_color(self, color: PaletteColor) -> Self {
        Self {
            active_color: Some(color),
        }
    }

    /// A context with no active color.
    #[inline]
    #[must_use]
    pub const fn uncolored() -> Self {
        Self { active_color: None }
    }
}

// ─── PixelGrid ───────────────────────────────────────────────────────────────

/// A `cols × rows` grid of packed cells addressed at 2× resolution.
///
/// # Examples
///
/// ```
/// use qp_term::grid::{DrawContext, PixelGrid};
///
/// let mut grid = PixelGrid::new(40, 12);
/// assert_eq!((grid.width(), grid.height()), (80, 24));
///
/// let touched = grid.plot(7, 3, DrawContext::default());
/// assert_eq!(touched, Some((3, 1)));
/// assert!(grid.get_point(7, 3));
/// assert!(!grid.get_point(6, 3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    cols: u16,
    rows: u16,
    cells: Vec<PackedCell>,
}

impl PixelGrid {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a zeroed grid of `cols × rows` character cells.
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        let size = usize::from(cols) * usize::from(rows);
        Self {
            cols,
            rows,
            cells: vec![PackedCell::EMPTY; size],
        }
    }

    // ─── Dimensions ──────────────────────────────────────────────────────

    /// Width in character cells.
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Height in character cells.
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Width in pixels (`2 * cols`).
    #[inline]
    #[must_use]
    pub fn width(&self) -> i32 {
        i32::from(self.cols) * 2
    }

    /// Height in pixels (`2 * rows`).
    #[inline]
    #[must_use]
    pub fn height(&self) -> i32 {
        i32::from(self.rows) * 2
    }

    // ─── Cell access ─────────────────────────────────────────────────────

    /// Flat index for an in-range cell.
    #[inline]
    fn index(&self, cx: i32, cy: i32) -> Option<usize> {
        let cx = u16::try_from(cx).ok()?;
        let cy = u16::try_from(cy).ok()?;
        if cx < self.cols && cy < self.rows {
            Some(usize::from(cy) * usize::from(self.cols) + usize::from(cx))
        } else {
            None
        }
    }

    /// The cell at `(cx, cy)`, or `None` outside the grid.
    #[inline]
    #[must_use]
    pub fn cell(&self, cx: i32, cy: i32) -> Option<PackedCell> {
        self.index(cx, cy).map(|i| self.cells[i])
    }

    /// Overwrite the cell at `(cx, cy)`. Returns `false` outside the grid.
    #[inline]
    pub fn set_cell(&mut self, cx: i32, cy: i32, cell: PackedCell) -> bool {
        match self.index(cx, cy) {
            Some(i) => {
                self.cells[i] = cell;
                true
            }
            None => false,
        }
    }

    /// Make `(cx, cy)` a full block in the context's color.
    ///
    /// With no active color the nibble is written as 0, as a bulk fill
    /// starts from a fresh cell rather than accumulating.
    pub fn fill_cell(&mut self, cx: i32, cy: i32, ctx: DrawContext) -> bool {
        self.set_cell(cx, cy, PackedCell::FULL.with_color(ctx.active_color))
    }

    /// All cells, row-major.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[PackedCell] {
        &self.cells
    }

    // ─── Pixels ──────────────────────────────────────────────────────────

    /// Light pixel `(x, y)`.
    ///
    /// Returns the cell that changed so the caller can redraw it, or `None`
    /// if the pixel was rejected by the range check or landed on the
    /// boundary column/row that has no backing cell.
    pub fn plot(&mut self, x: i32, y: i32, ctx: DrawContext) -> Option<(u16, u16)> {
        if x < 0 || y < 0 || x > self.width() || y > self.height() {
            return None;
        }

        let (cx, cy) = (x / 2, y / 2);
        let i = self.index(cx, cy)?;
        let mut cell = self.cells[i].lit(Quadrant::at(x, y));
        if ctx.active_color.is_some() {
            cell = cell.with_color(ctx.active_color);
        }
        self.cells[i] = cell;

        // index() succeeded, so both fit in u16.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let touched = (cx as u16, cy as u16);
        Some(touched)
    }

    /// Whether pixel `(x, y)` is lit. Anything outside the grid reads unlit.
    #[must_use]
    pub fn get_point(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.cell(x / 2, y / 2)
            .is_some_and(|c| c.mask().contains(Quadrant::at(x, y)))
    }

    /// Zero every cell, keeping dimensions.
    pub fn clear(&mut self) {
        self.cells.fill(PackedCell::EMPTY);
    }

    /// Iterate `(cx, cy, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, PackedCell)> + '_ {
        let cols = usize::from(self.cols.max(1));
        self.cells.iter().enumerate().map(move |(i, &cell)| {
            // i < cols * rows, both u16, so the quotients fit.
            #[allow(clippy::cast_possible_truncation)]
            let (cx, cy) = ((i % cols) as u16, (i / cols) as u16);
            (cx, cy, cell)
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
