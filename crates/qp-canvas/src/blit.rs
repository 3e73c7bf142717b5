// SPDX-License-Identifier: MIT
//
// Cell-level compositing between pixel grids.
//
// A blit copies a rectangle of cells from a source grid into a destination
// grid. Positions, offsets and sizes are given in pixels like every other
// drawing call and floored to whole cells, since a cell's four quadrants
// travel together with its color nibble.
//
// Copying is row-major, one cell at a time. When source and destination are
// the same grid and the regions overlap, later reads see earlier writes;
// `safe` snapshots the source region into a scratch grid first so the copy
// reads the pre-blit state.
//
// Source cells outside the source grid read as empty. Destination cells
// outside the destination grid are skipped.

use log::trace;
use qp_term::cell::PackedCell;
use qp_term::grid::PixelGrid;

// ─── Options ────────────────────────────────────────────────────────────────

/// How a source cell combines with the destination cell it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Destination becomes the source cell, mask and color.
    #[default]
    Overwrite,
    /// Quadrant masks are ORed. The source color wins when it has one,
    /// otherwise the destination keeps its own.
    Merge,
}

impl MergePolicy {
    /// Combine `src` onto `dest`.
    #[must_use]
    pub const fn combine(self, dest: PackedCell, src: PackedCell) -> PackedCell {
        match self {
            Self::Overwrite => src,
            Self::Merge => {
                let merged = dest.lit(src.mask());
                if src.color_index() == 0 {
                    merged
                } else {
                    merged.with_color(src.color())
                }
            }
        }
    }
}

/// Parameters of one blit. All lengths in pixels.
///
/// ```
/// use qp_canvas::blit::{BlitOptions, MergePolicy};
///
/// let opts = BlitOptions::default()
///     .offset(4, 0)
///     .size(10, 6)
///     .policy(MergePolicy::Merge);
/// assert_eq!(opts.source_size, Some((10, 6)));
/// assert!(!opts.safe);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlitOptions {
    /// Top-left of the copied region in the source.
    pub source_offset: (i32, i32),
    /// Size of the copied region. `None` copies the whole source.
    pub source_size: Option<(i32, i32)>,
    pub policy: MergePolicy,
    /// Snapshot the source region before writing.
    pub safe: bool,
}

impl BlitOptions {
    #[must_use]
    pub const fn offset(mut self, x: i32, y: i32) -> Self {
        self.source_offset = (x, y);
        self
    }

    #[must_use]
    pub const fn size(mut self, width: i32, height: i32) -> Self {
        self.source_size = Some((width, height));
        self
    }

    #[must_use]
    pub const fn policy(mut self, policy: MergePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn safe(mut self) -> Self {
        self.safe = true;
        self
    }
}

// ─── Region ─────────────────────────────────────────────────────────────────

/// A blit resolved to cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Region {
    src: (i32, i32),
    dest: (i32, i32),
    cols: i32,
    rows: i32,
}

impl Region {
    fn resolve(x: i32, y: i32, source: &PixelGrid, opts: &BlitOptions) -> Self {
        let (w, h) = opts
            .source_size
            .unwrap_or((source.width(), source.height()));
        let max = i32::from(u16::MAX);
        Self {
            src: (
                opts.source_offset.0.div_euclid(2),
                opts.source_offset.1.div_euclid(2),
            ),
            dest: (x.div_euclid(2), y.div_euclid(2)),
            cols: w.div_euclid(2).clamp(0, max),
            rows: h.div_euclid(2).clamp(0, max),
        }
    }

    /// Copy the source side of this region into a fresh grid of its size.
    fn snapshot(&self, source: &PixelGrid) -> PixelGrid {
        // resolve() clamps both into u16 range.
        let cols = u16::try_from(self.cols).unwrap_or(u16::MAX);
        let rows = u16::try_from(self.rows).unwrap_or(u16::MAX);
        let mut scratch = PixelGrid::new(cols, rows);
        let from_scratch = Self {
            dest: (0, 0),
            ..*self
        };
        copy_cells(&mut scratch, from_scratch, MergePolicy::Overwrite, |_, cx, cy| {
            source.cell(cx, cy).unwrap_or(PackedCell::EMPTY)
        });
        scratch
    }
}

// ─── Operations ─────────────────────────────────────────────────────────────

/// Blit a region of `source` onto `dest` with its top-left at pixel `(x, y)`.
///
/// Returns the destination cells written, in write order.
pub fn blit(
    dest: &mut PixelGrid,
    x: i32,
    y: i32,
    source: &PixelGrid,
    opts: &BlitOptions,
) -> Vec<(u16, u16)> {
    let region = Region::resolve(x, y, source, opts);
    trace!("blit {region:?} policy={:?} safe={}", opts.policy, opts.safe);

    if opts.safe {
        let scratch = region.snapshot(source);
        return copy_from(dest, Region { src: (0, 0), ..region }, &scratch, opts.policy);
    }
    copy_from(dest, region, source, opts.policy)
}

/// Blit a region of `grid` onto itself.
///
/// Without `safe`, overlapping regions read cells this same call already
/// wrote, so a shift toward higher coordinates smears the first copied
/// row/column across the overlap.
pub fn blit_within(grid: &mut PixelGrid, x: i32, y: i32, opts: &BlitOptions) -> Vec<(u16, u16)> {
    let region = Region::resolve(x, y, grid, opts);
    trace!("blit_within {region:?} policy={:?} safe={}", opts.policy, opts.safe);

    if opts.safe {
        let scratch = region.snapshot(grid);
        return copy_from(grid, Region { src: (0, 0), ..region }, &scratch, opts.policy);
    }
    copy_cells(grid, region, opts.policy, |g, cx, cy| {
        g.cell(cx, cy).unwrap_or(PackedCell::EMPTY)
    })
}

fn copy_from(
    dest: &mut PixelGrid,
    region: Region,
    source: &PixelGrid,
    policy: MergePolicy,
) -> Vec<(u16, u16)> {
    copy_cells(dest, region, policy, |_, cx, cy| {
        source.cell(cx, cy).unwrap_or(PackedCell::EMPTY)
    })
}

/// Walk `region` row-major (rows outer, columns inner), combining
/// `read(dest, src_cx, src_cy)` into each in-range destination cell.
fn copy_cells(
    dest: &mut PixelGrid,
    region: Region,
    policy: MergePolicy,
    mut read: impl FnMut(&PixelGrid, i32, i32) -> PackedCell,
) -> Vec<(u16, u16)> {
    let mut touched = Vec::new();
    for row in 0..region.rows {
        for col in 0..region.cols {
            let (dx, dy) = (region.dest.0 + col, region.dest.1 + row);
            let (Ok(cx), Ok(cy)) = (u16::try_from(dx), u16::try_from(dy)) else {
                continue;
            };
            let Some(existing) = dest.cell(dx, dy) else {
                continue;
            };
            let src = read(&*dest, region.src.0 + col, region.src.1 + row);
            dest.set_cell(dx, dy, policy.combine(existing, src));
            touched.push((cx, cy));
        }
    }
    touched
}

// ─── Tests ──────────────────────────────────────────────────────────────────
