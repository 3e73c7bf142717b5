// SPDX-License-Identifier: MIT
//
// PackedCell — one terminal character holding four sub-pixels and a color.
//
// A character cell is split into a 2×2 grid of sub-pixels. The whole cell
// fits in one byte:
//
//   ┌────────────────┬────────────────┐
//   │ bits 7..4      │ bits 3..0      │
//   │ palette index  │ quadrant mask  │
//   └────────────────┴────────────────┘
//
// Mask bits, for sub-pixel (bx, by) inside the cell:
//
//   ┌──────┬──────┐
//   │ 1000 │ 0100 │   by = 0
//   ├──────┼──────┤
//   │ 0010 │ 0001 │   by = 1
//   └──────┴──────┘
//    bx = 0  bx = 1
//
// i.e. bit `(1 - by) * 2 + (1 - bx)`. The 4-bit mask indexes straight into
// the table of Unicode quadrant block glyphs.
//
// Color is per cell, not per sub-pixel. A palette index of 0 leaves the
// terminal's current foreground in effect.

use crate::color::PaletteColor;

// ─── Quadrant ────────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// The four sub-pixels of a cell.
    ///
    /// ```
    /// use qp_term::cell::Quadrant;
    ///
    /// assert_eq!(Quadrant::at(0, 0), Quadrant::TOP_LEFT);
    /// assert_eq!(Quadrant::at(3, 5), Quadrant::BOTTOM_RIGHT);
    /// assert_eq!((Quadrant::TOP_LEFT | Quadrant::BOTTOM_RIGHT).glyph(), '▚');
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Quadrant: u8 {
        const BOTTOM_RIGHT = 0b0001;
        const BOTTOM_LEFT  = 0b0010;
        const TOP_RIGHT    = 0b0100;
        const TOP_LEFT     = 0b1000;
    }
}

/// Quadrant block glyph for every 4-bit mask.
pub const GLYPHS: [char; 16] = [
    ' ', '▗', '▖', '▄', '▝', '▐', '▞', '▟', '▘', '▚', '▌', '▙', '▀', '▜', '▛', '█',
];

impl Quadrant {
    /// The sub-pixel that pixel `(px, py)` falls on within its cell.
    ///
    /// Uses Euclidean remainder so negative coordinates still map to a
    /// quadrant; bounds checks are the grid's business.
    #[inline]
    #[must_use]
    pub const fn at(px: i32, py: i32) -> Self {
        let bx = px.rem_euclid(2);
        let by = py.rem_euclid(2);
        Self::from_bits_truncate(1u8 << ((1 - by) * 2 + (1 - bx)))
    }

    /// Quadrant block glyph for this mask.
    #[inline]
    #[must_use]
    pub const fn glyph(self) -> char {
        GLYPHS[self.bits() as usize]
    }
}

// ─── PackedCell ──────────────────────────────────────────────────────────────

/// One cell's sub-pixel mask and palette index, packed into a byte.
///
/// ```
/// use qp_term::cell::{PackedCell, Quadrant};
/// use qp_term::color::PaletteColor;
///
/// let cell = PackedCell::EMPTY
///     .with_mask(Quadrant::TOP_LEFT | Quadrant::TOP_RIGHT)
///     .with_color(Some(PaletteColor::Green));
/// assert_eq!(cell.glyph(), '▀');
/// assert_eq!(cell.color(), Some(PaletteColor::Green));
/// assert_eq!(cell.bits(), 0x3C);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct PackedCell(u8);

const MASK_BITS: u8 = 0b0000_1111;
const COLOR_BITS: u8 = 0b1111_0000;

impl PackedCell {
    /// No sub-pixels lit, no color.
    pub const EMPTY: Self = Self(0);

    /// All four sub-pixels lit, no color.
    pub const FULL: Self = Self(MASK_BITS);

    /// Wrap a raw cell byte.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw cell byte.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Lit sub-pixels.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> Quadrant {
        Quadrant::from_bits_truncate(self.0 & MASK_BITS)
    }

    /// Raw palette index nibble (0 = unset).
    #[inline]
    #[must_use]
    pub const fn color_index(self) -> u8 {
        (self.0 & COLOR_BITS) >> 4
    }

    /// Palette color, if the nibble names one.
    #[inline]
    #[must_use]
    pub const fn color(self) -> Option<PaletteColor> {
        PaletteColor::from_index(self.color_index())
    }

    /// Whether no sub-pixel is lit.
    #[inline]
    #[must_use]
    pub const fn is_blank(self) -> bool {
        self.0 & MASK_BITS == 0
    }

    /// Replace the mask, keeping the color.
    #[inline]
    #[must_use]
    pub const fn with_mask(self, mask: Quadrant) -> Self {
        Self((self.0 & COLOR_BITS) | mask.bits())
    }

    /// OR extra sub-pixels into the mask.
    #[inline]
    #[must_use]
    pub const fn lit(self, mask: Quadrant) -> Self {
        Self(self.0 | mask.bits())
    }

    /// Replace the color nibble. `None` writes index 0.
    #[inline]
    #[must_use]
    pub const fn with_color(self, color: Option<PaletteColor>) -> Self {
        let idx = match color {
            Some(c) => c.index(),
            None => 0,
        };
        Self((self.0 & MASK_BITS) | (idx << 4))
    }

    /// Quadrant block glyph for this cell's mask.
    #[inline]
    #[must_use]
    pub const fn glyph(self) -> char {
        self.mask().glyph()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quadrant_positions() {
        assert_eq!(Quadrant::at(0, 0), Quadrant::TOP_LEFT);
        assert_eq!(Quadrant::at(1, 0), Quadrant::TOP_RIGHT);
        assert_eq!(Quadrant::at(0, 1), Quadrant::BOTTOM_LEFT);
        assert_eq!(Quadrant::at(1, 1), Quadrant::BOTTOM_RIGHT);
    }

    #[test]
    fn quadrant_depends_only_on_parity() {
        assert_eq!(Quadrant::at(10, 20), Quadrant::at(0, 0));
        assert_eq!(Quadrant::at(7, 9), Quadrant::at(1, 1));
    }

    #[test]
    fn quadrant_negative_coords_use_euclidean_parity() {
        assert_eq!(Quadrant::at(-1, -1), Quadrant::BOTTOM_RIGHT);
        assert_eq!(Quadrant::at(-2, 0), Quadrant::TOP_LEFT);
    }

    #[test]
    fn glyph_table_edges() {
        assert_eq!(Quadrant::empty().glyph(), ' ');
        assert_eq!(Quadrant::all().glyph(), '█');
        assert_eq!(Quadrant::TOP_LEFT.glyph(), '▘');
        assert_eq!(Quadrant::BOTTOM_RIGHT.glyph(), '▗');
    }

    #[test]
    fn glyph_table_halves() {
        assert_eq!((Quadrant::TOP_LEFT | Quadrant::BOTTOM_LEFT).glyph(), '▌');
        assert_eq!((Quadrant::TOP_RIGHT | Quadrant::BOTTOM_RIGHT).glyph(), '▐');
        assert_eq!((Quadrant::BOTTOM_LEFT | Quadrant::BOTTOM_RIGHT).glyph(), '▄');
        assert_eq!((Quadrant::TOP_LEFT | Quadrant::TOP_RIGHT).glyph(), '▀');
    }

    #[test]
    fn glyphs_are_distinct() {
        for (i, a) in GLYPHS.iter().enumerate() {
            for b in &GLYPHS[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn lit_accumulates_and_keeps_color() {
        let cell = PackedCell::EMPTY
            .with_color(Some(PaletteColor::Blue))
            .lit(Quadrant::TOP_LEFT)
            .lit(Quadrant::BOTTOM_RIGHT)
            .lit(Quadrant::TOP_LEFT);
        assert_eq!(cell.mask(), Quadrant::TOP_LEFT | Quadrant::BOTTOM_RIGHT);
        assert_eq!(cell.color(), Some(PaletteColor::Blue));
    }

    #[test]
    fn with_color_none_clears_nibble() {
        let cell = PackedCell::FULL.with_color(Some(PaletteColor::White));
        assert_eq!(cell.bits(), 0x9F);
        let cell = cell.with_color(None);
        assert_eq!(cell, PackedCell::FULL);
        assert_eq!(cell.color(), None);
    }

    #[test]
    fn with_mask_keeps_color() {
        let cell = PackedCell::from_bits(0x2F).with_mask(Quadrant::TOP_RIGHT);
        assert_eq!(cell.bits(), 0x24);
    }

    #[test]
    fn out_of_palette_nibble_has_no_color() {
        let cell = PackedCell::from_bits(0xF3);
        assert_eq!(cell.color_index(), 15);
        assert_eq!(cell.color(), None);
        assert_eq!(cell.glyph(), '▄');
    }

    #[test]
    fn blank_ignores_color() {
        assert!(PackedCell::EMPTY.with_color(Some(PaletteColor::Red)).is_blank());
        assert!(!PackedCell::FULL.is_blank());
    }
}
