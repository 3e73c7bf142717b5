// SPDX-License-Identifier: MIT
//
// The fixed foreground palette.
//
// A cell has four bits of color storage, so the palette is a closed table of
// nine named colors indexed 1–9. Index 0 means "no explicit color": the cell
// is drawn in whatever foreground the terminal currently has.
//
// Each color knows its SGR parameter string. The renderer writes these as
// `ESC[<params>m`; nothing here touches a writer.

use std::fmt;
use std::str::FromStr;

// ─── PaletteColor ────────────────────────────────────────────────────────────

/// One of the nine drawable foreground colors.
///
/// The discriminant is the palette index stored in a cell's high nibble.
///
/// ```
/// use qp_term::color::PaletteColor;
///
/// assert_eq!(PaletteColor::Red.index(), 2);
/// assert_eq!(PaletteColor::from_index(2), Some(PaletteColor::Red));
/// assert_eq!(PaletteColor::from_index(0), None);
/// assert_eq!("cyan".parse::<PaletteColor>(), Ok(PaletteColor::Cyan));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PaletteColor {
    Black = 1,
    Red = 2,
    Green = 3,
    Brown = 4,
    Blue = 5,
    Magenta = 6,
    Cyan = 7,
    Grey = 8,
    White = 9,
}

impl PaletteColor {
    /// Every palette entry in index order.
    pub const ALL: [Self; 9] = [
        Self::Black,
        Self::Red,
        Self::Green,
        Self::Brown,
        Self::Blue,
        Self::Magenta,
        Self::Cyan,
        Self::Grey,
        Self::White,
    ];

    /// Palette index (1–9) stored in a cell's color nibble.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Resolve a palette index back to a color.
    ///
    /// Returns `None` for 0 (unset) and for indices past the table.
    #[must_use]
    pub const fn from_index(idx: u8) -> Option<Self> {
        match idx {
            1 => Some(Self::Black),
            2 => Some(Self::Red),
            3 => Some(Self::Green),
            4 => Some(Self::Brown),
            5 => Some(Self::Blue),
            6 => Some(Self::Magenta),
            7 => Some(Self::Cyan),
            8 => Some(Self::Grey),
            9 => Some(Self::White),
            _ => None,
        }
    }

    /// SGR parameters selecting this color (normal intensity).
    #[must_use]
    pub const fn sgr(self) -> &'static str {
        match self {
            Self::Black => "0;30",
            Self::Red => "0;31",
            Self::Green => "0;32",
            Self::Brown => "0;33",
            Self::Blue => "0;34",
            Self::Magenta => "0;35",
            Self::Cyan => "0;36",
            Self::Grey => "0;37",
            Self::White => "0;97",
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Brown => "brown",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::Grey => "grey",
            Self::White => "white",
        }
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a color name is not in the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown palette color {:?}", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for PaletteColor {
    type Err = UnknownColor;

    /// Parse a color name, case-insensitively. `gray` is accepted for `grey`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "gray" {
            return Ok(Self::Grey);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
