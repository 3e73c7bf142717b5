// SPDX-License-Identifier: MIT
//
// Pixel fonts and text layout.
//
// A font is a glyph table per integer size: character code → advance width
// plus a list of lit pixel offsets. Tables come from a `GlyphSource` (by
// default a directory of `font_<size>.json` files) and are cached by the
// canvas that asked for them, loaded on first use and kept for its lifetime.
//
// Asset format, one JSON object per size:
//
//   { "65": { "width": 4, "data": "0a1b2c..." }, ... }
//
// Keys are decimal character codes. Every two hex digits of `data` are one
// lit pixel, packed as `(dx << 4) | dy` relative to the glyph origin.
//
// Layout advances a pen by `width + 2` per glyph. Characters the table does
// not have are skipped without a trace.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::debug;
use serde::Deserialize;

use crate::error::{CanvasError, Result};
use crate::geometry::Point;

/// Pixels between adjacent glyphs.
pub const GLYPH_SPACING: i32 = 2;

/// Font size used when the caller doesn't pick one.
pub const DEFAULT_FONT_SIZE: u8 = 5;

// ─── Glyph ──────────────────────────────────────────────────────────────────

/// One character's bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Advance width in pixels, not counting inter-glyph spacing.
    pub width: u16,
    /// Lit pixels as `(dx, dy)` from the glyph origin.
    pub offsets: Vec<(u8, u8)>,
}

impl Glyph {
    /// Decode packed hex pixel data.
    fn decode(width: u16, data: &str) -> std::result::Result<Self, &'static str> {
        let bytes = data.as_bytes();
        if bytes.len() % 2 != 0 {
            return Err("pixel data has an odd number of hex digits");
        }
        let offsets = bytes
            .chunks_exact(2)
            .map(|pair| {
                let hi = hex_digit(pair[0]).ok_or("pixel data is not hex")?;
                let lo = hex_digit(pair[1]).ok_or("pixel data is not hex")?;
                Ok((hi, lo))
            })
            .collect::<std::result::Result<Vec<_>, &'static str>>()?;
        Ok(Self { width, offsets })
    }
}

const fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

// ─── GlyphTable ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawGlyph {
    width: u16,
    data: String,
}

/// All glyphs of one font size, keyed by character code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: HashMap<u32, Glyph>,
}

impl GlyphTable {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON glyph table for font `size`.
    ///
    /// # Errors
    ///
    /// [`CanvasError::FontParse`] if the text is not a JSON object of
    /// `{width, data}` entries, [`CanvasError::InvalidGlyph`] if a key is not
    /// a character code or a glyph's pixel data is not hex byte pairs.
    pub fn from_json(size: u8, json: &str) -> Result<Self> {
        let raw: HashMap<String, RawGlyph> =
            serde_json::from_str(json).map_err(|source| CanvasError::FontParse { size, source })?;

        let mut glyphs = HashMap::with_capacity(raw.len());
        for (key, entry) in raw {
            let Ok(code) = key.parse::<u32>() else {
                return Err(CanvasError::InvalidGlyph {
                    size,
                    key,
                    reason: "key is not a decimal character code",
                });
            };
            match Glyph::decode(entry.width, &entry.data) {
                Ok(glyph) => {
                    glyphs.insert(code, glyph);
                }
                Err(reason) => return Err(CanvasError::InvalidGlyph { size, key, reason }),
            }
        }
        Ok(Self { glyphs })
    }

    /// Add or replace the glyph for `ch`.
    pub fn insert(&mut self, ch: char, glyph: Glyph) {
        self.glyphs.insert(u32::from(ch), glyph);
    }

    /// Glyph for `ch`, if the font has one.
    #[inline]
    #[must_use]
    pub fn get(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&u32::from(ch))
    }

    /// Number of glyphs.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the table has no glyphs at all.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

// ─── Sources ────────────────────────────────────────────────────────────────

/// Where glyph tables come from.
pub trait GlyphSource {
    /// Produce the glyph table for font `size`.
    ///
    /// # Errors
    ///
    /// A missing or unreadable asset is an error, never an empty table.
    fn load(&self, size: u8) -> Result<GlyphTable>;
}

/// Glyph tables stored as `font_<size>.json` in one directory.
#[derive(Debug, Clone)]
pub struct FontDir {
    root: PathBuf,
}

impl FontDir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Asset path for `size`.
    #[must_use]
    pub fn path_for(&self, size: u8) -> PathBuf {
        self.root.join(format!("font_{size}.json"))
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl GlyphSource for FontDir {
    fn load(&self, size: u8) -> Result<GlyphTable> {
        let path = self.path_for(size);
        let json = std::fs::read_to_string(&path)
            .map_err(|source| CanvasError::FontLoad { size, path, source })?;
        GlyphTable::from_json(size, &json)
    }
}

// ─── FontCache ──────────────────────────────────────────────────────────────

/// Lazily loaded glyph tables, one per size, kept until the cache is dropped.
pub struct FontCache {
    source: Rc<dyn GlyphSource>,
    tables: HashMap<u8, GlyphTable>,
}

impl FontCache {
    #[must_use]
    pub fn new(source: Rc<dyn GlyphSource>) -> Self {
        Self {
            source,
            tables: HashMap::new(),
        }
    }

    /// The source this cache loads from.
    #[must_use]
    pub fn source(&self) -> Rc<dyn GlyphSource> {
        Rc::clone(&self.source)
    }

    /// Whether `size` has already been loaded.
    #[must_use]
    pub fn is_loaded(&self, size: u8) -> bool {
        self.tables.contains_key(&size)
    }

    /// The table for `size`, loading it on first request.
    ///
    /// # Errors
    ///
    /// Propagates the source's load error. A failed load is not cached, so
    /// the next request tries again.
    pub fn get_or_load(&mut self, size: u8) -> Result<&GlyphTable> {
        if !self.tables.contains_key(&size) {
            let table = self.source.load(size)?;
            debug!("loaded font size {size} ({} glyphs)", table.len());
            self.tables.insert(size, table);
        }
        Ok(&self.tables[&size])
    }
}

// ─── Layout ─────────────────────────────────────────────────────────────────

/// Horizontal anchoring of laid-out text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    /// `x` is the left edge of the first glyph.
    #[default]
    Left,
    /// `x` is the horizontal center of the whole run.
    Center,
}

/// Pixels of a laid-out string and its rendered width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    pub points: Vec<Point>,
    /// Width of the run without the trailing spacing: `-2` when no glyph
    /// was found.
    pub width: i32,
}

/// Lay `text` out at `(x, y)` with `table`.
///
/// In [`TextMode::Center`] every pixel is first placed as if the run began
/// at 0, then the whole set is shifted by `x - ceil(total / 2)` once the
/// total advance is known.
///
/// Coordinates saturate instead of overflowing; points pushed past the
/// `i32` range land off any grid and are dropped when plotted.
///
/// ```
/// use qp_canvas::font::{layout, Glyph, GlyphTable, TextMode};
///
/// let mut table = GlyphTable::new();
/// table.insert('i', Glyph { width: 0, offsets: vec![(0, 0), (0, 2), (0, 3)] });
///
/// let run = layout(&table, 10, 1, "ii", TextMode::Left);
/// assert_eq!(run.width, 2); // 0 + 2 + 0 + 2, minus the trailing 2
/// assert_eq!(run.points.len(), 6);
/// ```
#[must_use]
pub fn layout(table: &GlyphTable, x: i32, y: i32, text: &str, mode: TextMode) -> TextLayout {
    let origin = match mode {
        TextMode::Left => x,
        TextMode::Center => 0,
    };

    let mut pen = 0;
    let mut points = Vec::new();
    for ch in text.chars() {
        let Some(glyph) = table.get(ch) else {
            continue;
        };
        points.extend(
            glyph
                .offsets
                .iter()
                .map(|&(dx, dy)| {
                    Point::new(
                        origin.saturating_add(pen).saturating_add(i32::from(dx)),
                        y.saturating_add(i32::from(dy)),
                    )
                }),
        );
        pen = pen.saturating_add(i32::from(glyph.width) + GLYPH_SPACING);
    }

    if mode == TextMode::Center {
        // An odd advance rounds the half up, so the run leans left.
        let shift = x.saturating_sub(pen / 2 + pen % 2);
        for p in &mut points {
            p.x = p.x.saturating_add(shift);
        }
    }

    TextLayout {
        points,
        width: pen - GLYPH_SPACING,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    const SAMPLE: &str = r#"{
        "65": { "width": 2, "data": "01021011122021" },
        "73": { "width": 2, "data": "00102001112021" }
    }"#;

    fn sample() -> GlyphTable {
        GlyphTable::from_json(1, SAMPLE).unwrap()
    }

    // ── Parsing ─────────────────────────────────────────────────────────

    #[test]
    fn parse_sample_table() {
        let table = sample();
        assert_eq!(table.len(), 2);
        let a = table.get('A').unwrap();
        assert_eq!(a.width, 2);
        assert_eq!(
            a.offsets,
            vec![(0, 1), (0, 2), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1)]
        );
        assert!(table.get('B').is_none());
    }

    #[test]
    fn parse_accepts_uppercase_hex() {
        let table = GlyphTable::from_json(1, r#"{"33": {"width": 0, "data": "0A0F"}}"#).unwrap();
        assert_eq!(table.get('!').unwrap().offsets, vec![(0, 10), (0, 15)]);
    }

    #[test]
    fn parse_rejects_bad_json() {
        let err = GlyphTable::from_json(3, "[1, 2").unwrap_err();
        assert!(matches!(err, CanvasError::FontParse { size: 3, .. }));
    }

    #[test]
    fn parse_rejects_missing_width() {
        let err = GlyphTable::from_json(2, r#"{"65": {"data": "00"}}"#).unwrap_err();
        assert!(matches!(err, CanvasError::FontParse { size: 2, .. }));
    }

    #[test]
    fn parse_rejects_odd_data() {
        let err = GlyphTable::from_json(1, r#"{"65": {"width": 1, "data": "012"}}"#).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidGlyph { ref key, .. } if key == "65"));
    }

    #[test]
    fn parse_rejects_non_hex_data() {
        let err = GlyphTable::from_json(1, r#"{"65": {"width": 1, "data": "zz"}}"#).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidGlyph { .. }));
    }

    #[test]
    fn parse_rejects_non_numeric_key() {
        let err = GlyphTable::from_json(1, r#"{"A": {"width": 1, "data": "00"}}"#).unwrap_err();
        assert!(matches!(err, CanvasError::InvalidGlyph { ref key, .. } if key == "A"));
    }

    // ── FontDir ─────────────────────────────────────────────────────────

    #[test]
    fn font_dir_loads_sized_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("font_1.json"), SAMPLE).unwrap();
        let fonts = FontDir::new(dir.path());
        assert_eq!(fonts.load(1).unwrap(), sample());
    }

    #[test]
    fn font_dir_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let fonts = FontDir::new(dir.path());
        let err = fonts.load(4).unwrap_err();
        match err {
            CanvasError::FontLoad { size, path, .. } => {
                assert_eq!(size, 4);
                assert_eq!(path, dir.path().join("font_4.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bundled_small_font_loads() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../font");
        let table = FontDir::new(root).load(1).unwrap();
        assert!(table.get('A').is_some());
        assert_eq!(table.get('a'), table.get('A'));
        let run = layout(&table, 5, 2, "A", TextMode::Left);
        assert!(run.width > 0);
        assert!(run.points.iter().all(|p| p.x >= 5 && p.y >= 2));
    }

    // ── FontCache ───────────────────────────────────────────────────────

    struct CountingSource {
        loads: Cell<u32>,
    }

    impl GlyphSource for CountingSource {
        fn load(&self, size: u8) -> Result<GlyphTable> {
            self.loads.set(self.loads.get() + 1);
            if size == 9 {
                return Err(CanvasError::InvalidGlyph {
                    size,
                    key: "0".into(),
                    reason: "test failure",
                });
            }
            Ok(sample())
        }
    }

    #[test]
    fn cache_loads_each_size_once() {
        let source = Rc::new(CountingSource { loads: Cell::new(0) });
        let mut cache = FontCache::new(source.clone());
        assert!(!cache.is_loaded(1));
        cache.get_or_load(1).unwrap();
        cache.get_or_load(1).unwrap();
        assert!(cache.is_loaded(1));
        assert_eq!(source.loads.get(), 1);
        cache.get_or_load(2).unwrap();
        assert_eq!(source.loads.get(), 2);
    }

    #[test]
    fn cache_does_not_remember_failures() {
        let source = Rc::new(CountingSource { loads: Cell::new(0) });
        let mut cache = FontCache::new(source.clone());
        assert!(cache.get_or_load(9).is_err());
        assert!(cache.get_or_load(9).is_err());
        assert!(!cache.is_loaded(9));
        assert_eq!(source.loads.get(), 2);
    }

    // ── Layout ──────────────────────────────────────────────────────────

    #[test]
    fn left_layout_offsets_by_x_and_pen() {
        let run = layout(&sample(), 5, 2, "AI", TextMode::Left);
        assert_eq!(run.width, 6); // (2 + 2) + (2 + 2) - 2
        assert_eq!(run.points[0], Point::new(5, 3)); // 'A' (0, 1)
        // 'I' starts at pen 4: its (0, 0) lands at x + 4.
        assert!(run.points.contains(&Point::new(9, 2)));
        assert_eq!(run.points.len(), 14);
    }

    #[test]
    fn empty_text_has_width_minus_two() {
        let run = layout(&sample(), 5, 2, "", TextMode::Left);
        assert_eq!(run.width, -2);
        assert!(run.points.is_empty());
    }

    #[test]
    fn unmapped_characters_are_skipped() {
        let run = layout(&sample(), 0, 0, "xyz", TextMode::Left);
        assert_eq!(run.width, -2);
        assert!(run.points.is_empty());

        let mixed = layout(&sample(), 0, 0, "?A?", TextMode::Left);
        let plain = layout(&sample(), 0, 0, "A", TextMode::Left);
        assert_eq!(mixed, plain);
    }

    #[test]
    fn center_layout_is_centered_on_x() {
        let run = layout(&sample(), 40, 0, "IIII", TextMode::Center);
        let sum: i32 = run.points.iter().map(|p| p.x).sum();
        let n = i32::try_from(run.points.len()).unwrap();
        let centroid = f64::from(sum) / f64::from(n);
        assert!((centroid - 40.0).abs() <= 1.0, "centroid {centroid}");
    }

    #[test]
    fn center_layout_shifts_whole_run() {
        let left = layout(&sample(), 0, 0, "AI", TextMode::Left);
        let center = layout(&sample(), 20, 0, "AI", TextMode::Center);
        // total advance 8, so the run starts at 20 - 4.
        let shifted: Vec<Point> = left
            .points
            .iter()
            .map(|p| Point::new(p.x + 16, p.y))
            .collect();
        assert_eq!(center.points, shifted);
        assert_eq!(center.width, left.width);
    }

    #[test]
    fn center_layout_rounds_odd_advance_left() {
        let mut table = GlyphTable::new();
        table.insert('|', Glyph { width: 1, offsets: vec![(0, 0)] });
        // advance 3, half rounded up to 2
        let run = layout(&table, 10, 0, "|", TextMode::Center);
        assert_eq!(run.points, vec![Point::new(8, 0)]);
        assert_eq!(run.width, 1);
    }

    #[test]
    fn layout_near_i32_max_saturates() {
        let left = layout(&sample(), i32::MAX - 1, i32::MAX, "AI", TextMode::Left);
        assert!(!left.points.is_empty());
        assert!(left.points.iter().all(|p| p.x >= i32::MAX - 1 && p.y == i32::MAX));

        let center = layout(&sample(), i32::MIN, 0, "AI", TextMode::Center);
        assert!(center.points.iter().all(|p| p.x < i32::MIN + 8));
    }
}
