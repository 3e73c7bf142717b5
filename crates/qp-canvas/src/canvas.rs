// SPDX-License-Identifier: MIT
//
// Canvas — immediate-mode drawing onto a terminal.
//
// A canvas owns a PixelGrid and a CellWriter. Every drawing call computes its
// pixels, writes them into the grid, and redraws each cell it touched right
// away. Escape bytes for one call collect in an OutputBuffer and reach the
// sink in a single write when the call returns.
//
// A canvas constructed with output disabled ("headless") never writes, except
// for an explicit `render()`. Headless canvases are scratch surfaces for
// composing sprites that get blitted onto a visible canvas later.

use std::io::{self, Write};
use std::rc::Rc;

use log::{debug, warn};
use qp_term::ansi;
use qp_term::color::PaletteColor;
use qp_term::grid::{DrawContext, PixelGrid};
use qp_term::output::{CellWriter, OutputBuffer};
use qp_term::terminal::{self, Size};

use crate::blit::{self, BlitOptions};
use crate::config::CanvasConfig;
use crate::error::Result;
use crate::font::{self, FontCache, FontDir, GlyphSource, TextMode};
use crate::geometry::{Circle, Line, Point, QuadFill};

/// Aspect ratio for [`Canvas::circle`].
pub const DEFAULT_ASPECT: f64 = 1.0;

/// A drawing surface bound to an output sink.
pub struct Canvas<W: Write> {
    grid: PixelGrid,
    writer: CellWriter,
    out: OutputBuffer,
    sink: W,
    output: bool,
    ctx: DrawContext,
    fonts: FontCache,
    text_size: u8,
}

impl Canvas<io::Stdout> {
    /// A canvas drawing to standard output.
    #[must_use]
    pub fn stdout(config: &CanvasConfig) -> Self {
        Self::new(config, io::stdout())
    }
}

impl Canvas<io::Sink> {
    /// A headless scratch canvas of `cols × rows` cells.
    #[must_use]
    pub fn headless(cols: u16, rows: u16) -> Self {
        let config = CanvasConfig {
            output: false,
            ..CanvasConfig::sized(cols, rows)
        };
        Self::new(&config, io::sink())
    }
}

impl<W: Write> Canvas<W> {
    // ─── Construction ────────────────────────────────────────────────────

    /// Build a canvas from `config`, writing to `sink`.
    ///
    /// The terminal is only asked for its size when the config leaves a
    /// dimension unset.
    pub fn new(config: &CanvasConfig, sink: W) -> Self {
        let probed = if config.cols.is_some() && config.rows.is_some() {
            None
        } else {
            let probed = terminal::get_size();
            match probed {
                Some(size) => debug!("terminal reports {}x{}", size.cols, size.rows),
                None => warn!(
                    "terminal size unavailable, falling back to {}x{}",
                    terminal::DEFAULT_SIZE.cols,
                    terminal::DEFAULT_SIZE.rows
                ),
            }
            probed
        };
        let Size { cols, rows } = Size::resolve(config.cols, config.rows, probed);
        debug!("canvas {cols}x{rows} cells, output={}", config.output);

        Self {
            grid: PixelGrid::new(cols, rows),
            writer: CellWriter::new(),
            out: OutputBuffer::new(),
            sink,
            output: config.output,
            ctx: DrawContext {
                active_color: config.color,
            },
            fonts: FontCache::new(Rc::new(FontDir::new(config.font_dir.clone()))),
            text_size: config.text_size,
        }
    }

    /// Load glyph tables from `source` instead of the configured directory.
    ///
    /// Drops anything already cached.
    #[must_use]
    pub fn with_glyph_source(mut self, source: Rc<dyn GlyphSource>) -> Self {
        self.fonts = FontCache::new(source);
        self
    }

    /// An independent headless canvas with the same pixels and color.
    ///
    /// The copy reads fonts from the same source but keeps its own cache.
    #[must_use]
    pub fn clone_headless(&self) -> Canvas<io::Sink> {
        Canvas {
            grid: self.grid.clone(),
            writer: CellWriter::new(),
            out: OutputBuffer::new(),
            sink: io::sink(),
            output: false,
            ctx: self.ctx,
            fonts: FontCache::new(self.fonts.source()),
            text_size: self.text_size,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    /// Whether pixel `(x, y)` is lit.
    #[inline]
    #[must_use]
    pub fn get_point(&self, x: i32, y: i32) -> bool {
        self.grid.get_point(x, y)
    }

    #[inline]
    #[must_use]
    pub const fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// The active drawing color.
    #[inline]
    #[must_use]
    pub const fn color(&self) -> Option<PaletteColor> {
        self.ctx.active_color
    }

    #[inline]
    #[must_use]
    pub const fn is_headless(&self) -> bool {
        !self.output
    }

    #[must_use]
    pub const fn sink(&self) -> &W {
        &self.sink
    }

    #[must_use]
    pub fn into_sink(self) -> W {
        self.sink
    }

    // ─── State ───────────────────────────────────────────────────────────

    /// Blank the grid and, with output on, the screen.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn clear(&mut self) -> Result<()> {
        self.grid.clear();
        self.writer.reset_state();
        if self.output {
            ansi::clear_screen(&mut self.out)?;
        }
        self.flush()
    }

    /// Draw subsequent pixels in `color`.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn set_color(&mut self, color: PaletteColor) -> Result<()> {
        self.ctx = self.ctx.with_color(color);
        if self.output {
            self.writer.apply_fg(&mut self.out, color);
        }
        self.flush()
    }

    /// Stop coloring new pixels and restore the terminal's default foreground.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn clear_color(&mut self) -> Result<()> {
        self.ctx = DrawContext::uncolored();
        if self.output {
            self.writer.reset_fg(&mut self.out);
        }
        self.flush()
    }

    // ─── Drawing ─────────────────────────────────────────────────────────

    /// Light one pixel.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn plot(&mut self, x: i32, y: i32) -> Result<()> {
        self.plot_point(Point::new(x, y));
        self.flush()
    }

    /// Draw a line between two pixels, both ends included.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<()> {
        self.plot_all(Line::new(Point::new(x1, y1), Point::new(x2, y2)));
        self.flush()
    }

    /// Draw a circle outline of radius `r` around `(x, y)`.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn circle(&mut self, x: i32, y: i32, r: i32) -> Result<()> {
        self.circle_with_aspect(x, y, r, DEFAULT_ASPECT)
    }

    /// Draw an ellipse: horizontal radius `r * aspect`, vertical radius `r`.
    ///
    /// Terminal cells are roughly twice as tall as they are wide, so an
    /// aspect near 2.0 looks round on screen.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn circle_with_aspect(&mut self, x: i32, y: i32, r: i32, aspect: f64) -> Result<()> {
        self.plot_all(Circle::new(Point::new(x, y), r, aspect));
        self.flush()
    }

    /// Fill a quadrilateral given top-left, top-right, bottom-right and
    /// bottom-left corners.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn fill_rect(&mut self, corners: [Point; 4]) -> Result<()> {
        let quad = QuadFill::new(corners);
        for (cx, cy) in quad.core_cells() {
            if self.grid.fill_cell(cx, cy, self.ctx) {
                self.redraw(cx, cy);
            }
        }
        self.plot_all(quad.border_points());
        self.flush()
    }

    /// Draw `text` in the configured font size. Returns the rendered width.
    ///
    /// The size comes from `text_size` in [`CanvasConfig`] and defaults to
    /// [`DEFAULT_FONT_SIZE`](crate::font::DEFAULT_FONT_SIZE). Its
    /// `font_<size>.json` must be installed in `font_dir`; the bundled
    /// `font/` directory only carries size 1, so set `text_size = 1` or use
    /// [`text_sized`](Self::text_sized) when relying on it alone.
    ///
    /// # Errors
    ///
    /// Fails with [`CanvasError::FontLoad`](crate::CanvasError::FontLoad) if
    /// the font file is missing, or if writing to the sink fails.
    pub fn text(&mut self, x: i32, y: i32, text: &str, mode: TextMode) -> Result<i32> {
        self.text_sized(x, y, text, self.text_size, mode)
    }

    /// Draw `text` in font `size`. Returns the rendered width in pixels,
    /// `-2` when no character had a glyph.
    ///
    /// # Errors
    ///
    /// Fails if the font can't be loaded or writing to the sink fails.
    pub fn text_sized(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        size: u8,
        mode: TextMode,
    ) -> Result<i32> {
        let table = self.fonts.get_or_load(size)?;
        let run = font::layout(table, x, y, text, mode);
        self.plot_all(run.points);
        self.flush()?;
        Ok(run.width)
    }

    // ─── Compositing ─────────────────────────────────────────────────────

    /// Copy a region of `source` onto this canvas at pixel `(x, y)`.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn blit(&mut self, x: i32, y: i32, source: &PixelGrid, opts: &BlitOptions) -> Result<()> {
        let touched = blit::blit(&mut self.grid, x, y, source, opts);
        self.redraw_all(touched);
        self.flush()
    }

    /// Copy a region of this canvas onto itself at pixel `(x, y)`.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn blit_within(&mut self, x: i32, y: i32, opts: &BlitOptions) -> Result<()> {
        let touched = blit::blit_within(&mut self.grid, x, y, opts);
        self.redraw_all(touched);
        self.flush()
    }

    // ─── Terminal ────────────────────────────────────────────────────────

    /// Put the terminal cursor on the cell holding pixel `(x, y)`.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn move_cursor(&mut self, x: i32, y: i32) -> Result<()> {
        if self.output {
            self.writer
                .move_to(&mut self.out, pixel_to_cell(x), pixel_to_cell(y));
        }
        self.flush()
    }

    /// Write raw text starting at the cell holding pixel `(x, y)`.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn write_string(&mut self, x: i32, y: i32, text: &str) -> Result<()> {
        if self.output {
            self.writer
                .move_to(&mut self.out, pixel_to_cell(x), pixel_to_cell(y));
            self.writer.write_text(&mut self.out, text);
        }
        self.flush()
    }

    /// Show or hide the terminal cursor.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if self.output {
            if visible {
                ansi::cursor_show(&mut self.out)?;
            } else {
                ansi::cursor_hide(&mut self.out)?;
            }
        }
        self.flush()
    }

    /// Repaint every cell, row by row. Writes even on a headless canvas.
    ///
    /// # Errors
    ///
    /// Fails only if writing to the sink fails.
    pub fn render(&mut self) -> Result<()> {
        for (cx, cy, cell) in self.grid.iter() {
            self.writer.render_cell(&mut self.out, cx, cy, cell);
        }
        self.flush()
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn plot_point(&mut self, p: Point) {
        if let Some((cx, cy)) = self.grid.plot(p.x, p.y, self.ctx) {
            self.redraw_cell(cx, cy);
        }
    }

    fn plot_all(&mut self, points: impl IntoIterator<Item = Point>) {
        for p in points {
            self.plot_point(p);
        }
    }

    fn redraw(&mut self, cx: i32, cy: i32) {
        if let (Ok(cx), Ok(cy)) = (u16::try_from(cx), u16::try_from(cy)) {
            self.redraw_cell(cx, cy);
        }
    }

    fn redraw_all(&mut self, cells: Vec<(u16, u16)>) {
        for (cx, cy) in cells {
            self.redraw_cell(cx, cy);
        }
    }

    fn redraw_cell(&mut self, cx: u16, cy: u16) {
        if !self.output {
            return;
        }
        if let Some(cell) = self.grid.cell(i32::from(cx), i32::from(cy)) {
            self.writer.render_cell(&mut self.out, cx, cy, cell);
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush_to(&mut self.sink)?;
        Ok(())
    }
}

/// Cell holding pixel coordinate `v`, clamped into the addressable range.
fn pixel_to_cell(v: i32) -> u16 {
    u16::try_from(v.div_euclid(2).max(0)).unwrap_or(u16::MAX)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
