// SPDX-License-Identifier: MIT
//
// qpix — demos for the quadrant-pixel terminal canvas.
//
//   qpix basic   three colored lines and an ellipse
//   qpix cube    a rotating wireframe cube
//   qpix font    every installed font size
//   qpix shapes  filled quads, a blitted sprite and centered text
//
// Options:
//
//   --config FILE   canvas configuration (TOML), see qp_canvas::config
//   --frames N      frames to animate (cube only)
//
// Logging goes to stderr through env_logger. Set RUST_LOG=debug to see font
// loads and size probing.

use std::env;
use std::f64::consts::TAU;
use std::io::Stdout;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, bail};
use log::{info, warn};
use qp_canvas::blit::{BlitOptions, MergePolicy};
use qp_canvas::font::TextMode;
use qp_canvas::geometry::Point;
use qp_canvas::{Canvas, CanvasConfig, CanvasError};
use qp_term::color::PaletteColor;
use qp_term::terminal;

const USAGE: &str = "usage: qpix <basic|cube|font|shapes> [--config FILE] [--frames N]";

const DEFAULT_FRAMES: u32 = 200;
const FRAME_DELAY: Duration = Duration::from_millis(50);

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demo {
    Basic,
    Cube,
    Font,
    Shapes,
}

impl Demo {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "basic" => Some(Self::Basic),
            "cube" => Some(Self::Cube),
            "font" => Some(Self::Font),
            "shapes" => Some(Self::Shapes),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    demo: Demo,
    config: Option<PathBuf>,
    frames: u32,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut demo = None;
    let mut config = None;
    let mut frames = DEFAULT_FRAMES;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().context("--config needs a file")?;
                config = Some(PathBuf::from(path));
            }
            "--frames" => {
                let n = args.next().context("--frames needs a count")?;
                frames = n
                    .parse()
                    .with_context(|| format!("--frames: {n:?} is not a count"))?;
            }
            "-h" | "--help" => bail!("{USAGE}"),
            name if demo.is_none() => {
                let Some(d) = Demo::from_name(name) else {
                    bail!("unknown demo {name:?}\n{USAGE}");
                };
                demo = Some(d);
            }
            other => bail!("unexpected argument {other:?}\n{USAGE}"),
        }
    }

    let Some(demo) = demo else {
        bail!("{USAGE}");
    };
    Ok(Args {
        demo,
        config,
        frames,
    })
}

// ─── Demos ──────────────────────────────────────────────────────────────────

fn basic(canvas: &mut Canvas<Stdout>) -> anyhow::Result<()> {
    canvas.clear()?;
    canvas.clear_color()?;
    canvas.set_color(PaletteColor::Red)?;
    canvas.line(40, 10, 10, 30)?;
    canvas.set_color(PaletteColor::Green)?;
    canvas.line(10, 30, 50, 40)?;
    canvas.set_color(PaletteColor::Blue)?;
    canvas.line(50, 40, 40, 10)?;
    canvas.set_color(PaletteColor::Cyan)?;
    canvas.circle_with_aspect(80, 20, 15, 2.0)?;
    Ok(())
}

const CUBE_NODES: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
];

const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Rotate about Y then X and project with perspective onto the screen plane.
fn project(node: [f64; 3], angle: f64, scale: f64, distance: f64) -> (f64, f64) {
    let [x, y, z] = node;
    let (sin, cos) = angle.sin_cos();
    let x1 = x.mul_add(cos, -z * sin);
    let z1 = z.mul_add(cos, x * sin);
    let y2 = y.mul_add(cos, -z1 * sin);
    let z2 = z1.mul_add(cos, y * sin);
    let depth = z2 + distance;
    (x1 * scale / depth, y2 * scale / depth)
}

#[allow(clippy::cast_possible_truncation)]
fn to_px(v: f64) -> i32 {
    v.round() as i32
}

fn cube(canvas: &mut Canvas<Stdout>, frames: u32) -> anyhow::Result<()> {
    let (cx, cy) = (f64::from(canvas.width()) / 2.0, f64::from(canvas.height()) / 2.0);
    info!("cube: {frames} frames at {}ms", FRAME_DELAY.as_millis());

    canvas.set_cursor_visible(false)?;
    let drawn = draw_cube_frames(canvas, frames, cx, cy);
    canvas.set_cursor_visible(true)?;
    drawn
}

fn draw_cube_frames(
    canvas: &mut Canvas<Stdout>,
    frames: u32,
    cx: f64,
    cy: f64,
) -> anyhow::Result<()> {
    let mut angle = 0.0_f64;
    for _ in 0..frames {
        canvas.clear()?;
        let points = CUBE_NODES.map(|node| {
            let (x, y) = project(node, angle, 100.0, 7.0);
            (to_px(x.mul_add(1.5, cx)), to_px(y + cy))
        });
        for (i, &(a, b)) in CUBE_EDGES.iter().enumerate() {
            let color = PaletteColor::ALL[1 + i % (PaletteColor::ALL.len() - 1)];
            canvas.set_color(color)?;
            let ((x1, y1), (x2, y2)) = (points[a], points[b]);
            canvas.line(x1, y1, x2, y2)?;
        }
        canvas.move_cursor(0, 0)?;
        angle = (angle + 0.1) % TAU;
        thread::sleep(FRAME_DELAY);
    }
    Ok(())
}

fn font(canvas: &mut Canvas<Stdout>) -> anyhow::Result<()> {
    canvas.clear()?;
    canvas.clear_color()?;

    let mut y = 2;
    for size in 1..=5u8 {
        match canvas.text_sized(5, y, &format!("Font type {size}"), size, TextMode::Left) {
            Ok(width) => info!("font size {size}: {width}px wide"),
            Err(CanvasError::FontLoad { path, .. }) => {
                warn!("font size {size} not installed ({})", path.display());
                continue;
            }
            Err(e) => {
                return Err(anyhow::Error::from(e).context(format!("drawing font size {size}")));
            }
        }
        y += i32::from(size) * 2 + 6;
    }
    Ok(())
}

fn shapes(canvas: &mut Canvas<Stdout>) -> anyhow::Result<()> {
    canvas.clear()?;

    canvas.set_color(PaletteColor::Blue)?;
    canvas.fill_rect([
        Point::new(4, 4),
        Point::new(40, 4),
        Point::new(40, 24),
        Point::new(4, 24),
    ])?;
    canvas.set_color(PaletteColor::Magenta)?;
    canvas.fill_rect([
        Point::new(60, 4),
        Point::new(80, 10),
        Point::new(74, 30),
        Point::new(54, 24),
    ])?;

    // Compose a sprite off-screen, then stamp it three times.
    let mut sprite = Canvas::headless(8, 4);
    sprite.set_color(PaletteColor::Brown)?;
    sprite.circle(7, 3, 3)?;
    sprite.set_color(PaletteColor::Red)?;
    sprite.line(0, 7, 15, 0)?;
    let merge = BlitOptions::default().policy(MergePolicy::Merge);
    for i in 0..3 {
        canvas.blit(10 + i * 20, 34, sprite.grid(), &merge)?;
    }

    // Duplicate the blue quad further right.
    let region = BlitOptions::default().offset(4, 4).size(38, 22).safe();
    canvas.blit_within(90, 4, &region)?;

    canvas.set_color(PaletteColor::White)?;
    let mid = canvas.width() / 2;
    if let Err(e) = canvas.text_sized(mid, 46, "QPIX", 1, TextMode::Center) {
        warn!("skipping caption: {e}");
    }
    canvas.clear_color()?;
    Ok(())
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args(env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => CanvasConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => CanvasConfig::default(),
    };

    if config.output && !terminal::is_tty() {
        warn!("stdout is not a terminal, escape sequences are written as-is");
    }
    let mut canvas = Canvas::stdout(&config);
    info!(
        "qpix {:?} on a {}x{} pixel canvas",
        args.demo,
        canvas.width(),
        canvas.height()
    );

    match args.demo {
        Demo::Basic => basic(&mut canvas)?,
        Demo::Cube => cube(&mut canvas, args.frames)?,
        Demo::Font => font(&mut canvas)?,
        Demo::Shapes => shapes(&mut canvas)?,
    }

    canvas.clear_color()?;
    let bottom = canvas.height() - 1;
    canvas.write_string(0, bottom, "\n")?;
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> anyhow::Result<Args> {
        parse_args(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn demo_only() {
        assert_eq!(
            parse(&["cube"]).unwrap(),
            Args {
                demo: Demo::Cube,
                config: None,
                frames: DEFAULT_FRAMES,
            }
        );
    }

    #[test]
    fn options_in_any_position() {
        let args = parse(&["--frames", "3", "shapes", "--config", "q.toml"]).unwrap();
        assert_eq!(args.demo, Demo::Shapes);
        assert_eq!(args.frames, 3);
        assert_eq!(args.config, Some(PathBuf::from("q.toml")));
    }

    #[test]
    fn missing_demo_is_usage_error() {
        let err = parse(&[]).unwrap_err();
        assert!(err.to_string().starts_with("usage:"));
    }

    #[test]
    fn unknown_demo_is_rejected() {
        assert!(parse(&["teapot"]).is_err());
    }

    #[test]
    fn second_demo_is_rejected() {
        assert!(parse(&["basic", "font"]).is_err());
    }

    #[test]
    fn option_without_value_is_rejected() {
        assert!(parse(&["basic", "--config"]).is_err());
        assert!(parse(&["cube", "--frames"]).is_err());
        assert!(parse(&["cube", "--frames", "many"]).is_err());
    }

    #[test]
    fn projection_is_centered_and_symmetric() {
        let (x, y) = project([0.0, 0.0, 0.0], 1.3, 100.0, 7.0);
        assert!(x.abs() < 1e-9 && y.abs() < 1e-9);
        let (ax, ay) = project([1.0, 1.0, 1.0], 0.0, 100.0, 7.0);
        let (bx, by) = project([-1.0, -1.0, 1.0], 0.0, 100.0, 7.0);
        assert!((ax + bx).abs() < 1e-9 && (ay + by).abs() < 1e-9);
    }
}
