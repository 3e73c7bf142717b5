// SPDX-License-Identifier: MIT
//
// Geometry kernel — where pixels come from.
//
// Everything here is pure: shapes are described as iterators over the pixel
// coordinates they cover, and the canvas decides what to do with each one.
// Nothing in this module knows about cells, colors or output.
//
//   Line      — DDA walk, one unit-length step at a time, endpoint forced.
//   Circle    — parametric walk over θ with a step of 1/(r·aspect), so the
//               arc between samples is about one pixel at any radius.
//   winding   — crossing-number winding test for arbitrary polygons.
//   QuadFill  — a rotated quadrilateral split into a cell-aligned core that
//               can be filled a whole cell at a time, and a border band
//               that has to be swept pixel by pixel.

use std::f64::consts::TAU;

// ─── Point ──────────────────────────────────────────────────────────────────

/// A pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Round a sampled coordinate onto the pixel lattice.
#[inline]
#[allow(clippy::cast_possible_truncation)] // `as` saturates; off-canvas values are dropped later.
fn snap(v: f64) -> i32 {
    v.round() as i32
}

// ─── Line ───────────────────────────────────────────────────────────────────

/// Pixels along the segment from `from` to `to`, both ends included.
///
/// The walk takes `d = ceil(|to - from|)` steps of length ≤ 1 and then yields
/// `to` itself, so rounding drift can never lose the endpoint. A zero-length
/// segment yields its single point once.
///
/// ```
/// use qp_canvas::geometry::{Line, Point};
///
/// let pts: Vec<Point> = Line::new(Point::new(0, 0), Point::new(3, 0)).collect();
/// assert_eq!(pts.first(), Some(&Point::new(0, 0)));
/// assert_eq!(pts.last(), Some(&Point::new(3, 0)));
/// ```
#[derive(Debug, Clone)]
pub struct Line {
    from: Point,
    to: Point,
    step_x: f64,
    step_y: f64,
    steps: u32,
    next: u32,
}

impl Line {
    #[must_use]
    pub fn new(from: Point, to: Point) -> Self {
        let dx = f64::from(to.x) - f64::from(from.x);
        let dy = f64::from(to.y) - f64::from(from.y);
        let d = dx.hypot(dy).ceil();
        // Distances between i32 points fit comfortably in u32.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = d as u32;
        let (step_x, step_y) = if steps == 0 { (0.0, 0.0) } else { (dx / d, dy / d) };
        Self {
            from,
            to,
            step_x,
            step_y,
            steps,
            next: 0,
        }
    }
}

impl Iterator for Line {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next > self.steps {
            return None;
        }
        let i = self.next;
        self.next += 1;
        if i == self.steps {
            return Some(self.to);
        }
        let t = f64::from(i);
        Some(Point::new(
            snap(self.step_x.mul_add(t, f64::from(self.from.x))),
            snap(self.step_y.mul_add(t, f64::from(self.from.y))),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.steps + 1).saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Line {}

// ─── Circle ─────────────────────────────────────────────────────────────────

/// Pixels on an ellipse of vertical radius `r` and horizontal radius
/// `r * aspect`, centered on `center`.
///
/// Terminal cells are roughly twice as tall as they are wide, so an aspect
/// of about 2.0 looks round on screen; 1.0 is round in pixel space.
/// Consecutive samples can land on the same pixel; callers plotting into a
/// grid don't care.
#[derive(Debug, Clone)]
pub struct Circle {
    center: Point,
    r: f64,
    aspect: f64,
    step: f64,
    theta: f64,
    degenerate: bool,
}

impl Circle {
    #[must_use]
    pub fn new(center: Point, r: i32, aspect: f64) -> Self {
        let r = f64::from(r);
        let scale = r * aspect;
        let step = scale.recip();
        Self {
            center,
            r,
            aspect,
            step,
            theta: 0.0,
            // Zero, negative or NaN scale would never advance θ.
            degenerate: !(scale > 0.0 && step.is_finite()),
        }
    }
}

impl Iterator for Circle {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.degenerate {
            if self.theta == 0.0 {
                self.theta = TAU;
                return Some(self.center);
            }
            return None;
        }
        if self.theta >= TAU {
            return None;
        }
        let (sin, cos) = self.theta.sin_cos();
        let p = Point::new(
            snap((sin * self.r).mul_add(self.aspect, f64::from(self.center.x))),
            snap(cos.mul_add(self.r, f64::from(self.center.y))),
        );
        self.theta += self.step;
        Some(p)
    }
}

// ─── Winding number ─────────────────────────────────────────────────────────

/// Twice the signed area of triangle `(p0, p1, p2)`.
///
/// Positive when `p2` is left of the line through `p0` and `p1`, negative
/// when right, zero when collinear.
#[inline]
fn is_left(p0: Point, p1: Point, p2: Point) -> i64 {
    let (x0, y0) = (i64::from(p0.x), i64::from(p0.y));
    let (x1, y1) = (i64::from(p1.x), i64::from(p1.y));
    let (x2, y2) = (i64::from(p2.x), i64::from(p2.y));
    (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0)
}

/// Winding number of `polygon` around `p`. Non-zero means inside.
///
/// The polygon is treated as closed whether or not its first vertex is
/// repeated at the end. Edges follow the half-open rule: an edge counts
/// for rows `min(y0, y1) <= p.y < max(y0, y1)`, so shared vertices are
/// never counted twice.
#[must_use]
pub fn winding_number(polygon: &[Point], p: Point) -> i32 {
    let Some(&first) = polygon.first() else {
        return 0;
    };
    let closing = std::iter::once(first);
    let mut wn = 0;
    for (&a, b) in polygon.iter().zip(polygon.iter().copied().skip(1).chain(closing)) {
        if a.y <= p.y {
            if b.y > p.y && is_left(a, b, p) > 0 {
                wn += 1;
            }
        } else if b.y <= p.y && is_left(a, b, p) < 0 {
            wn -= 1;
        }
    }
    wn
}

/// Whether `p` lies inside `polygon` by the non-zero rule.
#[inline]
#[must_use]
pub fn contains(polygon: &[Point], p: Point) -> bool {
    winding_number(polygon, p) != 0
}

// ─── QuadFill ───────────────────────────────────────────────────────────────

/// A filled quadrilateral, split for two-pass drawing.
///
/// Corners go top-left, top-right, bottom-right, bottom-left. The core is
/// the outline inset by a pixel on every side and snapped inward to whole
/// cells (top/left to even pixels, bottom/right to odd ones); it can be
/// written as full blocks. Everything in the bounding box that is inside
/// the quad but outside the core is the border, plotted pixel by pixel.
#[derive(Debug, Clone)]
pub struct QuadFill {
    outer: [Point; 4],
    inner: [Point; 4],
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl QuadFill {
    #[must_use]
    pub fn new(corners: [Point; 4]) -> Self {
        let [tl, tr, br, bl] = corners;

        let mut top = tl.y.max(tr.y).saturating_add(1);
        let mut left = tl.x.max(bl.x).saturating_add(1);
        let mut bottom = br.y.min(bl.y).saturating_sub(1);
        let mut right = tr.x.min(br.x).saturating_sub(1);

        if top.rem_euclid(2) != 0 {
            top = top.saturating_add(1);
        }
        if left.rem_euclid(2) != 0 {
            left = left.saturating_add(1);
        }
        if bottom.rem_euclid(2) == 0 {
            bottom = bottom.saturating_sub(1);
        }
        if right.rem_euclid(2) == 0 {
            right = right.saturating_sub(1);
        }

        let inner = [
            Point::new(left, top),
            Point::new(right, top),
            Point::new(right, bottom),
            Point::new(left, bottom),
        ];

        Self {
            outer: corners,
            inner,
            left,
            top,
            right,
            bottom,
        }
    }

    /// Cells `(cx, cy)` lying wholly inside the core, row-major.
    ///
    /// Empty when the quad is too thin to have a core.
    pub fn core_cells(&self) -> impl Iterator<Item = (i32, i32)> {
        let xs = self.left.div_euclid(2)..=self.right.div_euclid(2);
        let ys = self.top.div_euclid(2)..=self.bottom.div_euclid(2);
        ys.flat_map(move |cy| xs.clone().map(move |cx| (cx, cy)))
    }

    /// Pixels inside the quad but outside the core, row-major.
    ///
    /// The sweep covers `[min x, max x) × [min y, max y)` of the corners, so
    /// the rightmost column and bottom row of the bounding box are not
    /// visited.
    pub fn border_points(&self) -> impl Iterator<Item = Point> + '_ {
        let [tl, tr, br, bl] = self.outer;
        let xs = tl.x.min(bl.x)..tr.x.max(br.x);
        let ys = tl.y.min(tr.y)..br.y.max(bl.y);
        ys.flat_map(move |y| xs.clone().map(move |x| Point::new(x, y)))
            .filter(|&p| contains(&self.outer, p) && !contains(&self.inner, p))
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
