//! Drawable objects: the closed set of shapes a document can produce.

use super::style::Style;
use crate::geometry::Point;

/// Number of straight segments a cubic Bézier is flattened into.
pub const CURVE_STEPS: u32 = 10;

/// Geometry of a drawable.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Polygon path made of one or more subpaths
    Path {
        /// Each subpath is an ordered list of vertices
        subpaths: Vec<Vec<Point>>,
    },
    /// Axis-aligned ellipse
    Ellipse {
        /// Center point
        center: Point,
        /// Independent x and y radii
        radius: Point,
    },
}

/// A shape with its identifier and resolved style.
///
/// Cloning produces a fully independent copy; nothing is shared with the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    pub id: Option<String>,
    pub style: Style,
    pub shape: Shape,
}

impl Drawable {
    pub fn new(id: Option<String>, style: Style, shape: Shape) -> Self {
        Self { id, style, shape }
    }

    pub fn ellipse(id: Option<String>, style: Style, center: Point, radius: Point) -> Self {
        Self::new(id, style, Shape::Ellipse { center, radius })
    }
}

/// Incremental path construction with a pen position.
///
/// Relative moves are resolved against the current pen; closing a subpath
/// repeats its first vertex and moves the pen there.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    subpaths: Vec<Vec<Point>>,
    pen: Point,
    closed: bool,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current pen position.
    pub fn pen(&self) -> Point {
        self.pen
    }

    pub fn subpaths(&self) -> &[Vec<Point>] {
        &self.subpaths
    }

    fn resolve(&self, dest: Point, relative: bool) -> Point {
        if relative { self.pen + dest } else { dest }
    }

    /// Starts a new subpath at `dest`.
    pub fn move_to(&mut self, dest: Point, relative: bool) {
        let dest = self.resolve(dest, relative);
        self.subpaths.push(vec![dest]);
        self.pen = dest;
        self.closed = false;
    }

    /// Appends a vertex to the current subpath.
    ///
    /// Without an open subpath (nothing drawn yet, or right after a close) a new
    /// one is started at the pen first.
    pub fn line_to(&mut self, dest: Point, relative: bool) {
        let dest = self.resolve(dest, relative);
        self.current_subpath().push(dest);
        self.pen = dest;
    }

    /// Appends a cubic Bézier flattened into [`CURVE_STEPS`] straight segments.
    pub fn curve_to(&mut self, handle1: Point, handle2: Point, dest: Point, relative: bool) {
        let p0 = self.pen;
        let p1 = self.resolve(handle1, relative);
        let p2 = self.resolve(handle2, relative);
        let p3 = self.resolve(dest, relative);

        let subpath = self.current_subpath();
        for step in 1..=CURVE_STEPS {
            let t = step as f64 / CURVE_STEPS as f64;
            subpath.push(cubic_point(p0, p1, p2, p3, t));
        }
        self.pen = p3;
    }

    /// Closes the current subpath by repeating its first vertex.
    ///
    /// Every call repeats the vertex again, even on a subpath that is already
    /// closed.
    pub fn close(&mut self) {
        let Some(subpath) = self.subpaths.last_mut() else {
            return;
        };
        let first = subpath[0];
        subpath.push(first);
        self.pen = first;
        self.closed = true;
    }

    fn current_subpath(&mut self) -> &mut Vec<Point> {
        if self.subpaths.is_empty() || self.closed {
            self.subpaths.push(vec![self.pen]);
            self.closed = false;
        }
        let last = self.subpaths.len() - 1;
        &mut self.subpaths[last]
    }

    pub fn finish(self) -> Shape {
        Shape::Path {
            subpaths: self.subpaths,
        }
    }
}

/// Evaluates a cubic Bézier at `t` with the Bernstein basis.
fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let u = 1.0 - t;
    let c = [u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t];
    Point::new(
        c[0] * p0.x + c[1] * p1.x + c[2] * p2.x + c[3] * p3.x,
        c[0] * p0.y + c[1] * p1.y + c[2] * p2.y + c[3] * p3.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn absolute_and_relative_moves_track_pen() {
        let mut b = PathBuilder::new();
        b.move_to(pt(10.0, 20.0), false);
        assert_eq!(b.pen(), pt(10.0, 20.0));
        b.line_to(pt(20.0, 30.0), false);
        b.close();
        assert_eq!(b.pen(), pt(10.0, 20.0));
        assert_eq!(b.subpaths()[0].len(), 3);

        b.move_to(pt(10.0, 20.0), true);
        assert_eq!(b.pen(), pt(20.0, 40.0));
        b.line_to(pt(10.0, 20.0), true);
        assert_eq!(b.pen(), pt(30.0, 60.0));
        b.close();
        assert_eq!(b.pen(), pt(20.0, 40.0));
        assert_eq!(b.subpaths().len(), 2);
        assert_eq!(b.subpaths()[1].len(), 3);
    }

    #[test]
    fn curve_is_flattened_into_fixed_steps() {
        let mut b = PathBuilder::new();
        b.move_to(pt(0.0, 0.0), false);
        b.curve_to(pt(0.0, 10.0), pt(10.0, 10.0), pt(10.0, 0.0), false);
        let subpath = &b.subpaths()[0];
        assert_eq!(subpath.len(), 1 + CURVE_STEPS as usize);
        let end = subpath[subpath.len() - 1];
        assert!((end.x - 10.0).abs() < 1e-9 && end.y.abs() < 1e-9);
        // midpoint of a symmetric curve
        let mid = subpath[5];
        assert!((mid.x - 5.0).abs() < 1e-9);
        assert!((mid.y - 7.5).abs() < 1e-9);
        assert_eq!(b.pen(), pt(10.0, 0.0));
    }

    #[test]
    fn relative_curve_uses_start_pen_for_every_point() {
        let mut b = PathBuilder::new();
        b.move_to(pt(5.0, 5.0), false);
        b.curve_to(pt(0.0, 0.0), pt(0.0, 0.0), pt(10.0, 0.0), true);
        assert_eq!(b.pen(), pt(15.0, 5.0));
    }

    #[test]
    fn each_close_repeats_the_first_vertex() {
        let mut b = PathBuilder::new();
        b.move_to(pt(0.0, 0.0), false);
        b.line_to(pt(10.0, 0.0), false);
        b.line_to(pt(10.0, 10.0), false);
        b.close();
        b.close();
        assert_eq!(b.subpaths().len(), 1);
        assert_eq!(b.subpaths()[0].len(), 5);
        assert_eq!(b.subpaths()[0][4], pt(0.0, 0.0));
        assert_eq!(b.pen(), pt(0.0, 0.0));
    }

    #[test]
    fn drawing_after_close_starts_new_subpath() {
        let mut b = PathBuilder::new();
        b.move_to(pt(1.0, 1.0), false);
        b.line_to(pt(5.0, 1.0), false);
        b.close();
        b.line_to(pt(1.0, 9.0), false);
        assert_eq!(b.subpaths().len(), 2);
        assert_eq!(b.subpaths()[1], vec![pt(1.0, 1.0), pt(1.0, 9.0)]);
    }
}
