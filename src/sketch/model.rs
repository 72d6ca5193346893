//! Strokes, sketches and integer canvas points.

use crate::foundation::core::Point;

/// Integer canvas coordinate. Fractional input is truncated toward zero by the parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPoint {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate (grows downwards).
    pub y: i32,
}

impl GridPoint {
    /// Create a point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift by `(-origin.x, -origin.y)` and return the pixel center in float space.
    pub fn to_pixel_center(self, origin: GridPoint) -> Point {
        Point::new(
            f64::from(self.x - origin.x) + 0.5,
            f64::from(self.y - origin.y) + 0.5,
        )
    }
}

impl From<(i32, i32)> for GridPoint {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// One continuous pen movement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stroke {
    points: Vec<GridPoint>,
}

impl Stroke {
    /// Wrap an ordered point list.
    pub fn new(points: Vec<GridPoint>) -> Self {
        Self { points }
    }

    /// Pair `xs` with `ys` positionally, stopping at the shorter sequence.
    pub fn from_xy(xs: &[i32], ys: &[i32]) -> Self {
        Self::new(
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| GridPoint::new(x, y))
                .collect(),
        )
    }

    /// Points in drawing order.
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Return `true` when the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A stroke needs two points to contain a line segment. Shorter strokes are kept in the
    /// sketch but never contribute to extent or rendering.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// One complete drawing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sketch {
    strokes: Vec<Stroke>,
}

impl Sketch {
    /// Wrap an ordered stroke list.
    pub fn new(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// All strokes, including degenerate ones.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Strokes with at least two points.
    pub fn drawable_strokes(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.strokes.iter().filter(|s| s.is_drawable())
    }

    /// Number of points across all drawable strokes.
    pub fn drawable_point_count(&self) -> usize {
        self.drawable_strokes().map(Stroke::len).sum()
    }
}

impl FromIterator<Stroke> for Sketch {
    fn from_iter<T: IntoIterator<Item = Stroke>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
