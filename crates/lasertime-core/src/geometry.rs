//! Points, movements and bounding boxes in machine-table millimetres.

use serde::{Deserialize, Serialize};

/// Tolerance (mm, per axis) under which two points count as connected.
pub const ADJACENCY_EPSILON: f64 = 0.01;

/// A point on the machine table, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The table origin.
    pub const fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns true when both axes differ by less than `epsilon`.
    pub fn approx_eq(&self, other: &Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// A straight head movement, either cutting (beam on) or positioning.
///
/// Movements are plain values: reversing or translating one produces a new
/// movement and leaves the original untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub start: Point,
    pub end: Point,
    pub is_cutting: bool,
}

impl Movement {
    /// Creates a new movement.
    pub const fn new(start: Point, end: Point, is_cutting: bool) -> Self {
        Self {
            start,
            end,
            is_cutting,
        }
    }

    /// Creates a cutting movement.
    pub const fn cut(start: Point, end: Point) -> Self {
        Self::new(start, end, true)
    }

    /// Creates a positioning (beam off) movement.
    pub const fn travel(start: Point, end: Point) -> Self {
        Self::new(start, end, false)
    }

    /// Straight-line length of the movement.
    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// The same movement traversed end to start.
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start, self.is_cutting)
    }

    /// The same movement shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.start.translated(dx, dy),
            self.end.translated(dx, dy),
            self.is_cutting,
        )
    }

    /// Returns true when `next` starts where this movement ends, within `epsilon`.
    pub fn connects_to(&self, next: &Movement, epsilon: f64) -> bool {
        self.end.approx_eq(&next.start, epsilon)
    }
}

/// Axis-aligned bounds of a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

impl BoundingBox {
    /// Creates a degenerate box around a single point.
    pub fn from_point(p: Point) -> Self {
        Self { min: p, max: p }
    }

    /// Smallest box containing all `points`, or `None` when there are no finite points.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut bounds: Option<BoundingBox> = None;
        for p in points.into_iter().filter(|p| p.is_finite()) {
            match bounds.as_mut() {
                Some(b) => b.include(*p),
                None => bounds = Some(Self::from_point(*p)),
            }
        }
        bounds
    }

    /// Grows the box to contain `p`.
    pub fn include(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
}
