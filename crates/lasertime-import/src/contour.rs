//! Point contours and their conversion into head movements.

use lasertime_core::{BoundingBox, Movement, Point};
use std::f64::consts::TAU;

/// Closing cut is skipped when the last point is this close (per axis) to the first.
pub const CLOSE_TOLERANCE: f64 = 0.001;

/// An ordered polyline extracted from a drawing element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Contour {
    pub fn open(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Applies `f` to every point.
    pub fn map_points<F>(mut self, f: F) -> Self
    where
        F: Fn(Point) -> Point,
    {
        for p in &mut self.points {
            *p = f(*p);
        }
        self
    }

    fn needs_closing(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.closed && self.points.len() > 1 => {
                (first.x - last.x).abs() > CLOSE_TOLERANCE
                    || (first.y - last.y).abs() > CLOSE_TOLERANCE
            }
            _ => false,
        }
    }

    /// Cutting movements along the contour, closing it when required.
    fn push_cuts(&self, out: &mut Vec<Movement>) {
        for pair in self.points.windows(2) {
            out.push(Movement::cut(pair[0], pair[1]));
        }
        if self.needs_closing() {
            let first = self.points[0];
            let last = self.points[self.points.len() - 1];
            out.push(Movement::cut(last, first));
        }
    }
}

/// Movements for contours cut in drawing order, starting from the origin.
///
/// Each contour is reached by a positioning move from wherever the previous
/// one ended.
pub fn sequence_contours(contours: &[Contour]) -> Vec<Movement> {
    let mut movements = Vec::new();
    let mut position = Point::origin();

    for contour in contours.iter().filter(|c| !c.is_empty()) {
        movements.push(Movement::travel(position, contour.points[0]));
        contour.push_cuts(&mut movements);
        position = movements[movements.len() - 1].end;
    }
    movements
}

/// Cutting movements only, with no positioning between contours.
pub fn trace_contours(contours: &[Contour]) -> Vec<Movement> {
    let mut movements = Vec::new();
    for contour in contours {
        contour.push_cuts(&mut movements);
    }
    movements
}

/// Bounds over every contour point.
pub fn contour_bounds(contours: &[Contour]) -> Option<BoundingBox> {
    BoundingBox::from_points(contours.iter().flat_map(|c| c.points.iter()))
}

/// `steps + 1` points around a full ellipse, the last coinciding with the first.
pub fn ellipse_points(center: Point, rx: f64, ry: f64, steps: usize) -> Vec<Point> {
    (0..=steps)
        .map(|i| {
            let angle = TAU * i as f64 / steps as f64;
            Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
        })
        .collect()
}

/// `steps + 1` points along an elliptical arc, angles in radians.
pub fn arc_points(
    center: Point,
    rx: f64,
    ry: f64,
    start_angle: f64,
    sweep: f64,
    steps: usize,
) -> Vec<Point> {
    (0..=steps)
        .map(|i| {
            let angle = start_angle + sweep * i as f64 / steps as f64;
            Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin())
        })
        .collect()
}
