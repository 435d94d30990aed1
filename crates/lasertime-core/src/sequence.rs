//! Whole-sequence transforms over ordered movement lists.

use crate::geometry::{BoundingBox, Movement};
use tracing::trace;

/// Offsets smaller than this are treated as already at the origin.
const ORIGIN_TOLERANCE: f64 = 1e-6;

/// Inserts a positioning movement wherever consecutive movements do not touch.
///
/// Two movements are adjacent when the previous end and the next start differ
/// by at most `epsilon` on both axes. The result is fully connected.
pub fn connect_gaps(movements: &[Movement], epsilon: f64) -> Vec<Movement> {
    let Some(first) = movements.first() else {
        return Vec::new();
    };

    let mut result = Vec::with_capacity(movements.len() * 2);
    result.push(*first);

    for current in &movements[1..] {
        let prev_end = result[result.len() - 1].end;
        if (prev_end.x - current.start.x).abs() > epsilon
            || (prev_end.y - current.start.y).abs() > epsilon
        {
            result.push(Movement::travel(prev_end, current.start));
        }
        result.push(*current);
    }

    trace!(
        inserted = result.len() - movements.len(),
        "connected movement gaps"
    );
    result
}

/// Bounding box over every start and end point of `movements`.
pub fn bounding_box(movements: &[Movement]) -> Option<BoundingBox> {
    BoundingBox::from_points(movements.iter().flat_map(|m| [&m.start, &m.end]))
}

/// Translates all movements so the bounding box minimum sits at (0, 0).
///
/// Returns the input unchanged when it is empty or already at the origin.
pub fn normalize_to_origin(movements: &[Movement]) -> Vec<Movement> {
    let Some(bounds) = bounding_box(movements) else {
        return movements.to_vec();
    };

    let (min_x, min_y) = (bounds.min.x, bounds.min.y);
    if min_x.abs() < ORIGIN_TOLERANCE && min_y.abs() < ORIGIN_TOLERANCE {
        return movements.to_vec();
    }

    trace!(dx = -min_x, dy = -min_y, "normalized movements to origin");
    movements
        .iter()
        .map(|m| m.translated(-min_x, -min_y))
        .collect()
}
