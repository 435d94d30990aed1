//! Greedy nearest-neighbour reordering of cutting segments.
//!
//! Cutting movements are grouped into contiguous segments, then visited in
//! nearest-entry order starting from the machine home. A segment may be cut
//! backwards when its far end is strictly closer.

use lasertime_core::{connect_gaps, normalize_to_origin, Movement, Point, ADJACENCY_EPSILON};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Path optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    /// Per-axis tolerance (mm) for treating two points as connected.
    pub epsilon: f64,
    /// Insert positioning moves between disconnected movements first.
    pub connect_gaps: bool,
    /// Translate the drawing so its bounding box starts at the origin first.
    pub normalize_to_origin: bool,
    /// Head position when the job starts.
    pub start: Point,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            epsilon: ADJACENCY_EPSILON,
            connect_gaps: true,
            normalize_to_origin: true,
            start: Point::origin(),
        }
    }
}

/// A maximal run of connected cutting movements.
#[derive(Debug, Clone)]
struct Segment {
    movements: Vec<Movement>,
}

impl Segment {
    fn entry(&self) -> Point {
        self.movements[0].start
    }

    fn exit(&self) -> Point {
        self.movements[self.movements.len() - 1].end
    }

    fn is_reversible(&self) -> bool {
        self.movements.len() > 1
    }

    /// Appends the segment to `out`, optionally traversed end to start.
    fn emit(&self, reversed: bool, out: &mut Vec<Movement>) {
        if reversed {
            out.extend(self.movements.iter().rev().map(Movement::reversed));
        } else {
            out.extend_from_slice(&self.movements);
        }
    }
}

/// Groups cutting movements into segments; positioning movements end a segment and are dropped.
fn collect_segments(movements: &[Movement], epsilon: f64) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current: Vec<Movement> = Vec::new();

    for movement in movements {
        if !movement.is_cutting {
            if !current.is_empty() {
                segments.push(Segment {
                    movements: std::mem::take(&mut current),
                });
            }
            continue;
        }

        match current.last() {
            Some(prev) if !prev.connects_to(movement, epsilon) => {
                segments.push(Segment {
                    movements: std::mem::replace(&mut current, vec![*movement]),
                });
            }
            _ => current.push(*movement),
        }
    }

    if !current.is_empty() {
        segments.push(Segment { movements: current });
    }
    segments
}

/// Reorders a movement list to shorten positioning travel.
#[derive(Debug, Clone, Default)]
pub struct PathOptimizer {
    settings: OptimizerSettings,
}

impl PathOptimizer {
    pub fn new(settings: OptimizerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    /// Returns a reordered copy of `movements`; the input is left untouched.
    pub fn optimize(&self, movements: &[Movement]) -> Vec<Movement> {
        let eps = self.settings.epsilon;

        let mut prepared = movements.to_vec();
        if self.settings.connect_gaps {
            prepared = connect_gaps(&prepared, eps);
        }
        if self.settings.normalize_to_origin {
            prepared = normalize_to_origin(&prepared);
        }

        if prepared.len() <= 1 {
            return prepared;
        }

        let segments = collect_segments(&prepared, eps);
        if segments.is_empty() {
            return prepared;
        }

        let mut consumed = vec![false; segments.len()];
        let mut result = Vec::with_capacity(prepared.len() + segments.len());
        let mut position = self.settings.start;

        for _ in 0..segments.len() {
            let mut best: Option<(usize, bool)> = None;
            let mut best_distance = f64::INFINITY;

            for (index, segment) in segments.iter().enumerate() {
                if consumed[index] {
                    continue;
                }
                let to_entry = position.distance_to(&segment.entry());
                if to_entry < best_distance {
                    best_distance = to_entry;
                    best = Some((index, false));
                }
                if segment.is_reversible() {
                    let to_exit = position.distance_to(&segment.exit());
                    if to_exit < best_distance {
                        best_distance = to_exit;
                        best = Some((index, true));
                    }
                }
            }

            // NaN distances never compare smaller; take the first remaining segment.
            let (index, reversed) = best
                .or_else(|| consumed.iter().position(|c| !c).map(|i| (i, false)))
                .unwrap_or((0, false));

            let segment = &segments[index];
            let (entry, exit) = if reversed {
                (segment.exit(), segment.entry())
            } else {
                (segment.entry(), segment.exit())
            };

            if !position.approx_eq(&entry, eps) {
                result.push(Movement::travel(position, entry));
            }
            segment.emit(reversed, &mut result);
            position = exit;
            consumed[index] = true;
        }

        if result.len() > 1 && !result[0].is_cutting && result[0].end == result[1].start {
            result.remove(0);
        }

        debug!(
            input = movements.len(),
            output = result.len(),
            segments = segments.len(),
            "optimized cutting path"
        );
        result
    }
}
