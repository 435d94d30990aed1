//! Machine motion constants and the per-movement cost model.

use lasertime_core::units::mm_per_min_to_mm_per_sec;
use lasertime_core::Movement;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Positioning speed (mm/min) of the GS3015.
pub const RAPID_SPEED: f64 = 16000.0;
/// Flat time penalty (s) for accelerating and decelerating on longer moves.
pub const ACCELERATION_TIME: f64 = 0.2;
/// Moves at least this long (mm) pay the acceleration penalty.
pub const MIN_DISTANCE_FOR_ACCELERATION: f64 = 5.0;
/// Fixed handling time (s) charged per part.
pub const SETUP_TIME: f64 = 1.5;
/// Positioning moves up to this length (mm) keep the head lowered.
pub const MAX_DISTANCE_FOR_HEAD_DOWN: f64 = 3.0;
/// Positioning moves up to this length (mm) lift the head for a short jump.
pub const MAX_DISTANCE_FOR_JUMP: f64 = 10.0;

/// How the head travels between cuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    /// Short move with the head lowered.
    HeadDown,
    /// Medium move with a brief lift.
    Jump,
    /// Full-speed rapid move.
    Rapid,
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeadDown => write!(f, "head-down"),
            Self::Jump => write!(f, "jump"),
            Self::Rapid => write!(f, "rapid"),
        }
    }
}

/// Time and distance charged for a single movement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementCost {
    /// Seconds.
    pub time: f64,
    /// Millimetres.
    pub distance: f64,
    pub is_cutting: bool,
}

/// Motion constants of a laser cutting machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineProfile {
    /// Display name.
    pub name: String,
    /// Rapid positioning speed in mm/min.
    pub rapid_speed: f64,
    /// Acceleration penalty in seconds.
    pub acceleration_time: f64,
    /// Minimum move length in mm that incurs the acceleration penalty.
    pub min_distance_for_acceleration: f64,
    /// Setup time per part in seconds.
    pub setup_time: f64,
    pub max_distance_for_head_down: f64,
    pub max_distance_for_jump: f64,
    /// Fraction of rapid speed used for head-down moves.
    pub head_down_speed_factor: f64,
    /// Fraction of rapid speed used for jump moves.
    pub jump_speed_factor: f64,
}

impl Default for MachineProfile {
    fn default() -> Self {
        Self::gs3015()
    }
}

impl MachineProfile {
    /// GloryStar GS3015 fiber laser.
    pub fn gs3015() -> Self {
        Self {
            name: "GloryStar GS3015".to_string(),
            rapid_speed: RAPID_SPEED,
            acceleration_time: ACCELERATION_TIME,
            min_distance_for_acceleration: MIN_DISTANCE_FOR_ACCELERATION,
            setup_time: SETUP_TIME,
            max_distance_for_head_down: MAX_DISTANCE_FOR_HEAD_DOWN,
            max_distance_for_jump: MAX_DISTANCE_FOR_JUMP,
            head_down_speed_factor: 0.8,
            jump_speed_factor: 0.9,
        }
    }

    /// Classifies a positioning move of `distance` mm.
    pub fn travel_mode(&self, distance: f64) -> TravelMode {
        if distance <= self.max_distance_for_head_down {
            TravelMode::HeadDown
        } else if distance <= self.max_distance_for_jump {
            TravelMode::Jump
        } else {
            TravelMode::Rapid
        }
    }

    /// Positioning speed (mm/min) for a move of `distance` mm.
    pub fn travel_speed(&self, distance: f64) -> f64 {
        match self.travel_mode(distance) {
            TravelMode::HeadDown => self.rapid_speed * self.head_down_speed_factor,
            TravelMode::Jump => self.rapid_speed * self.jump_speed_factor,
            TravelMode::Rapid => self.rapid_speed,
        }
    }

    /// Seconds needed to cover `distance` mm at `speed` mm/min.
    ///
    /// Returns 0 for non-positive or non-finite inputs.
    pub fn movement_time(&self, distance: f64, speed: f64) -> f64 {
        if distance <= 0.0 || speed <= 0.0 || !distance.is_finite() || !speed.is_finite() {
            return 0.0;
        }

        let time = distance / mm_per_min_to_mm_per_sec(speed);
        if distance < self.min_distance_for_acceleration {
            time
        } else {
            time + self.acceleration_time
        }
    }

    /// Cost of one movement; cutting moves run at `cutting_speed` mm/min.
    pub fn cost_of(&self, movement: &Movement, cutting_speed: f64) -> MovementCost {
        let distance = movement.length();
        if !distance.is_finite() {
            trace!(?movement, "neutralized non-finite movement");
            return MovementCost {
                time: 0.0,
                distance: 0.0,
                is_cutting: movement.is_cutting,
            };
        }

        let speed = if movement.is_cutting {
            cutting_speed
        } else {
            self.travel_speed(distance)
        };

        MovementCost {
            time: self.movement_time(distance, speed),
            distance,
            is_cutting: movement.is_cutting,
        }
    }
}
