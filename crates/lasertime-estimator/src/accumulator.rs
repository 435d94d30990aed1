//! Single-pass time and distance accumulation over a movement list.

use crate::machine::MachineProfile;
use crate::result::CuttingTimeResult;
use lasertime_core::Movement;

/// Per-job parameters resolved from the calibration tables and options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedParameters {
    /// mm/min
    pub cutting_speed: f64,
    /// Seconds per pierce.
    pub pierce_time: f64,
    /// mm
    pub kerf: f64,
    pub scale_factor: f64,
    /// Material thickness in mm.
    pub thickness: f64,
}

/// Running totals for one job.
///
/// A pierce is counted each time the sequence enters a run of cutting moves.
#[derive(Debug, Default)]
pub struct Accumulator {
    result: CuttingTimeResult,
    in_cutting_segment: bool,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one movement to the running totals.
    pub fn push(&mut self, movement: &Movement, params: &ResolvedParameters, machine: &MachineProfile) {
        let cost = machine.cost_of(movement, params.cutting_speed);
        let time = cost.time * params.scale_factor;
        let mut distance = cost.distance * params.scale_factor;

        // Kerf widens the reported cut length only; time stays at the calibrated value.
        if cost.is_cutting && params.kerf > 0.0 && params.thickness > 0.0 {
            distance *= 1.0 + params.kerf / params.thickness;
        }

        let r = &mut self.result;
        r.total_distance += distance;

        if cost.is_cutting {
            r.cutting_distance += distance;
            r.cutting_time_sec += time;
            if !self.in_cutting_segment {
                r.pierce_count += 1;
                r.piercing_time_sec += params.pierce_time;
                self.in_cutting_segment = true;
            }
        } else {
            r.movement_distance += distance;
            r.movement_time_sec += time;
            self.in_cutting_segment = false;
        }
    }

    /// Applies per-part setup time and totals everything up.
    pub fn finish(self, machine: &MachineProfile) -> CuttingTimeResult {
        let mut r = self.result;
        r.part_count = r.pierce_count;
        r.setup_time_sec = machine.setup_time * r.part_count as f64;
        r.total_time_sec =
            r.cutting_time_sec + r.movement_time_sec + r.piercing_time_sec + r.setup_time_sec;
        r
    }
}

/// Accumulates `movements` into a fresh result.
pub fn accumulate(
    movements: &[Movement],
    params: &ResolvedParameters,
    machine: &MachineProfile,
) -> CuttingTimeResult {
    if movements.is_empty() {
        return CuttingTimeResult::default();
    }

    let mut acc = Accumulator::new();
    for movement in movements {
        acc.push(movement, params, machine);
    }
    acc.finish(machine)
}
