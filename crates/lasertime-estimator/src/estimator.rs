//! The estimation facade tying tables, machine profile and optimizer together.

use crate::accumulator::{accumulate, ResolvedParameters};
use crate::machine::MachineProfile;
use crate::optimizer::PathOptimizer;
use crate::params::CalibrationTables;
use crate::result::{CuttingTimeOptions, CuttingTimeResult};
use lasertime_core::Movement;
use tracing::debug;

/// Estimates cutting time for movement lists.
///
/// Holds only read-only configuration, so one instance can serve any number
/// of threads.
#[derive(Debug, Clone, Default)]
pub struct CuttingTimeEstimator {
    tables: CalibrationTables,
    machine: MachineProfile,
    optimizer: PathOptimizer,
}

impl CuttingTimeEstimator {
    pub fn new(tables: CalibrationTables, machine: MachineProfile, optimizer: PathOptimizer) -> Self {
        Self {
            tables,
            machine,
            optimizer,
        }
    }

    pub fn tables(&self) -> &CalibrationTables {
        &self.tables
    }

    pub fn machine(&self) -> &MachineProfile {
        &self.machine
    }

    pub fn optimizer(&self) -> &PathOptimizer {
        &self.optimizer
    }

    /// Cutting speed in mm/min for `thickness` mm.
    pub fn resolve_cutting_speed(&self, thickness: f64) -> f64 {
        self.tables.cutting_speed.lookup(thickness)
    }

    /// Pierce duration in seconds for `thickness` mm.
    pub fn resolve_pierce_time(&self, thickness: f64) -> f64 {
        self.tables.pierce_time.lookup(thickness)
    }

    /// Kerf in mm: the explicit override, else the calibrated value, else 0.
    pub fn resolve_kerf(&self, options: &CuttingTimeOptions) -> f64 {
        let kerf = options
            .kerf
            .or_else(|| self.tables.kerf.exact(options.material_thickness))
            .unwrap_or(0.0);
        if kerf.is_finite() {
            kerf
        } else {
            0.0
        }
    }

    /// Resolves all per-job parameters for `options`.
    pub fn resolve(&self, options: &CuttingTimeOptions) -> ResolvedParameters {
        ResolvedParameters {
            cutting_speed: self.resolve_cutting_speed(options.material_thickness),
            pierce_time: self.resolve_pierce_time(options.material_thickness),
            kerf: self.resolve_kerf(options),
            scale_factor: options.scale(),
            thickness: options.material_thickness,
        }
    }

    /// Estimates time and distance for `movements`.
    pub fn estimate(&self, movements: &[Movement], options: &CuttingTimeOptions) -> CuttingTimeResult {
        if movements.is_empty() {
            return CuttingTimeResult::default();
        }

        let optimized;
        let sequence = if options.optimize {
            optimized = self.optimizer.optimize(movements);
            optimized.as_slice()
        } else {
            movements
        };

        let params = self.resolve(options);
        debug!(
            thickness = params.thickness,
            cutting_speed = params.cutting_speed,
            pierce_time = params.pierce_time,
            kerf = params.kerf,
            movements = sequence.len(),
            "estimating cutting time"
        );

        accumulate(sequence, &params, &self.machine)
    }
}
