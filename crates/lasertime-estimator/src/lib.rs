//! # LaserTime Estimator
//!
//! Estimates how long a laser cutter takes to run a 2D job.
//!
//! - **Parameter tables**: thickness-indexed cutting speed, pierce time and kerf
//!   with linear interpolation and range clamping
//! - **Machine profile**: rapid/head-down/jump positioning bands and the flat
//!   acceleration penalty
//! - **Path optimizer**: greedy nearest-neighbour segment ordering with reversal
//! - **Accumulator**: single-pass time, distance and pierce totals
//!
//! ```
//! use lasertime_core::{Movement, Point};
//! use lasertime_estimator::{CuttingTimeEstimator, CuttingTimeOptions};
//!
//! let estimator = CuttingTimeEstimator::default();
//! let square = [
//!     Movement::cut(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
//!     Movement::cut(Point::new(10.0, 0.0), Point::new(10.0, 10.0)),
//!     Movement::cut(Point::new(10.0, 10.0), Point::new(0.0, 10.0)),
//!     Movement::cut(Point::new(0.0, 10.0), Point::new(0.0, 0.0)),
//! ];
//! let result = estimator.estimate(&square, &CuttingTimeOptions::new(2.0));
//! assert_eq!(result.pierce_count, 1);
//! ```

pub mod accumulator;
pub mod error;
pub mod estimator;
pub mod machine;
pub mod optimizer;
pub mod params;
pub mod result;

pub use accumulator::{accumulate, Accumulator, ResolvedParameters};
pub use error::{EstimateError, EstimateResult, ParameterTableError};
pub use estimator::CuttingTimeEstimator;
pub use machine::{MachineProfile, MovementCost, TravelMode};
pub use optimizer::{OptimizerSettings, PathOptimizer};
pub use params::{CalibrationTables, LookupPolicy, ParameterTable};
pub use result::{CuttingTimeOptions, CuttingTimeResult};
