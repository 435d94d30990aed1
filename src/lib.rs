//! # LaserTime
//!
//! Estimates how long a 2D laser cutting job takes and how far the head
//! travels, from SVG or DXF drawings.
//!
//! ## Architecture
//!
//! LaserTime is organized as a workspace with multiple crates:
//!
//! 1. **lasertime-core** - Points, movements, bounding boxes, sequence transforms
//! 2. **lasertime-estimator** - Parameter tables, cost model, path optimizer, accumulator
//! 3. **lasertime-import** - SVG and DXF drawings to movement lists
//! 4. **lasertime-settings** - Machine profile and calibration configuration
//! 5. **lasertime** - Command-line binary and job reports

pub mod report;

pub use lasertime_core::{BoundingBox, FeedRateUnits, Movement, Point};
pub use lasertime_estimator::{
    CalibrationTables, CuttingTimeEstimator, CuttingTimeOptions, CuttingTimeResult,
    MachineProfile, OptimizerSettings, PathOptimizer, ParameterTable,
};
pub use lasertime_import::{import_file, import_str, FileFormat, ImportError, ImportedGeometry};
pub use lasertime_settings::{Config, SettingsError};
pub use report::{format_duration, CutArea, JobReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Info level unless `RUST_LOG` says otherwise, human-readable output on
/// stderr.
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(false, false)
}

/// Initialize logging for the command line.
///
/// `verbose` lowers the default level to debug. `json` switches to one JSON
/// object per event. Output always goes to stderr so reports on stdout stay
/// machine-readable.
pub fn init_logging_with(verbose: bool, json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .try_init()?;
    }

    Ok(())
}
