//! Configuration file handling.
//!
//! A configuration bundles the machine motion profile, the thickness
//! calibration tables, optimizer settings and per-job defaults. Files may be
//! JSON or TOML, chosen by extension. Missing sections fall back to the
//! GS3015 defaults.

use crate::error::{SettingsError, SettingsResult};
use lasertime_estimator::{
    CalibrationTables, CuttingTimeEstimator, CuttingTimeOptions, MachineProfile, OptimizerSettings,
    PathOptimizer,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory name under the platform config directory.
pub const APP_DIR: &str = "lasertime";
/// File name of the default configuration.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(SettingsError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                path.display()
            ))),
        }
    }
}

/// Defaults applied to every estimation unless overridden per job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateDefaults {
    /// Reorder the cutting path before estimating.
    pub optimize: bool,
    /// Multiplier applied to all times and distances.
    pub scale_factor: f64,
    /// Material thickness (mm) used when a job does not give one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
}

impl Default for EstimateDefaults {
    fn default() -> Self {
        Self {
            optimize: false,
            scale_factor: 1.0,
            thickness: None,
        }
    }
}

impl EstimateDefaults {
    /// Job options for `thickness` with these defaults filled in.
    pub fn options(&self, thickness: f64) -> CuttingTimeOptions {
        CuttingTimeOptions::new(thickness)
            .with_optimize(self.optimize)
            .with_scale_factor(self.scale_factor)
    }
}

/// Complete LaserTime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub machine: MachineProfile,
    pub calibration: CalibrationTables,
    pub optimizer: OptimizerSettings,
    pub estimate: EstimateDefaults,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/lasertime/config.toml` for the current platform.
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Loads config from file (JSON or TOML) and validates it.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!(path = %path.display(), machine = %config.machine.name, "loaded config");
        Ok(config)
    }

    /// Saves config to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Loads `path`, or the default path when `None`.
    ///
    /// A missing file yields the built-in defaults; an unreadable or invalid
    /// one is an error.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Ok(p) => p,
                Err(e) => {
                    debug!(error = %e, "using built-in config");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_file(&path)
    }

    /// Validates configuration.
    pub fn validate(&self) -> SettingsResult<()> {
        let m = &self.machine;

        positive("machine.rapid_speed", m.rapid_speed)?;
        non_negative("machine.acceleration_time", m.acceleration_time)?;
        non_negative(
            "machine.min_distance_for_acceleration",
            m.min_distance_for_acceleration,
        )?;
        non_negative("machine.setup_time", m.setup_time)?;
        positive("machine.max_distance_for_head_down", m.max_distance_for_head_down)?;
        positive("machine.max_distance_for_jump", m.max_distance_for_jump)?;
        if m.max_distance_for_head_down >= m.max_distance_for_jump {
            return Err(SettingsError::invalid(
                "machine.max_distance_for_jump",
                "must be greater than max_distance_for_head_down",
            ));
        }
        positive("machine.head_down_speed_factor", m.head_down_speed_factor)?;
        positive("machine.jump_speed_factor", m.jump_speed_factor)?;

        non_negative("optimizer.epsilon", self.optimizer.epsilon)?;

        positive("estimate.scale_factor", self.estimate.scale_factor)?;
        if let Some(thickness) = self.estimate.thickness {
            positive("estimate.thickness", thickness)?;
        }

        Ok(())
    }

    /// Builds an estimator from this configuration.
    pub fn estimator(&self) -> CuttingTimeEstimator {
        CuttingTimeEstimator::new(
            self.calibration.clone(),
            self.machine.clone(),
            PathOptimizer::new(self.optimizer.clone()),
        )
    }
}

fn positive(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be > 0, got {value}")))
    }
}

fn non_negative(key: &str, value: f64) -> SettingsResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::invalid(key, format!("must be >= 0, got {value}")))
    }
}
