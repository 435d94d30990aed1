//! Job options and the estimation result.

use crate::error::{EstimateError, EstimateResult};
use serde::{Deserialize, Serialize};

/// Options for a single estimation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingTimeOptions {
    /// Material thickness in mm.
    pub material_thickness: f64,
    /// Kerf override in mm. Falls back to the calibrated value for this exact thickness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kerf: Option<f64>,
    /// Multiplier applied to all times and distances. Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_factor: Option<f64>,
    /// Reorder the cutting path before accumulating.
    #[serde(default)]
    pub optimize: bool,
}

impl CuttingTimeOptions {
    pub fn new(material_thickness: f64) -> Self {
        Self {
            material_thickness,
            kerf: None,
            scale_factor: None,
            optimize: false,
        }
    }

    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.kerf = Some(kerf);
        self
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = Some(scale_factor);
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Effective scale factor.
    pub fn scale(&self) -> f64 {
        self.scale_factor.unwrap_or(1.0)
    }

    /// Checks the options up front.
    ///
    /// Estimation accepts any options; this is for callers that want to reject
    /// nonsensical input before running a job.
    pub fn validate(&self) -> EstimateResult<()> {
        if !self.material_thickness.is_finite() || self.material_thickness <= 0.0 {
            return Err(EstimateError::InvalidOption {
                name: "material_thickness".to_string(),
                reason: format!("must be a positive number, got {}", self.material_thickness),
            });
        }
        if let Some(scale) = self.scale_factor {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(EstimateError::InvalidOption {
                    name: "scale_factor".to_string(),
                    reason: format!("must be a positive number, got {}", scale),
                });
            }
        }
        if let Some(kerf) = self.kerf {
            if !kerf.is_finite() || kerf < 0.0 {
                return Err(EstimateError::InvalidOption {
                    name: "kerf".to_string(),
                    reason: format!("must be zero or positive, got {}", kerf),
                });
            }
        }
        Ok(())
    }
}

/// Time and distance totals for one job.
///
/// Times are in seconds, distances in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CuttingTimeResult {
    pub total_time_sec: f64,
    pub cutting_time_sec: f64,
    pub movement_time_sec: f64,
    pub piercing_time_sec: f64,
    pub setup_time_sec: f64,
    pub total_distance: f64,
    pub cutting_distance: f64,
    pub movement_distance: f64,
    pub pierce_count: usize,
    /// Always equal to `pierce_count`: every pierce is counted as one part.
    pub part_count: usize,
}
