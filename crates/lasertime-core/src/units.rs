//! Feed-rate unit utilities
//!
//! Calibration data and machine constants are stored in mm/min. These helpers
//! convert to the other units used when reporting or computing move times.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Feed rate units selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedRateUnits {
    /// Millimeters per minute
    #[default]
    MmPerMin,
    /// Millimeters per second
    MmPerSec,
    /// Meters per minute
    MPerMin,
    /// Inches per minute
    InPerMin,
}

impl fmt::Display for FeedRateUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MmPerMin => write!(f, "mm/min"),
            Self::MmPerSec => write!(f, "mm/s"),
            Self::MPerMin => write!(f, "m/min"),
            Self::InPerMin => write!(f, "in/min"),
        }
    }
}

impl FromStr for FeedRateUnits {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm/min" | "mm_per_min" | "mmpm" => Ok(Self::MmPerMin),
            "mm/s" | "mm/sec" | "mm_per_sec" => Ok(Self::MmPerSec),
            "m/min" | "m_per_min" => Ok(Self::MPerMin),
            "in/min" | "ipm" | "in_per_min" => Ok(Self::InPerMin),
            _ => Err(CoreError::UnknownUnit(s.to_string())),
        }
    }
}

/// Converts a feed rate in mm/min to mm/s.
pub fn mm_per_min_to_mm_per_sec(value_mm_per_min: f64) -> f64 {
    value_mm_per_min / 60.0
}

/// Converts a feed rate in mm/min to the requested units.
pub fn convert_feed_rate(value_mm_per_min: f64, units: FeedRateUnits) -> f64 {
    match units {
        FeedRateUnits::MmPerMin => value_mm_per_min,
        FeedRateUnits::MmPerSec => mm_per_min_to_mm_per_sec(value_mm_per_min),
        FeedRateUnits::MPerMin => value_mm_per_min / 1000.0,
        FeedRateUnits::InPerMin => value_mm_per_min / 25.4,
    }
}

/// Format feed rate value for display
///
/// * `value_mm_per_min` - Feed rate in mm/min
/// * `units` - Target feed rate units
pub fn format_feed_rate(value_mm_per_min: f64, units: FeedRateUnits) -> String {
    format!("{:.2} {}", convert_feed_rate(value_mm_per_min, units), units)
}
