//! Thickness-indexed calibration tables.
//!
//! Each table maps material thickness (mm) to a machine parameter: cutting
//! speed, pierce duration or kerf allowance. Lookups between calibrated
//! thicknesses interpolate linearly; lookups outside the calibrated range
//! clamp to the nearest end value.

use crate::error::ParameterTableError;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Which branch of the lookup produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPolicy {
    /// The thickness matched a calibrated key.
    Exact,
    /// Thinner than the smallest key; smallest key's value used.
    BelowRange,
    /// Thicker than the largest key; largest key's value used.
    AboveRange,
    /// Linear interpolation between the two bracketing keys.
    Interpolated,
    /// Fallback to the closest key. Only reachable for NaN input.
    Nearest,
}

/// An immutable thickness → value mapping with strictly increasing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct ParameterTable {
    entries: Vec<(f64, f64)>,
}

impl ParameterTable {
    /// Builds a table from `(thickness, value)` pairs in increasing thickness order.
    pub fn new<I>(entries: I) -> Result<Self, ParameterTableError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let entries: Vec<(f64, f64)> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(ParameterTableError::Empty);
        }

        for (index, &(key, value)) in entries.iter().enumerate() {
            if !key.is_finite() {
                return Err(ParameterTableError::NonFiniteKey { index, key });
            }
            if !value.is_finite() {
                return Err(ParameterTableError::NonFiniteValue { key, value });
            }
            if index > 0 {
                let previous = entries[index - 1].0;
                if key <= previous {
                    return Err(ParameterTableError::NotIncreasing { previous, key });
                }
            }
        }

        Ok(Self { entries })
    }

    /// Built-in calibration data, already known to be valid.
    pub(crate) fn from_static(entries: &[(f64, f64)]) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self {
            entries: entries.to_vec(),
        }
    }

    /// Number of calibrated thicknesses.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calibrated thicknesses in increasing order.
    pub fn keys(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn entries(&self) -> &[(f64, f64)] {
        &self.entries
    }

    /// Value for exactly this thickness, without interpolation.
    pub fn exact(&self, thickness: f64) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| *k == thickness)
            .map(|(_, v)| *v)
    }

    /// Value for `thickness`, interpolated or clamped as needed.
    pub fn lookup(&self, thickness: f64) -> f64 {
        self.resolve(thickness).0
    }

    /// Value for `thickness` together with the branch that produced it.
    pub fn resolve(&self, thickness: f64) -> (f64, LookupPolicy) {
        let entries = &self.entries;
        let (first_key, first_value) = entries[0];
        let (last_key, last_value) = entries[entries.len() - 1];

        // First index whose key is not below the thickness (0 for NaN).
        let idx = entries.partition_point(|(k, _)| *k < thickness);

        let resolved = match idx {
            i if i < entries.len() && entries[i].0 == thickness => {
                (entries[i].1, LookupPolicy::Exact)
            }
            _ if thickness < first_key => (first_value, LookupPolicy::BelowRange),
            _ if thickness > last_key => (last_value, LookupPolicy::AboveRange),
            i if i > 0 && i < entries.len() => {
                let (lo, v_lo) = entries[i - 1];
                let (hi, v_hi) = entries[i];
                let ratio = (thickness - lo) / (hi - lo);
                (v_lo + ratio * (v_hi - v_lo), LookupPolicy::Interpolated)
            }
            _ => (self.nearest(thickness), LookupPolicy::Nearest),
        };

        trace!(thickness, value = resolved.0, policy = ?resolved.1, "parameter lookup");
        resolved
    }

    fn nearest(&self, thickness: f64) -> f64 {
        let mut best = self.entries[0];
        for &(key, value) in &self.entries[1..] {
            if (key - thickness).abs() < (best.0 - thickness).abs() {
                best = (key, value);
            }
        }
        best.1
    }
}

impl TryFrom<Vec<(f64, f64)>> for ParameterTable {
    type Error = ParameterTableError;

    fn try_from(entries: Vec<(f64, f64)>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<ParameterTable> for Vec<(f64, f64)> {
    fn from(table: ParameterTable) -> Self {
        table.entries
    }
}

/// GloryStar GS3015 cutting speeds (mm/min).
pub const GS3015_CUTTING_SPEEDS: &[(f64, f64)] = &[
    (0.5, 16000.0),
    (0.9, 6200.0),
    (1.2, 6000.0),
    (1.5, 4000.0),
    (2.0, 3400.0),
    (2.65, 3400.0),
    (3.0, 3400.0),
    (4.75, 2100.0),
    (5.0, 2200.0),
    (6.35, 1670.0),
    (8.0, 1370.0),
    (9.5, 1100.0),
    (12.7, 842.0),
];

/// GloryStar GS3015 pierce durations (s).
pub const GS3015_PIERCE_TIMES: &[(f64, f64)] = &[
    (0.5, 0.5),
    (0.9, 0.1),
    (1.2, 0.3),
    (1.5, 0.4),
    (2.0, 0.2),
    (2.65, 0.2),
    (3.0, 0.3),
    (4.75, 0.8),
    (5.0, 0.4),
    (6.35, 0.8),
    (8.0, 0.8),
    (9.5, 0.8),
    (12.7, 1.6),
];

/// GloryStar GS3015 kerf allowances (mm).
pub const GS3015_KERF: &[(f64, f64)] = &[
    (0.5, 0.0),
    (0.9, 0.05),
    (1.2, 0.1),
    (1.5, 0.35),
    (2.0, 0.25),
    (2.65, 0.25),
    (3.0, 0.3),
    (4.75, 0.35),
    (5.0, 0.35),
    (6.35, 0.25),
    (8.0, 0.4),
    (9.5, 0.4),
    (12.7, 1.4),
];

/// The three calibration tables for one machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationTables {
    /// Cutting speed in mm/min.
    pub cutting_speed: ParameterTable,
    /// Pierce duration in seconds.
    pub pierce_time: ParameterTable,
    /// Kerf allowance in mm. Looked up by exact thickness only.
    pub kerf: ParameterTable,
}

impl CalibrationTables {
    pub fn gs3015() -> Self {
        Self {
            cutting_speed: ParameterTable::from_static(GS3015_CUTTING_SPEEDS),
            pierce_time: ParameterTable::from_static(GS3015_PIERCE_TIMES),
            kerf: ParameterTable::from_static(GS3015_KERF),
        }
    }
}

impl Default for CalibrationTables {
    fn default() -> Self {
        Self::gs3015()
    }
}
