//! Job reports for the command line.

use lasertime_estimator::{CuttingTimeOptions, CuttingTimeResult};
use lasertime_import::{FileFormat, ImportedGeometry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width and height (mm) of the area covered by a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutArea {
    pub width: f64,
    pub height: f64,
}

/// Everything reported for one estimated drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobReport {
    pub source: String,
    pub format: FileFormat,
    /// Material thickness in mm.
    pub thickness: f64,
    pub optimized: bool,
    pub result: CuttingTimeResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_area: Option<CutArea>,
}

impl JobReport {
    pub fn new(
        source: impl Into<String>,
        geometry: &ImportedGeometry,
        options: &CuttingTimeOptions,
        result: CuttingTimeResult,
    ) -> Self {
        Self {
            source: source.into(),
            format: geometry.format,
            thickness: options.material_thickness,
            optimized: options.optimize,
            result,
            cut_area: geometry.bounds.map(|b| CutArea {
                width: b.width(),
                height: b.height(),
            }),
        }
    }
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = &self.result;

        writeln!(f, "{} ({})", self.source, self.format)?;
        writeln!(
            f,
            "Thickness: {:.2} mm{}",
            self.thickness,
            if self.optimized { ", optimized path" } else { "" }
        )?;
        if let Some(area) = self.cut_area {
            writeln!(f, "Cut area:  {:.2} x {:.2} mm", area.width, area.height)?;
        }

        writeln!(f, "\nTimes")?;
        for (label, seconds) in [
            ("Total", r.total_time_sec),
            ("Cutting", r.cutting_time_sec),
            ("Movement", r.movement_time_sec),
            ("Piercing", r.piercing_time_sec),
            ("Setup", r.setup_time_sec),
        ] {
            writeln!(
                f,
                "  {:<10} {} ({:.2}s)",
                label,
                format_duration(seconds),
                seconds
            )?;
        }

        writeln!(f, "\nDistances")?;
        for (label, mm) in [
            ("Total", r.total_distance),
            ("Cutting", r.cutting_distance),
            ("Movement", r.movement_distance),
        ] {
            writeln!(f, "  {:<10} {:.2} mm", label, mm)?;
        }

        writeln!(f, "\nCounts")?;
        writeln!(f, "  {:<10} {}", "Pierces", r.pierce_count)?;
        writeln!(f, "  {:<10} {}", "Parts", r.part_count)
    }
}

/// Formats seconds as `hh:mm:ss.mmm`, truncating to whole milliseconds.
///
/// Negative and non-finite inputs format as zero.
pub fn format_duration(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).floor() as u64
    } else {
        0
    };

    let ms = total_ms % 1000;
    let secs = (total_ms / 1000) % 60;
    let minutes = (total_ms / 60_000) % 60;
    let hours = total_ms / 3_600_000;
    format!("{hours:02}:{minutes:02}:{secs:02}.{ms:03}")
}
