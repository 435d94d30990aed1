//! # LaserTime Import
//!
//! Turns SVG and DXF drawings into the ordered movement lists consumed by
//! the estimator. Curves are tessellated, block and group instances are
//! flattened to absolute coordinates, and closed shapes carry an explicit
//! closing movement.

pub mod contour;
pub mod dxf_file;
pub mod error;
pub mod svg;
pub mod svg_path;
pub mod transform;

pub use contour::Contour;
pub use dxf_file::DxfImporter;
pub use error::{ImportError, ImportResult};
pub use svg::SvgImporter;

use lasertime_core::{BoundingBox, Movement};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Supported drawing formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Svg,
    Dxf,
}

impl FileFormat {
    /// Format from the file extension, ignoring case.
    pub fn from_path(path: &Path) -> ImportResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "svg" => Ok(Self::Svg),
            "dxf" => Ok(Self::Dxf),
            _ => Err(ImportError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => write!(f, "SVG"),
            Self::Dxf => write!(f, "DXF"),
        }
    }
}

/// Movements extracted from one drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedGeometry {
    pub movements: Vec<Movement>,
    /// Extent of the drawing's points, `None` when nothing was cuttable.
    pub bounds: Option<BoundingBox>,
    pub format: FileFormat,
    /// Drawing elements that produced at least one contour.
    pub element_count: usize,
}

impl ImportedGeometry {
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}

/// Imports drawing content already held in memory.
pub fn import_str(content: &str, format: FileFormat) -> ImportResult<ImportedGeometry> {
    match format {
        FileFormat::Svg => SvgImporter::default().import_str(content),
        FileFormat::Dxf => DxfImporter::default().import_str(content),
    }
}

/// Reads and imports a drawing, choosing the importer by extension.
pub fn import_file(path: &Path) -> ImportResult<ImportedGeometry> {
    let format = FileFormat::from_path(path)?;
    let io_err = |source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let geometry = match format {
        FileFormat::Svg => {
            let content = std::fs::read_to_string(path).map_err(io_err)?;
            SvgImporter::default().import_str(&content)?
        }
        FileFormat::Dxf => {
            let bytes = std::fs::read(path).map_err(io_err)?;
            DxfImporter::default().import_bytes(&bytes)?
        }
    };

    info!(
        path = %path.display(),
        format = %format,
        movements = geometry.movements.len(),
        "imported drawing"
    );
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.svg")).unwrap(), FileFormat::Svg);
        assert_eq!(FileFormat::from_path(Path::new("B.DXF")).unwrap(), FileFormat::Dxf);
        assert!(matches!(
            FileFormat::from_path(Path::new("part.nc")),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(FileFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_import_str_dispatch() {
        let g = import_str(
            r#"<svg><line x1="0" y1="0" x2="10" y2="0"/></svg>"#,
            FileFormat::Svg,
        )
        .unwrap();
        assert_eq!(g.format, FileFormat::Svg);
        assert_eq!(g.movements.len(), 2);
        assert!(!g.is_empty());
    }

    #[test]
    fn test_format_display() {
        assert_eq!(FileFormat::Svg.to_string(), "SVG");
        assert_eq!(FileFormat::Dxf.to_string(), "DXF");
    }
}
