use lasertime_core::Point;
use lasertime_import::{import_file, FileFormat, ImportError};
use std::fs;
use tempfile::TempDir;

const PLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="200mm" height="100mm">
  <!-- <rect x="0" y="0" width="999" height="999"/> -->
  <g transform="translate(10 10)">
    <rect x="0" y="0" width="100" height="50"/>
    <circle cx="25" cy="25" r="10"/>
  </g>
  <path d="M 150 10 l 20 0 l 0 20 z"/>
  <text x="5" y="5">label</text>
</svg>"#;

fn cut_length(movements: &[lasertime_core::Movement]) -> f64 {
    movements
        .iter()
        .filter(|m| m.is_cutting)
        .map(|m| m.length())
        .sum()
}

#[test]
fn test_svg_file_import() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plate.svg");
    fs::write(&path, PLATE).unwrap();

    let g = import_file(&path).unwrap();
    assert_eq!(g.format, FileFormat::Svg);
    assert_eq!(g.element_count, 3);

    // one positioning move per contour, starting at the origin
    let travels: Vec<_> = g.movements.iter().filter(|m| !m.is_cutting).collect();
    assert_eq!(travels.len(), 3);
    assert_eq!(travels[0].start, Point::origin());
    assert_eq!(travels[0].end, Point::new(10.0, 10.0));

    let triangle = 20.0 + 20.0 + (800.0f64).sqrt();
    let circle = std::f64::consts::TAU * 10.0;
    let expected = 300.0 + circle + triangle;
    assert!((cut_length(&g.movements) - expected).abs() < 0.2);

    let bounds = g.bounds.unwrap();
    assert!(bounds.min.approx_eq(&Point::new(10.0, 10.0), 1e-6));
    assert!(bounds.max.approx_eq(&Point::new(170.0, 60.0), 1e-6));
}

#[test]
fn test_extension_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("PART.SVG");
    fs::write(&path, r#"<svg><polyline points="0,0 5,0 5,5"/></svg>"#).unwrap();

    let g = import_file(&path).unwrap();
    assert_eq!(g.movements.len(), 3);
    assert!((cut_length(&g.movements) - 10.0).abs() < 1e-9);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nowhere.dxf");

    match import_file(&path) {
        Err(ImportError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("part.gcode");
    fs::write(&path, "G0 X0 Y0").unwrap();

    assert!(matches!(
        import_file(&path),
        Err(ImportError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_svg_without_root_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.svg");
    fs::write(&path, "<html><body>nothing</body></html>").unwrap();

    assert!(matches!(import_file(&path), Err(ImportError::SvgParse(_))));
}

#[test]
fn test_dxf_file_import() {
    use dxf::entities::{Circle, Entity, EntityType, Line};

    let mut drawing = dxf::Drawing::new();
    drawing.add_entity(Entity::new(EntityType::Line(Line::new(
        dxf::Point::new(50.0, 50.0, 0.0),
        dxf::Point::new(80.0, 50.0, 0.0),
    ))));
    drawing.add_entity(Entity::new(EntityType::Circle(Circle::new(
        dxf::Point::new(100.0, 60.0, 0.0),
        5.0,
    ))));

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("part.dxf");
    let mut file = fs::File::create(&path).unwrap();
    drawing.save(&mut file).unwrap();
    drop(file);

    let g = import_file(&path).unwrap();
    assert_eq!(g.format, FileFormat::Dxf);
    assert_eq!(g.element_count, 2);
    assert!(g.movements.iter().all(|m| m.is_cutting));
    assert_eq!(g.movements.len(), 1 + 32);

    let bounds = g.bounds.unwrap();
    assert!(bounds.min.approx_eq(&Point::new(50.0, 50.0), 1e-6));
    assert!(bounds.max.approx_eq(&Point::new(105.0, 65.0), 1e-6));

    // movements are shifted so the drawing starts at the origin
    assert!(g.movements[0].start.approx_eq(&Point::origin(), 1e-6));
}
