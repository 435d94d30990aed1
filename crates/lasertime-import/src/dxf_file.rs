//! DXF drawing import.
//!
//! Entities are traced as cutting contours in file order with no positioning
//! moves between them. `INSERT` references are expanded from their block
//! definitions.

use crate::contour::{arc_points, ellipse_points, trace_contours, Contour};
use crate::error::{ImportError, ImportResult};
use crate::{FileFormat, ImportedGeometry};
use dxf::entities::EntityType;
use dxf::{Block, Drawing};
use lasertime_core::{normalize_to_origin, BoundingBox, Point};
use std::collections::HashMap;
use std::f64::consts::TAU;
use std::io::Read;
use tracing::{debug, warn};

/// Segments used to approximate a full circle.
pub const CIRCLE_STEPS: usize = 32;
/// Segments used to approximate an arc, whatever its sweep.
pub const ARC_STEPS: usize = 24;
/// Nesting limit for block references; deeper inserts are dropped.
const MAX_BLOCK_DEPTH: usize = 8;

/// Placement of a block reference in its parent's coordinates.
#[derive(Debug, Clone, Copy)]
struct Placement {
    base: Point,
    scale_x: f64,
    scale_y: f64,
    /// Radians, counter-clockwise.
    rotation: f64,
    location: Point,
}

impl Placement {
    fn apply(&self, p: Point) -> Point {
        let x = (p.x - self.base.x) * self.scale_x;
        let y = (p.y - self.base.y) * self.scale_y;
        let (sin, cos) = self.rotation.sin_cos();
        Point::new(
            x * cos - y * sin + self.location.x,
            x * sin + y * cos + self.location.y,
        )
    }
}

/// Innermost placement applies first.
fn place(chain: &[Placement], p: Point) -> Point {
    chain.iter().rev().fold(p, |p, placement| placement.apply(p))
}

fn to_point(p: &dxf::Point) -> Point {
    Point::new(p.x, p.y)
}

/// Converts DXF drawings into cutting movements.
#[derive(Debug, Clone)]
pub struct DxfImporter {
    pub circle_steps: usize,
    pub arc_steps: usize,
}

impl Default for DxfImporter {
    fn default() -> Self {
        Self {
            circle_steps: CIRCLE_STEPS,
            arc_steps: ARC_STEPS,
        }
    }
}

struct Walk<'a> {
    blocks: HashMap<&'a str, &'a Block>,
    chain: Vec<Placement>,
    contours: Vec<Contour>,
    /// Placed corners of the full circle around each arc.
    envelope: Vec<Point>,
    skipped: usize,
}

impl DxfImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Imports DXF content from a reader.
    pub fn import_reader<R: Read + ?Sized>(&self, reader: &mut R) -> ImportResult<ImportedGeometry> {
        let drawing = Drawing::load(reader).map_err(|e| ImportError::DxfParse(e.to_string()))?;
        Ok(self.import_drawing(&drawing))
    }

    pub fn import_bytes(&self, bytes: &[u8]) -> ImportResult<ImportedGeometry> {
        let mut cursor = std::io::Cursor::new(bytes);
        self.import_reader(&mut cursor)
    }

    pub fn import_str(&self, content: &str) -> ImportResult<ImportedGeometry> {
        self.import_bytes(content.as_bytes())
    }

    /// Traces every supported entity of an already loaded drawing.
    ///
    /// Bounds are reported in drawing coordinates; the movements are shifted
    /// so their minimum corner sits at the origin.
    pub fn import_drawing(&self, drawing: &Drawing) -> ImportedGeometry {
        let mut walk = Walk {
            blocks: drawing.blocks().map(|b| (b.name.as_str(), b)).collect(),
            chain: Vec::new(),
            contours: Vec::new(),
            envelope: Vec::new(),
            skipped: 0,
        };

        let mut element_count = 0;
        for entity in drawing.entities() {
            let before = walk.contours.len();
            self.visit(&entity.specific, &mut walk);
            if walk.contours.len() > before {
                element_count += 1;
            }
        }

        if walk.skipped > 0 {
            warn!(skipped = walk.skipped, "skipped unsupported DXF entities");
        }

        let bounds = BoundingBox::from_points(
            walk.contours
                .iter()
                .flat_map(|c| c.points.iter())
                .chain(walk.envelope.iter()),
        );
        let movements = normalize_to_origin(&trace_contours(&walk.contours));
        debug!(
            entities = element_count,
            contours = walk.contours.len(),
            movements = movements.len(),
            "imported DXF"
        );

        ImportedGeometry {
            movements,
            bounds,
            format: FileFormat::Dxf,
            element_count,
        }
    }

    fn visit<'a>(&self, specific: &'a EntityType, walk: &mut Walk<'a>) {
        let contour = match specific {
            EntityType::Line(line) => Contour::open(vec![to_point(&line.p1), to_point(&line.p2)]),
            EntityType::Circle(circle) => Contour::closed(ellipse_points(
                to_point(&circle.center),
                circle.radius,
                circle.radius,
                self.circle_steps,
            )),
            EntityType::Arc(arc) => {
                let start = arc.start_angle.to_radians();
                let mut sweep = arc.end_angle.to_radians() - start;
                if sweep <= 0.0 {
                    sweep += TAU;
                }
                let center = to_point(&arc.center);
                let r = arc.radius;
                for (dx, dy) in [(-r, -r), (r, -r), (r, r), (-r, r)] {
                    let corner = Point::new(center.x + dx, center.y + dy);
                    walk.envelope.push(place(&walk.chain, corner));
                }
                Contour::open(arc_points(
                    center,
                    arc.radius,
                    arc.radius,
                    start,
                    sweep,
                    self.arc_steps,
                ))
            }
            EntityType::LwPolyline(polyline) => Contour {
                points: polyline
                    .vertices
                    .iter()
                    .map(|v| Point::new(v.x, v.y))
                    .collect(),
                closed: polyline.flags & 1 != 0,
            },
            EntityType::Polyline(polyline) => Contour {
                points: polyline.vertices().map(|v| to_point(&v.location)).collect(),
                closed: polyline.flags & 1 != 0,
            },
            EntityType::Insert(insert) => {
                self.expand_insert(insert, walk);
                return;
            }
            _ => {
                walk.skipped += 1;
                return;
            }
        };

        if contour.is_empty() {
            return;
        }
        let chain = &walk.chain;
        walk.contours.push(contour.map_points(|p| place(chain, p)));
    }

    fn expand_insert<'a>(&self, insert: &dxf::entities::Insert, walk: &mut Walk<'a>) {
        if walk.chain.len() >= MAX_BLOCK_DEPTH {
            warn!(block = %insert.name, "block nesting too deep, reference dropped");
            return;
        }
        let Some(block) = walk.blocks.get(insert.name.as_str()).copied() else {
            warn!(block = %insert.name, "reference to undefined block");
            return;
        };

        walk.chain.push(Placement {
            base: to_point(&block.base_point),
            scale_x: insert.x_scale_factor,
            scale_y: insert.y_scale_factor,
            rotation: insert.rotation.to_radians(),
            location: to_point(&insert.location),
        });
        for entity in &block.entities {
            self.visit(&entity.specific, walk);
        }
        walk.chain.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dxf::entities::{Arc, Circle, Entity, Insert, Line, LwPolyline};
    use dxf::LwPolylineVertex;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Entity {
        Entity::new(EntityType::Line(Line::new(
            dxf::Point::new(x1, y1, 0.0),
            dxf::Point::new(x2, y2, 0.0),
        )))
    }

    fn cut_length(g: &ImportedGeometry) -> f64 {
        g.movements.iter().map(|m| m.length()).sum()
    }

    #[test]
    fn test_lines_are_normalized_cuts() {
        let mut drawing = Drawing::new();
        drawing.add_entity(line(10.0, 20.0, 30.0, 20.0));
        drawing.add_entity(line(30.0, 20.0, 30.0, 40.0));

        let g = DxfImporter::default().import_drawing(&drawing);
        assert_eq!(g.format, FileFormat::Dxf);
        assert_eq!(g.element_count, 2);
        assert_eq!(g.movements.len(), 2);
        assert!(g.movements.iter().all(|m| m.is_cutting));
        assert_eq!(g.movements[0].start, Point::new(0.0, 0.0));
        assert_eq!(g.movements[1].end, Point::new(20.0, 20.0));

        let bounds = g.bounds.unwrap();
        assert_eq!(bounds.min, Point::new(10.0, 20.0));
        assert_eq!(bounds.max, Point::new(30.0, 40.0));
    }

    #[test]
    fn test_circle_segments() {
        let mut drawing = Drawing::new();
        drawing.add_entity(Entity::new(EntityType::Circle(Circle::new(
            dxf::Point::new(0.0, 0.0, 0.0),
            10.0,
        ))));

        let g = DxfImporter::default().import_drawing(&drawing);
        assert_eq!(g.movements.len(), CIRCLE_STEPS);
        let circumference = TAU * 10.0;
        assert!((cut_length(&g) - circumference).abs() < 0.2);
    }

    #[test]
    fn test_arc_sweep_wraps() {
        let mut drawing = Drawing::new();
        // 270 -> 90 sweeps counter-clockwise through 0
        drawing.add_entity(Entity::new(EntityType::Arc(Arc::new(
            dxf::Point::new(0.0, 0.0, 0.0),
            5.0,
            270.0,
            90.0,
        ))));

        let g = DxfImporter::default().import_drawing(&drawing);
        assert_eq!(g.movements.len(), ARC_STEPS);
        let half = std::f64::consts::PI * 5.0;
        assert!((cut_length(&g) - half).abs() < 0.1);
        // bounds cover the whole circle, not just the traced half
        let bounds = g.bounds.unwrap();
        assert_eq!(bounds.min, Point::new(-5.0, -5.0));
        assert_eq!(bounds.max, Point::new(5.0, 5.0));
        // the movements themselves stay on the +x side
        let min_x = g
            .movements
            .iter()
            .map(|m| m.start.x.min(m.end.x))
            .fold(f64::INFINITY, f64::min);
        assert!(min_x.abs() < 1e-9);
    }

    #[test]
    fn test_arc_envelope_follows_insert() {
        let mut block = Block::default();
        block.name = "HOLE".to_string();
        block.entities.push(Entity::new(EntityType::Arc(Arc::new(
            dxf::Point::new(0.0, 0.0, 0.0),
            2.0,
            0.0,
            90.0,
        ))));

        let mut insert = Insert::default();
        insert.name = "HOLE".to_string();
        insert.location = dxf::Point::new(100.0, 50.0, 0.0);

        let mut drawing = Drawing::new();
        drawing.add_block(block);
        drawing.add_entity(Entity::new(EntityType::Insert(insert)));

        let g = DxfImporter::default().import_drawing(&drawing);
        let bounds = g.bounds.unwrap();
        assert!(bounds.min.approx_eq(&Point::new(98.0, 48.0), 1e-9));
        assert!(bounds.max.approx_eq(&Point::new(102.0, 52.0), 1e-9));
    }

    #[test]
    fn test_closed_lwpolyline() {
        let mut polyline = LwPolyline::default();
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0)] {
            polyline.vertices.push(LwPolylineVertex {
                x,
                y,
                ..Default::default()
            });
        }
        polyline.flags = 1;

        let mut drawing = Drawing::new();
        drawing.add_entity(Entity::new(EntityType::LwPolyline(polyline)));

        let g = DxfImporter::default().import_drawing(&drawing);
        assert_eq!(g.movements.len(), 4);
        assert!((cut_length(&g) - 30.0).abs() < 1e-9);
        assert_eq!(g.movements[3].end, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_insert_expands_block() {
        let mut block = Block::default();
        block.name = "TICK".to_string();
        block.base_point = dxf::Point::new(1.0, 0.0, 0.0);
        block.entities.push(line(1.0, 0.0, 3.0, 0.0));

        let mut insert = Insert::default();
        insert.name = "TICK".to_string();
        insert.location = dxf::Point::new(100.0, 100.0, 0.0);
        insert.x_scale_factor = 2.0;
        insert.y_scale_factor = 2.0;
        insert.rotation = 90.0;

        let mut drawing = Drawing::new();
        drawing.add_block(block);
        drawing.add_entity(Entity::new(EntityType::Insert(insert)));

        let g = DxfImporter::default().import_drawing(&drawing);
        assert_eq!(g.element_count, 1);
        assert_eq!(g.movements.len(), 1);
        assert!((cut_length(&g) - 4.0).abs() < 1e-9);

        let bounds = g.bounds.unwrap();
        assert!(bounds.min.approx_eq(&Point::new(100.0, 100.0), 1e-9));
        assert!(bounds.max.approx_eq(&Point::new(100.0, 104.0), 1e-9));
    }

    #[test]
    fn test_missing_block_is_skipped() {
        let mut insert = Insert::default();
        insert.name = "NOPE".to_string();
        let mut drawing = Drawing::new();
        drawing.add_entity(Entity::new(EntityType::Insert(insert)));

        let g = DxfImporter::default().import_drawing(&drawing);
        assert!(g.movements.is_empty());
        assert!(g.bounds.is_none());
        assert_eq!(g.element_count, 0);
    }

    #[test]
    fn test_placement_chain_order() {
        let outer = Placement {
            base: Point::origin(),
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            location: Point::new(10.0, 0.0),
        };
        let inner = Placement {
            base: Point::origin(),
            scale_x: 3.0,
            scale_y: 3.0,
            rotation: 0.0,
            location: Point::origin(),
        };
        let p = place(&[outer, inner], Point::new(1.0, 1.0));
        assert!(p.approx_eq(&Point::new(13.0, 3.0), 1e-12));
    }

    #[test]
    fn test_saved_drawing_round_trip() {
        let mut drawing = Drawing::new();
        drawing.add_entity(line(0.0, 0.0, 25.0, 0.0));
        let mut buf = Vec::new();
        drawing.save(&mut buf).unwrap();

        let g = DxfImporter::default().import_bytes(&buf).unwrap();
        assert_eq!(g.movements.len(), 1);
        assert!((cut_length(&g) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let err = DxfImporter::default()
            .import_str("  0\nSECTION\n  2\nENTITIES\n  0\nLINE\n 10\nnot-a-number\n")
            .unwrap_err();
        assert!(matches!(err, ImportError::DxfParse(_)));
    }
}
