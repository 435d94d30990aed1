//! SVG importer.
//!
//! Tags are scanned with regular expressions in document order. Group
//! transforms are tracked on a stack so nested `<g transform=…>` elements
//! compose correctly. Content inside `defs`, `clipPath`, `mask`, `marker`,
//! `pattern` and `symbol` is never cut.

use crate::contour::{contour_bounds, ellipse_points, sequence_contours, Contour};
use crate::error::{ImportError, ImportResult};
use crate::svg_path::{flatten, parse_path_data};
use crate::transform::{apply, compose, parse_numbers, parse_transform};
use crate::{FileFormat, ImportedGeometry};
use lasertime_core::Point;
use lyon::math::Transform;
use regex::Regex;
use std::collections::HashMap;
use std::f64::consts::FRAC_PI_2;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Segments used to approximate circles and ellipses.
pub const CIRCLE_SEGMENTS: usize = 36;
/// Segments per rounded rectangle corner.
pub const CORNER_SEGMENTS: usize = 8;
/// Default curve flattening tolerance in mm.
pub const DEFAULT_TOLERANCE: f32 = 0.05;

const NON_RENDERED: &[&str] = &["defs", "clipPath", "mask", "marker", "pattern", "symbol"];

fn svg_root_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<svg[\s>/]").expect("invalid svg regex"))
}

fn comment_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("invalid comment regex"))
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<(/?)([A-Za-z][\w:.-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#)
            .expect("invalid tag regex")
    })
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("invalid attribute regex")
    })
}

/// Attributes of a single tag.
struct Attributes<'a>(HashMap<&'a str, &'a str>);

impl<'a> Attributes<'a> {
    fn parse(raw: &'a str) -> Self {
        let mut map = HashMap::new();
        for caps in attr_regex().captures_iter(raw) {
            let (Some(name), Some(value)) = (caps.get(1), caps.get(2).or_else(|| caps.get(3)))
            else {
                continue;
            };
            map.insert(name.as_str(), value.as_str());
        }
        Self(map)
    }

    fn get(&self, name: &str) -> Option<&'a str> {
        self.0.get(name).copied()
    }

    /// Numeric attribute. Unit suffixes such as `mm` or `px` are ignored.
    fn number(&self, name: &str) -> Option<f64> {
        self.get(name)
            .and_then(|v| parse_numbers(v).first().copied())
            .filter(|v| v.is_finite())
    }

    fn number_or(&self, name: &str, default: f64) -> f64 {
        self.number(name).unwrap_or(default)
    }

    fn transform(&self) -> Option<Transform> {
        self.get("transform").and_then(parse_transform)
    }
}

/// An open container element.
struct Frame<'a> {
    name: &'a str,
    transform: Option<Transform>,
    hidden: bool,
}

/// Converts SVG documents into cutting movements.
#[derive(Debug, Clone)]
pub struct SvgImporter {
    /// Maximum deviation (mm) when flattening path curves.
    pub tolerance: f32,
}

impl Default for SvgImporter {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SvgImporter {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Imports SVG content.
    pub fn import_str(&self, content: &str) -> ImportResult<ImportedGeometry> {
        let elements = self.parse_elements(content)?;
        let contours: Vec<Contour> = elements.iter().flatten().cloned().collect();

        let movements = sequence_contours(&contours);
        debug!(
            elements = elements.len(),
            contours = contours.len(),
            movements = movements.len(),
            "imported SVG"
        );

        Ok(ImportedGeometry {
            bounds: contour_bounds(&contours),
            movements,
            format: FileFormat::Svg,
            element_count: elements.len(),
        })
    }

    /// Contours for each cuttable element, in document order.
    pub fn parse_elements(&self, content: &str) -> ImportResult<Vec<Vec<Contour>>> {
        if !svg_root_regex().is_match(content) {
            return Err(ImportError::SvgParse("missing <svg> element".to_string()));
        }

        let content = comment_regex().replace_all(content, "");
        let mut stack: Vec<Frame> = Vec::new();
        let mut elements = Vec::new();

        for caps in tag_regex().captures_iter(&content) {
            let closing = !caps[1].is_empty();
            let self_closing = !caps[4].is_empty();
            let name = caps.get(2).map_or("", |m| m.as_str());

            if closing {
                if let Some(idx) = stack.iter().rposition(|f| f.name == name) {
                    stack.truncate(idx);
                }
                continue;
            }

            let attrs = Attributes::parse(caps.get(3).map_or("", |m| m.as_str()));
            let parent = stack.last();
            let inherited = parent.and_then(|f| f.transform);
            let hidden = parent.is_some_and(|f| f.hidden) || NON_RENDERED.contains(&name);
            let transform = compose(attrs.transform(), inherited);

            if !hidden {
                if let Some(contours) = self.element_contours(name, &attrs)? {
                    let contours: Vec<Contour> = match transform {
                        Some(t) => contours
                            .into_iter()
                            .map(|c| c.map_points(|p| apply(&t, p)))
                            .collect(),
                        None => contours,
                    };
                    if contours.iter().any(|c| !c.is_empty()) {
                        elements.push(contours);
                    }
                }
            }

            if !self_closing {
                stack.push(Frame {
                    name,
                    transform,
                    hidden,
                });
            }
        }

        Ok(elements)
    }

    /// Untransformed contours for a shape element, `None` for anything else.
    ///
    /// Malformed path data fails the import.
    fn element_contours(
        &self,
        name: &str,
        attrs: &Attributes,
    ) -> ImportResult<Option<Vec<Contour>>> {
        let contours = match name {
            "line" => Some(vec![Contour::open(vec![
                Point::new(attrs.number_or("x1", 0.0), attrs.number_or("y1", 0.0)),
                Point::new(attrs.number_or("x2", 0.0), attrs.number_or("y2", 0.0)),
            ])]),
            "polyline" => attrs
                .get("points")
                .map(|v| vec![Contour::open(parse_points(v))]),
            "polygon" => attrs
                .get("points")
                .map(|v| vec![Contour::closed(parse_points(v))]),
            "rect" => rect_contour(attrs).map(|c| vec![c]),
            "circle" => attrs.number("r").map(|r| {
                let center = Point::new(attrs.number_or("cx", 0.0), attrs.number_or("cy", 0.0));
                vec![Contour::closed(ellipse_points(center, r, r, CIRCLE_SEGMENTS))]
            }),
            "ellipse" => attrs.number("rx").map(|rx| {
                let ry = attrs.number_or("ry", rx);
                let center = Point::new(attrs.number_or("cx", 0.0), attrs.number_or("cy", 0.0));
                vec![Contour::closed(ellipse_points(center, rx, ry, CIRCLE_SEGMENTS))]
            }),
            "path" => match attrs.get("d") {
                Some(d) => {
                    let path = parse_path_data(d).inspect_err(|err| {
                        warn!(%err, "invalid path data");
                    })?;
                    Some(flatten(&path, self.tolerance))
                }
                None => None,
            },
            "text" | "tspan" | "image" | "use" => {
                debug!(element = name, "ignoring non-geometry element");
                None
            }
            _ => None,
        };
        Ok(contours)
    }
}

/// Coordinate pairs from a `points` attribute; a trailing odd value is dropped.
fn parse_points(value: &str) -> Vec<Point> {
    parse_numbers(value)
        .chunks_exact(2)
        .map(|c| Point::new(c[0], c[1]))
        .collect()
}

fn rect_contour(attrs: &Attributes) -> Option<Contour> {
    let x = attrs.number_or("x", 0.0);
    let y = attrs.number_or("y", 0.0);
    let width = attrs.number("width")?;
    let height = attrs.number("height")?;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let rx = attrs.number("rx");
    let ry = attrs.number("ry").or(rx).unwrap_or(0.0);
    let rx = rx.unwrap_or(ry);

    if rx <= 0.0 && ry <= 0.0 {
        return Some(Contour::closed(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
            Point::new(x, y),
        ]));
    }

    Some(Contour::closed(rounded_rect_points(
        x,
        y,
        width,
        height,
        rx.min(width / 2.0),
        ry.min(height / 2.0),
    )))
}

/// Outline of a rounded rectangle, clockwise from the top edge, closed.
fn rounded_rect_points(x: f64, y: f64, width: f64, height: f64, rx: f64, ry: f64) -> Vec<Point> {
    let corners = [
        (Point::new(x + width - rx, y + ry), -FRAC_PI_2),
        (Point::new(x + width - rx, y + height - ry), 0.0),
        (Point::new(x + rx, y + height - ry), FRAC_PI_2),
        (Point::new(x + rx, y + ry), 2.0 * FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1) + 1);
    for (center, start) in corners {
        points.extend(crate::contour::arc_points(
            center,
            rx,
            ry,
            start,
            FRAC_PI_2,
            CORNER_SEGMENTS,
        ));
    }
    points.push(points[0]);
    points
}
