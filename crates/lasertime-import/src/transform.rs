//! SVG `transform` attribute parsing.

use lasertime_core::Point;
use lyon::math::{point, Angle, Transform};
use regex::Regex;
use std::sync::OnceLock;
use tracing::warn;

fn transform_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([A-Za-z]+)\s*\(([^)]*)\)").expect("invalid transform regex")
    })
}

pub(crate) fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("invalid number regex")
    })
}

/// All numbers in `s`, in order. Handles inputs such as `10-5` and `1e3,.5`.
pub(crate) fn parse_numbers(s: &str) -> Vec<f64> {
    number_regex()
        .find_iter(s)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Parses a transform list such as `translate(10 20) rotate(45)`.
///
/// Functions apply right to left, as in SVG. Unknown functions are skipped.
pub fn parse_transform(value: &str) -> Option<Transform> {
    let mut result: Option<Transform> = None;

    for caps in transform_regex().captures_iter(value) {
        let name = &caps[1];
        let args: Vec<f32> = parse_numbers(&caps[2]).into_iter().map(|v| v as f32).collect();

        let item = match (name, args.as_slice()) {
            ("matrix", [a, b, c, d, e, f]) => Transform::new(*a, *b, *c, *d, *e, *f),
            ("translate", [tx]) => Transform::translation(*tx, 0.0),
            ("translate", [tx, ty]) => Transform::translation(*tx, *ty),
            ("scale", [s]) => Transform::scale(*s, *s),
            ("scale", [sx, sy]) => Transform::scale(*sx, *sy),
            ("rotate", [deg]) => Transform::rotation(Angle::degrees(*deg)),
            ("rotate", [deg, cx, cy]) => Transform::translation(-cx, -cy)
                .then(&Transform::rotation(Angle::degrees(*deg)))
                .then(&Transform::translation(*cx, *cy)),
            ("skewX", [deg]) => Transform::new(1.0, 0.0, deg.to_radians().tan(), 1.0, 0.0, 0.0),
            ("skewY", [deg]) => Transform::new(1.0, deg.to_radians().tan(), 0.0, 1.0, 0.0, 0.0),
            _ => {
                warn!(function = name, "ignoring unsupported transform");
                continue;
            }
        };

        result = Some(match result {
            Some(outer) => item.then(&outer),
            None => item,
        });
    }

    result
}

/// `inner` followed by `outer`, either of which may be the identity.
pub(crate) fn compose(inner: Option<Transform>, outer: Option<Transform>) -> Option<Transform> {
    match (inner, outer) {
        (Some(i), Some(o)) => Some(i.then(&o)),
        (Some(t), None) | (None, Some(t)) => Some(t),
        (None, None) => None,
    }
}

pub(crate) fn apply(transform: &Transform, p: Point) -> Point {
    let t = transform.transform_point(point(p.x as f32, p.y as f32));
    Point::new(t.x as f64, t.y as f64)
}
