//! SVG path data (`d` attribute) parsing and flattening.
//!
//! Supports the full command set `M L H V C S Q T A Z` in absolute and
//! relative form, including implicit command repetition.

use crate::contour::Contour;
use crate::error::{ImportError, ImportResult};
use lasertime_core::Point;
use lyon::algorithms::path::iterator::PathIterator;
use lyon::geom::{ArcFlags, SvgArc};
use lyon::math::{point, vector, Angle};
use lyon::path::{Event, Path};

/// Byte scanner over path data.
struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(data: &'a str) -> Self {
        Self {
            bytes: data.as_bytes(),
            pos: 0,
        }
    }

    fn skip_separators(&mut self) {
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_whitespace() || self.bytes[self.pos] == b',')
        {
            self.pos += 1;
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.pos >= self.bytes.len()
    }

    /// True when the next token starts a number rather than a command.
    fn at_number(&mut self) -> bool {
        self.skip_separators();
        matches!(
            self.bytes.get(self.pos),
            Some(b'0'..=b'9' | b'+' | b'-' | b'.')
        )
    }

    fn command(&mut self) -> Option<u8> {
        self.skip_separators();
        let c = *self.bytes.get(self.pos)?;
        if c.is_ascii_alphabetic() {
            self.pos += 1;
            Some(c)
        } else {
            None
        }
    }

    fn error(&self, reason: &str) -> ImportError {
        ImportError::PathData {
            offset: self.pos,
            reason: reason.to_string(),
        }
    }

    /// Rejects points that overflowed while resolving relative coordinates.
    fn checked(&self, p: lyon::math::Point) -> ImportResult<lyon::math::Point> {
        if p.x.is_finite() && p.y.is_finite() {
            Ok(p)
        } else {
            Err(self.error("coordinate out of range"))
        }
    }

    fn number(&mut self) -> ImportResult<f32> {
        self.skip_separators();
        let start = self.pos;
        let b = self.bytes;

        if matches!(b.get(self.pos), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        while matches!(b.get(self.pos), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        if b.get(self.pos) == Some(&b'.') {
            self.pos += 1;
            while matches!(b.get(self.pos), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }
        if matches!(b.get(self.pos), Some(b'e' | b'E'))
            && matches!(b.get(self.pos + 1), Some(b'0'..=b'9' | b'+' | b'-'))
        {
            self.pos += 2;
            while matches!(b.get(self.pos), Some(b'0'..=b'9')) {
                self.pos += 1;
            }
        }

        std::str::from_utf8(&b[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<f32>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                self.pos = start;
                self.error("expected number")
            })
    }

    /// Arc flags may be packed without separators (`a1 1 0 01 5 5`).
    fn flag(&mut self) -> ImportResult<bool> {
        self.skip_separators();
        match self.bytes.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected arc flag")),
        }
    }

    fn pair(&mut self) -> ImportResult<(f32, f32)> {
        Ok((self.number()?, self.number()?))
    }
}

/// Incremental path state shared by all commands.
struct PathState {
    builder: lyon::path::path::Builder,
    current: lyon::math::Point,
    subpath_start: lyon::math::Point,
    open: bool,
    last_cubic_ctrl: Option<lyon::math::Point>,
    last_quad_ctrl: Option<lyon::math::Point>,
}

impl PathState {
    fn new() -> Self {
        Self {
            builder: Path::builder(),
            current: point(0.0, 0.0),
            subpath_start: point(0.0, 0.0),
            open: false,
            last_cubic_ctrl: None,
            last_quad_ctrl: None,
        }
    }

    fn ensure_open(&mut self) {
        if !self.open {
            self.builder.begin(self.current);
            self.subpath_start = self.current;
            self.open = true;
        }
    }

    fn move_to(&mut self, to: lyon::math::Point) {
        if self.open {
            self.builder.end(false);
        }
        self.builder.begin(to);
        self.current = to;
        self.subpath_start = to;
        self.open = true;
    }

    fn line_to(&mut self, to: lyon::math::Point) {
        self.ensure_open();
        self.builder.line_to(to);
        self.current = to;
    }

    fn close(&mut self) {
        if self.open {
            self.builder.end(true);
            self.open = false;
        }
        self.current = self.subpath_start;
    }

    fn finish(mut self) -> Path {
        if self.open {
            self.builder.end(false);
        }
        self.builder.build()
    }
}

/// Parses path data into a lyon path.
pub fn parse_path_data(data: &str) -> ImportResult<Path> {
    let mut s = Scanner::new(data);
    let mut st = PathState::new();
    let mut command: Option<u8> = None;

    while !s.at_end() {
        let cmd = match s.command() {
            Some(c) => c,
            // Implicit repetition; a repeated moveto becomes lineto.
            None => match command {
                Some(b'M') => b'L',
                Some(b'm') => b'l',
                Some(c) if !matches!(c, b'Z' | b'z') && s.at_number() => c,
                _ => return Err(s.error("expected command")),
            },
        };
        let rel = cmd.is_ascii_lowercase();
        let origin = if rel { st.current.to_vector() } else { vector(0.0, 0.0) };
        let at = |x: f32, y: f32| point(x, y) + origin;

        let (cubic_ctrl, quad_ctrl) = match cmd.to_ascii_uppercase() {
            b'M' => {
                let (x, y) = s.pair()?;
                st.move_to(s.checked(at(x, y))?);
                (None, None)
            }
            b'L' => {
                let (x, y) = s.pair()?;
                st.line_to(s.checked(at(x, y))?);
                (None, None)
            }
            b'H' => {
                let x = s.number()?;
                let x = if rel { st.current.x + x } else { x };
                st.line_to(s.checked(point(x, st.current.y))?);
                (None, None)
            }
            b'V' => {
                let y = s.number()?;
                let y = if rel { st.current.y + y } else { y };
                st.line_to(s.checked(point(st.current.x, y))?);
                (None, None)
            }
            b'C' => {
                let (x1, y1) = s.pair()?;
                let (x2, y2) = s.pair()?;
                let (x, y) = s.pair()?;
                let c1 = s.checked(at(x1, y1))?;
                let c2 = s.checked(at(x2, y2))?;
                let to = s.checked(at(x, y))?;
                st.ensure_open();
                st.builder.cubic_bezier_to(c1, c2, to);
                st.current = to;
                (Some(c2), None)
            }
            b'S' => {
                let (x2, y2) = s.pair()?;
                let (x, y) = s.pair()?;
                let c1 = s.checked(reflect(st.last_cubic_ctrl, st.current))?;
                let c2 = s.checked(at(x2, y2))?;
                let to = s.checked(at(x, y))?;
                st.ensure_open();
                st.builder.cubic_bezier_to(c1, c2, to);
                st.current = to;
                (Some(c2), None)
            }
            b'Q' => {
                let (x1, y1) = s.pair()?;
                let (x, y) = s.pair()?;
                let c = s.checked(at(x1, y1))?;
                let to = s.checked(at(x, y))?;
                st.ensure_open();
                st.builder.quadratic_bezier_to(c, to);
                st.current = to;
                (None, Some(c))
            }
            b'T' => {
                let (x, y) = s.pair()?;
                let c = s.checked(reflect(st.last_quad_ctrl, st.current))?;
                let to = s.checked(at(x, y))?;
                st.ensure_open();
                st.builder.quadratic_bezier_to(c, to);
                st.current = to;
                (None, Some(c))
            }
            b'A' => {
                let (rx, ry) = s.pair()?;
                let rotation = s.number()?;
                let large_arc = s.flag()?;
                let sweep = s.flag()?;
                let (x, y) = s.pair()?;
                let to = s.checked(at(x, y))?;
                st.ensure_open();
                let arc = SvgArc {
                    from: st.current,
                    to,
                    radii: vector(rx.abs(), ry.abs()),
                    x_rotation: Angle::degrees(rotation),
                    flags: ArcFlags { large_arc, sweep },
                };
                if arc.is_straight_line() {
                    st.builder.line_to(to);
                } else {
                    let mut curves = Vec::new();
                    arc.to_arc().for_each_cubic_bezier(&mut |c| curves.push(*c));
                    for c in curves {
                        let c1 = s.checked(c.ctrl1)?;
                        let c2 = s.checked(c.ctrl2)?;
                        st.builder.cubic_bezier_to(c1, c2, s.checked(c.to)?);
                    }
                }
                st.current = to;
                (None, None)
            }
            b'Z' => {
                st.close();
                (None, None)
            }
            _ => return Err(s.error("unknown command")),
        };

        st.last_cubic_ctrl = cubic_ctrl;
        st.last_quad_ctrl = quad_ctrl;
        command = Some(cmd);
    }

    Ok(st.finish())
}

/// Smooth-curve control point: the previous control mirrored about `current`.
fn reflect(ctrl: Option<lyon::math::Point>, current: lyon::math::Point) -> lyon::math::Point {
    match ctrl {
        Some(c) => current + (current - c),
        None => current,
    }
}

/// Flattens a path into one contour per subpath.
pub fn flatten(path: &Path, tolerance: f32) -> Vec<Contour> {
    let mut contours = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for event in path.iter().flattened(tolerance) {
        match event {
            Event::Begin { at } => {
                current.clear();
                current.push(Point::new(at.x as f64, at.y as f64));
            }
            Event::Line { to, .. } => {
                current.push(Point::new(to.x as f64, to.y as f64));
            }
            Event::End { close, .. } => {
                if current.len() > 1 {
                    contours.push(Contour {
                        points: std::mem::take(&mut current),
                        closed: close,
                    });
                }
                current.clear();
            }
            _ => {}
        }
    }
    contours
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contours(d: &str) -> Vec<Contour> {
        flatten(&parse_path_data(d).unwrap(), 0.01)
    }

    #[test]
    fn test_absolute_lines() {
        let c = contours("M 10 10 L 20 10 L 20 20 Z");
        assert_eq!(c.len(), 1);
        assert!(c[0].closed);
        assert!(c[0].points.len() >= 3);
        assert_eq!(c[0].points[2], Point::new(20.0, 20.0));
    }

    #[test]
    fn test_relative_and_implicit_lineto() {
        let c = contours("m10,10 10,0 0,10 h-10 v-10");
        assert_eq!(c.len(), 1);
        assert!(!c[0].closed);
        let pts = &c[0].points;
        assert_eq!(pts[1], Point::new(20.0, 10.0));
        assert_eq!(pts[2], Point::new(20.0, 20.0));
        assert_eq!(pts[3], Point::new(10.0, 20.0));
        assert_eq!(pts[4], Point::new(10.0, 10.0));
    }

    #[test]
    fn test_multiple_subpaths() {
        let c = contours("M0 0 L10 0 Z M20 20 L30 20");
        assert_eq!(c.len(), 2);
        assert!(c[0].closed);
        assert!(!c[1].closed);
        assert_eq!(c[1].points[0], Point::new(20.0, 20.0));
    }

    #[test]
    fn test_relative_after_close_starts_at_subpath_start() {
        let c = contours("M10 10 l5 0 l0 5 z m1 1 l1 0");
        assert_eq!(c[1].points[0], Point::new(11.0, 11.0));
    }

    #[test]
    fn test_cubic_is_flattened() {
        let c = contours("M0 0 C 0 10 10 10 10 0");
        let pts = &c[0].points;
        assert!(pts.len() > 3);
        let last = pts[pts.len() - 1];
        assert!(last.approx_eq(&Point::new(10.0, 0.0), 1e-4));
        let max_y = pts.iter().map(|p| p.y).fold(f64::MIN, f64::max);
        assert!((max_y - 7.5).abs() < 0.05);
    }

    #[test]
    fn test_smooth_and_quadratic_curves() {
        let c = contours("M0 0 Q 5 10 10 0 T 20 0 S 30 -10 40 0");
        let last = c[0].points[c[0].points.len() - 1];
        assert!(last.approx_eq(&Point::new(40.0, 0.0), 1e-4));
    }

    #[test]
    fn test_arc_semicircle_length() {
        let c = contours("M0 0 A 10 10 0 0 1 20 0");
        let length: f64 = c[0].points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
        assert!((length - std::f64::consts::PI * 10.0).abs() < 0.1);
    }

    #[test]
    fn test_packed_arc_flags() {
        let c = contours("M0 0a10 10 0 0120 0");
        let last = c[0].points[c[0].points.len() - 1];
        assert!(last.approx_eq(&Point::new(20.0, 0.0), 1e-3));
    }

    #[test]
    fn test_invalid_data() {
        assert!(matches!(
            parse_path_data("M 10"),
            Err(ImportError::PathData { .. })
        ));
        assert!(parse_path_data("X 1 2").is_err());
        assert!(parse_path_data("10 10").is_err());
        assert!(parse_path_data("M0 0 L1 1 Z 5 5").is_err());
    }

    #[test]
    fn test_rejects_values_beyond_f32() {
        assert!(matches!(
            parse_path_data("M0 0 L1e39 0"),
            Err(ImportError::PathData { offset: 6, .. })
        ));
        assert!(parse_path_data("M0 0 L-1e39 0").is_err());
    }

    #[test]
    fn test_rejects_relative_overflow() {
        assert!(matches!(
            parse_path_data("M3e38 0 l3e38 0"),
            Err(ImportError::PathData { .. })
        ));
        assert!(parse_path_data("M0 3e38 v3e38").is_err());
    }

    #[test]
    fn test_empty_data() {
        assert!(contours("").is_empty());
    }
}
