//! Connection curves.
//!
//! A connection leaves its output port heading right and enters its input
//! port heading right, so both control points are pushed horizontally.

use crate::geometry::Point;
use kurbo::BezPath;

/// Minimum horizontal pull of the control points, in canvas units.
const MIN_PULL: f64 = 50.0;

/// Cubic bezier from an output port to an input port.
pub fn connection_curve(from: Point, to: Point) -> BezPath {
    let (p0, p3) = (from.to_kurbo(), to.to_kurbo());
    let pull = ((p3.x - p0.x).abs() * 0.5).max(MIN_PULL);
    let mut path = BezPath::new();
    path.move_to(p0);
    path.curve_to(
        kurbo::Point::new(p0.x + pull, p0.y),
        kurbo::Point::new(p3.x - pull, p3.y),
        p3,
    );
    path
}

/// SVG path data for [`connection_curve`].
pub fn connection_path(from: Point, to: Point) -> String {
    connection_curve(from, to).to_svg()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{PathEl, Shape};

    #[test]
    fn curve_starts_and_ends_on_ports() {
        let path = connection_curve(Point::new(0.0, 0.0), Point::new(200.0, 100.0));
        let els: Vec<PathEl> = path.elements().to_vec();
        assert_eq!(els.len(), 2);
        match els[1] {
            PathEl::CurveTo(c1, c2, end) => {
                assert_eq!(c1, kurbo::Point::new(100.0, 0.0));
                assert_eq!(c2, kurbo::Point::new(100.0, 100.0));
                assert_eq!(end, kurbo::Point::new(200.0, 100.0));
            }
            ref other => panic!("expected CurveTo, got {other:?}"),
        }
    }

    #[test]
    fn short_curves_keep_minimum_pull() {
        let path = connection_curve(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        if let PathEl::CurveTo(c1, _, _) = path.elements()[1] {
            assert_eq!(c1.x, 50.0);
        } else {
            panic!("expected CurveTo");
        }
        assert!(path.bounding_box().width() >= 10.0);
    }

    #[test]
    fn svg_output_is_move_then_cubic() {
        let d = connection_path(Point::new(1.0, 2.0), Point::new(301.0, 2.0));
        assert!(d.starts_with('M'), "{d}");
        assert_eq!(d.matches('C').count(), 1, "{d}");
    }
}
