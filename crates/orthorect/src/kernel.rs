//! Geometry kernel: the black-box services the decomposition relies on.
//!
//! The decomposer never computes boolean operations or orientation
//! predicates itself. It asks a [`GeometryKernel`] for them, so the loop
//! can be driven by the production [`GeoKernel`] (backed by the `geo`
//! crate) or by a substitute kernel in tests.
//!
//! Conversions between the crate's own [`Point`]/[`Ring`]/[`Polygon`]
//! types and `geo` types live here so that `geo` stays an
//! implementation detail of this module.

use geo::kernels::{Kernel, Orientation, RobustKernel};
use geo::{Area, BooleanOps};

use crate::rectangle::Rectangle;
use crate::types::{Point, Polygon, Ring};

/// Direction of travel at the middle of three consecutive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Counter-clockwise turn.
    Left,
    /// Clockwise turn.
    Right,
    /// The three points are collinear.
    Straight,
}

/// Runtime shape of a boolean-operation result.
///
/// The decomposer can only continue from a single polygon; every other
/// variant is reported as a [`DecompositionError`](crate::DecomposeError::Decomposition).
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Nothing is left.
    Empty,
    /// Exactly one polygon (which may still carry holes).
    Polygon(Polygon),
    /// Two or more disjoint polygons.
    MultiPolygon(Vec<Polygon>),
}

impl Shape {
    /// Short human-readable description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Empty => "an empty geometry".to_string(),
            Self::Polygon(p) if p.has_holes() => {
                format!("a polygon with {} hole(s)", p.holes.len())
            }
            Self::Polygon(_) => "a simple polygon".to_string(),
            Self::MultiPolygon(parts) => format!("{} disjoint polygons", parts.len()),
        }
    }
}

/// Services the decomposition needs from a geometry kernel.
pub trait GeometryKernel {
    /// Classify the turn taken at `b` when travelling `a -> b -> c`.
    fn turn(&self, a: Point, b: Point, c: Point) -> Turn;

    /// Signed area enclosed by `ring`: positive when counter-clockwise.
    fn signed_area(&self, ring: &Ring) -> f64;

    /// Planar set difference `subject - clip`.
    fn difference(&self, subject: &Polygon, clip: &Rectangle) -> Shape;
}

/// [`GeometryKernel`] backed by the `geo` crate.
///
/// Turns use the robust (adaptive-precision) `orient2d` predicate and
/// differences use `geo`'s boolean operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeoKernel;

impl GeometryKernel for GeoKernel {
    fn turn(&self, a: Point, b: Point, c: Point) -> Turn {
        match RobustKernel::orient2d(a.into(), b.into(), c.into()) {
            Orientation::CounterClockwise => Turn::Left,
            Orientation::Clockwise => Turn::Right,
            Orientation::Collinear => Turn::Straight,
        }
    }

    fn signed_area(&self, ring: &Ring) -> f64 {
        geo::Polygon::new(ring.into(), Vec::new()).signed_area()
    }

    fn difference(&self, subject: &Polygon, clip: &Rectangle) -> Shape {
        let subject = geo::Polygon::from(subject);
        let clip = geo::Polygon::from(clip);
        let mut parts: Vec<Polygon> = subject
            .difference(&clip)
            .0
            .into_iter()
            .map(Polygon::from)
            .collect();

        match parts.len() {
            0 => Shape::Empty,
            1 => parts.pop().map_or(Shape::Empty, Shape::Polygon),
            _ => Shape::MultiPolygon(parts),
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions to and from geo types
// ---------------------------------------------------------------------------

impl From<Point> for geo::Coord<f64> {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<geo::Coord<f64>> for Point {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

impl From<&Ring> for geo::LineString<f64> {
    fn from(ring: &Ring) -> Self {
        ring.points().iter().map(|&p| geo::Coord::from(p)).collect()
    }
}

impl From<geo::LineString<f64>> for Ring {
    fn from(line: geo::LineString<f64>) -> Self {
        Self::new(line.0.into_iter().map(Point::from).collect())
    }
}

impl From<&Polygon> for geo::Polygon<f64> {
    fn from(polygon: &Polygon) -> Self {
        Self::new(
            (&polygon.exterior).into(),
            polygon.holes.iter().map(geo::LineString::from).collect(),
        )
    }
}

impl From<geo::Polygon<f64>> for Polygon {
    fn from(polygon: geo::Polygon<f64>) -> Self {
        let (exterior, interiors) = polygon.into_inner();
        Self::new(
            exterior.into(),
            interiors.into_iter().map(Ring::from).collect(),
        )
    }
}

impl From<&Rectangle> for geo::Polygon<f64> {
    fn from(rect: &Rectangle) -> Self {
        Self::from(&rect.to_polygon())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::rectangle::make_rectangle;

    fn polygon(coords: &[(f64, f64)]) -> Polygon {
        Polygon::from_vertices(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    fn total_area(parts: &[Polygon]) -> f64 {
        parts
            .iter()
            .map(|p| GeoKernel.signed_area(&p.exterior).abs())
            .sum()
    }

    #[test]
    fn turn_left_right_straight() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert_eq!(GeoKernel.turn(a, b, Point::new(1.0, 1.0)), Turn::Left);
        assert_eq!(GeoKernel.turn(a, b, Point::new(1.0, -1.0)), Turn::Right);
        assert_eq!(GeoKernel.turn(a, b, Point::new(2.0, 0.0)), Turn::Straight);
    }

    #[test]
    fn signed_area_follows_winding() {
        let ccw = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0)]);
        assert!((GeoKernel.signed_area(&ccw.exterior) - 12.0).abs() < 1e-9);
        let cw = ccw.exterior.reversed();
        assert!((GeoKernel.signed_area(&cw) + 12.0).abs() < 1e-9);
    }

    #[test]
    fn difference_of_disjoint_clip_keeps_subject() {
        let subject = polygon(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let clip = make_rectangle(Point::new(5.0, 5.0), Point::new(6.0, 6.0)).unwrap();
        match GeoKernel.difference(&subject, &clip) {
            Shape::Polygon(p) => {
                assert!((GeoKernel.signed_area(&p.exterior).abs() - 4.0).abs() < 1e-9);
            }
            other => panic!("expected a polygon, got {}", other.describe()),
        }
    }

    #[test]
    fn difference_covering_clip_is_empty() {
        let subject = polygon(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        let clip = make_rectangle(Point::new(-1.0, -1.0), Point::new(3.0, 3.0)).unwrap();
        assert_eq!(GeoKernel.difference(&subject, &clip), Shape::Empty);
    }

    #[test]
    fn difference_through_middle_splits() {
        let subject = polygon(&[(0.0, 0.0), (6.0, 0.0), (6.0, 2.0), (0.0, 2.0)]);
        let clip = make_rectangle(Point::new(2.0, 0.0), Point::new(4.0, 2.0)).unwrap();
        match GeoKernel.difference(&subject, &clip) {
            Shape::MultiPolygon(parts) => {
                assert_eq!(parts.len(), 2);
                assert!((total_area(&parts) - 8.0).abs() < 1e-9);
            }
            other => panic!("expected two parts, got {}", other.describe()),
        }
    }

    #[test]
    fn difference_inside_creates_hole() {
        let subject = polygon(&[(0.0, 0.0), (6.0, 0.0), (6.0, 6.0), (0.0, 6.0)]);
        let clip = make_rectangle(Point::new(2.0, 2.0), Point::new(4.0, 4.0)).unwrap();
        match GeoKernel.difference(&subject, &clip) {
            Shape::Polygon(p) => assert_eq!(p.holes.len(), 1),
            other => panic!("expected a holed polygon, got {}", other.describe()),
        }
    }

    #[test]
    fn polygon_geo_round_trip() {
        let original = polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]);
        let back = Polygon::from(geo::Polygon::from(&original));
        assert_eq!(back, original);
    }

    #[test]
    fn shape_descriptions() {
        assert_eq!(Shape::Empty.describe(), "an empty geometry");
        let p = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert_eq!(Shape::Polygon(p.clone()).describe(), "a simple polygon");
        assert_eq!(
            Shape::MultiPolygon(vec![p.clone(), p]).describe(),
            "2 disjoint polygons"
        );
    }
}
