//! Axis-aligned rectangles built from a diagonal corner pair.

use serde::Serialize;

use crate::types::{DecomposeError, Point, Polygon, Ring};

/// An axis-aligned rectangle with positive width and height.
///
/// Only constructible through [`make_rectangle`], which rejects
/// degenerate corner pairs, so `min.x < max.x` and `min.y < max.y` always
/// hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rectangle {
    min: Point,
    max: Point,
}

/// Build the rectangle whose diagonal runs from `c0` to `c1`.
///
/// The corners may be given in either order; the rectangle spans
/// `min(c0, c1)..max(c0, c1)` on each axis.
///
/// # Errors
///
/// Returns [`DecomposeError::PrimitiveInvariant`] if the corners share an
/// x or y coordinate (zero area) or are not finite.
pub fn make_rectangle(c0: Point, c1: Point) -> Result<Rectangle, DecomposeError> {
    let min = Point::new(c0.x.min(c1.x), c0.y.min(c1.y));
    let max = Point::new(c0.x.max(c1.x), c0.y.max(c1.y));
    let width = max.x - min.x;
    let height = max.y - min.y;

    // `is_normal` rejects zero, subnormal, infinite and NaN extents.
    if !width.is_normal() || !height.is_normal() {
        return Err(DecomposeError::invariant(format!(
            "corners ({}, {}) and ({}, {}) do not span a rectangle",
            c0.x, c0.y, c1.x, c1.y
        )));
    }

    Ok(Rectangle { min, max })
}

impl Rectangle {
    /// Lower-left corner.
    #[must_use]
    pub const fn min(&self) -> Point {
        self.min
    }

    /// Upper-right corner.
    #[must_use]
    pub const fn max(&self) -> Point {
        self.max
    }

    /// Extent along x.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Enclosed area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// The four corners in canonical order:
    /// `(min,min) -> (min,max) -> (max,max) -> (max,min)`.
    #[must_use]
    pub const fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min.x, self.min.y),
            Point::new(self.min.x, self.max.y),
            Point::new(self.max.x, self.max.y),
            Point::new(self.max.x, self.min.y),
        ]
    }

    /// Canonical 5-point closed ring (corners plus closing duplicate).
    #[must_use]
    pub fn to_ring(&self) -> Ring {
        Ring::new(self.corners().to_vec())
    }

    /// The rectangle as a hole-free polygon.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.to_ring(), Vec::new())
    }

    /// Area of the intersection of the two rectangles' interiors.
    ///
    /// Rectangles that only share an edge or a corner overlap by `0.0`.
    #[must_use]
    pub fn overlap_area(&self, other: &Self) -> f64 {
        let w = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let h = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        if w > 0.0 && h > 0.0 { w * h } else { 0.0 }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rectangle {
        make_rectangle(Point::new(x0, y0), Point::new(x1, y1)).unwrap()
    }

    #[test]
    fn corners_are_canonical_regardless_of_input_order() {
        let a = rect(4.0, 3.0, 0.0, 0.0);
        let b = rect(0.0, 3.0, 4.0, 0.0);
        let expected = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(4.0, 3.0),
            Point::new(4.0, 0.0),
        ];
        assert_eq!(a.corners(), expected);
        assert_eq!(a, b);
    }

    #[test]
    fn ring_has_five_points_and_is_closed() {
        let ring = rect(1.0, 2.0, 3.0, 5.0).to_ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.points()[0], Point::new(1.0, 2.0));
        assert_eq!(ring.points()[4], Point::new(1.0, 2.0));
        assert_eq!(ring.points()[2], Point::new(3.0, 5.0));
    }

    #[test]
    fn area_width_height() {
        let r = rect(0.0, 0.0, 4.0, 3.0);
        assert!((r.width() - 4.0).abs() < f64::EPSILON);
        assert!((r.height() - 3.0).abs() < f64::EPSILON);
        assert!((r.area() - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shared_x_is_degenerate() {
        let result = make_rectangle(Point::new(1.0, 0.0), Point::new(1.0, 5.0));
        assert!(matches!(
            result,
            Err(DecomposeError::PrimitiveInvariant { .. })
        ));
    }

    #[test]
    fn shared_y_is_degenerate() {
        let result = make_rectangle(Point::new(0.0, 2.0), Point::new(5.0, 2.0));
        assert!(matches!(
            result,
            Err(DecomposeError::PrimitiveInvariant { .. })
        ));
    }

    #[test]
    fn nan_corner_is_degenerate() {
        let result = make_rectangle(Point::new(f64::NAN, 0.0), Point::new(1.0, 1.0));
        assert!(result.is_err());
    }

    #[test]
    fn overlap_of_edge_neighbours_is_zero() {
        let a = rect(0.0, 0.0, 4.0, 2.0);
        let b = rect(0.0, 2.0, 2.0, 4.0);
        assert!(a.overlap_area(&b).abs() < f64::EPSILON);
        assert!(b.overlap_area(&a).abs() < f64::EPSILON);
    }

    #[test]
    fn overlap_of_crossing_rectangles() {
        let a = rect(0.0, 0.0, 4.0, 4.0);
        let b = rect(2.0, 1.0, 6.0, 3.0);
        assert!((a.overlap_area(&b) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_min_and_max() {
        let json = serde_json::to_string(&rect(0.0, 0.0, 2.0, 1.0)).unwrap();
        assert_eq!(
            json,
            r#"{"min":{"x":0.0,"y":0.0},"max":{"x":2.0,"y":1.0}}"#
        );
    }
}
