//! Vertex orientation: label each ring vertex convex, concave, or collinear.
//!
//! Labels assume a counter-clockwise ring (see
//! [`WindingPolicy`](crate::WindingPolicy)). A left turn at a vertex is an
//! interior angle below 180 degrees (convex), a right turn is a reflex
//! angle (concave), and a vertex lying on the line through its neighbours
//! is collinear.

use serde::{Deserialize, Serialize};

use crate::kernel::{GeometryKernel, Turn};
use crate::types::Point;

/// Orientation label of a ring vertex relative to its cyclic neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexKind {
    /// Interior angle below 180 degrees (90 on an orthogonal polygon).
    Convex,
    /// Interior angle above 180 degrees (270 on an orthogonal polygon).
    Concave,
    /// Redundant vertex on the straight line through its neighbours.
    Collinear,
}

impl VertexKind {
    /// Label for a vertex of a counter-clockwise ring at which the
    /// boundary takes `turn`.
    #[must_use]
    pub const fn from_turn(turn: Turn) -> Self {
        match turn {
            Turn::Left => Self::Convex,
            Turn::Right => Self::Concave,
            Turn::Straight => Self::Collinear,
        }
    }
}

/// Signed cross product of `(b - a) x (c - b)`.
///
/// Positive for a left turn at `b`, negative for a right turn, zero when
/// the three points are collinear.
#[must_use]
pub fn cross(a: Point, b: Point, c: Point) -> f64 {
    let (ux, uy) = (b.x - a.x, b.y - a.y);
    let (vx, vy) = (c.x - b.x, c.y - b.y);
    ux.mul_add(vy, -(uy * vx))
}

/// Classifies ring vertices against a kernel's turn predicate.
///
/// `tolerance` is the sine of the smallest turn angle that still counts
/// as a turn: a vertex is collinear when `|cross| <= tolerance * |u| * |v|`
/// for its incoming edge `u` and outgoing edge `v`. Otherwise the kernel
/// decides the turn direction. With a tolerance of `0.0` the kernel alone
/// decides, including collinearity.
#[derive(Debug, Clone, Copy)]
pub struct OrientationClassifier<'k, K> {
    kernel: &'k K,
    tolerance: f64,
}

impl<'k, K: GeometryKernel> OrientationClassifier<'k, K> {
    /// Create a classifier using `kernel` and the given collinearity tolerance.
    #[must_use]
    pub const fn new(kernel: &'k K, tolerance: f64) -> Self {
        Self { kernel, tolerance }
    }

    /// Label the vertex `current` given its predecessor and successor.
    #[must_use]
    pub fn vertex_kind(&self, prev: Point, current: Point, next: Point) -> VertexKind {
        if self.tolerance > 0.0 {
            let u = (current.x - prev.x).hypot(current.y - prev.y);
            let v = (next.x - current.x).hypot(next.y - current.y);
            if cross(prev, current, next).abs() <= self.tolerance * u * v {
                return VertexKind::Collinear;
            }
        }
        VertexKind::from_turn(self.kernel.turn(prev, current, next))
    }

    /// Label every vertex of a duplicate-free vertex cycle.
    ///
    /// `vertices` must not repeat the first point at the end. The result
    /// is parallel to the input: `result[i]` labels `vertices[i]`, with
    /// neighbours taken cyclically.
    #[must_use]
    pub fn classify(&self, vertices: &[Point]) -> Vec<VertexKind> {
        let n = vertices.len();
        (0..n)
            .map(|i| {
                let h = (i + n - 1) % n;
                let j = (i + 1) % n;
                self.vertex_kind(vertices[h], vertices[i], vertices[j])
            })
            .collect()
    }
}
