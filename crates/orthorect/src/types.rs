//! Shared types for the orthorect decomposition.

use serde::{Deserialize, Serialize};

/// A 2D point in polygon coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A closed boundary: the first and last points are equal by value.
///
/// [`Ring::new`] closes an open sequence by appending a copy of its first
/// point, so a ring can be built from either its distinct vertices or an
/// already-closed coordinate list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring(Vec<Point>);

impl Ring {
    /// Create a ring, closing it if the last point differs from the first.
    #[must_use]
    pub fn new(mut points: Vec<Point>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last())
            && (points.len() == 1 || first != last)
        {
            points.push(first);
        }
        Self(points)
    }

    /// Returns `true` if the ring has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of points including the closing duplicate.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// All points, closing duplicate included.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Distinct vertices: the closed sequence without its closing duplicate.
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        self.0.split_last().map_or(&[], |(_, rest)| rest)
    }

    /// Number of distinct vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// The same boundary traversed in the opposite direction.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.0.clone();
        points.reverse();
        Self(points)
    }

    /// Consumes the ring and returns the closed point sequence.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// A polygon: one exterior ring and any number of interior rings (holes).
///
/// The decomposition only accepts polygons without holes; the field is
/// present so callers can hand over whatever their geometry source
/// produced and get a typed rejection instead of silently losing holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    /// Outer boundary.
    pub exterior: Ring,
    /// Interior boundaries.
    #[serde(default)]
    pub holes: Vec<Ring>,
}

impl Polygon {
    /// Create a polygon with the given exterior and holes.
    #[must_use]
    pub const fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Create a hole-free polygon from its exterior vertices.
    #[must_use]
    pub fn from_vertices(vertices: Vec<Point>) -> Self {
        Self::new(Ring::new(vertices), Vec::new())
    }

    /// Returns `true` if the polygon has interior rings.
    #[must_use]
    pub const fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }
}

/// Compact JSON form of a polygon, with `[x, y]` pairs instead of point
/// objects.
///
/// ```json
/// { "exterior": [[0, 0], [4, 0], [4, 3], [0, 3]], "holes": [] }
/// ```
///
/// `holes` may be omitted. Rings may be given open or closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeFile {
    /// Exterior ring coordinates.
    pub exterior: Vec<[f64; 2]>,
    /// Interior ring coordinates.
    #[serde(default)]
    pub holes: Vec<Vec<[f64; 2]>>,
}

fn ring_from_pairs(pairs: Vec<[f64; 2]>) -> Ring {
    Ring::new(pairs.into_iter().map(|[x, y]| Point::new(x, y)).collect())
}

fn ring_to_pairs(ring: &Ring) -> Vec<[f64; 2]> {
    ring.points().iter().map(|p| [p.x, p.y]).collect()
}

impl From<ShapeFile> for Polygon {
    fn from(shape: ShapeFile) -> Self {
        Self::new(
            ring_from_pairs(shape.exterior),
            shape.holes.into_iter().map(ring_from_pairs).collect(),
        )
    }
}

impl From<&Polygon> for ShapeFile {
    fn from(polygon: &Polygon) -> Self {
        Self {
            exterior: ring_to_pairs(&polygon.exterior),
            holes: polygon.holes.iter().map(ring_to_pairs).collect(),
        }
    }
}

/// How the decomposer treats the winding direction of the input ring.
///
/// Vertex classification assumes a counter-clockwise exterior: a left
/// turn is convex, a right turn is concave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindingPolicy {
    /// Reverse clockwise input rings before decomposing.
    #[default]
    Normalize,
    /// Reject clockwise input rings with [`DecomposeError::UnsupportedShape`].
    RequireCounterClockwise,
}

/// Where the rectangle scan starts on each working ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScanOrder {
    /// Scan the cleaned vertices from index 0, in ring order.
    #[default]
    AsGiven,
    /// Rotate the cleaned vertices to start just after the last concave
    /// vertex, so no convex run wraps past the end of the scan.
    ///
    /// Results then no longer depend on which vertex the input (or the
    /// kernel's remainder) happens to start at, for shapes that peel with
    /// `search3` alone.
    AfterLastConcave,
}

/// Configuration for a decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecomposeConfig {
    /// Collinearity tolerance, as the sine of the turn angle at a vertex.
    ///
    /// A vertex is collinear when `|cross| <= tolerance * |u| * |v|`, with
    /// `u` and `v` its incoming and outgoing edges, so the threshold does
    /// not depend on the coordinate scale. The same fraction bounds how
    /// much of the working area a pass must remove.
    ///
    /// With `0.0` only exactly collinear vertices qualify and the turn
    /// decision is left entirely to the kernel's robust predicate.
    pub tolerance: f64,

    /// Winding handling for the input ring.
    pub winding: WindingPolicy,

    /// Start vertex of the rectangle scan.
    pub scan_order: ScanOrder,
}

impl DecomposeConfig {
    /// Default collinearity tolerance: exact.
    pub const DEFAULT_TOLERANCE: f64 = 0.0;

    /// Default winding policy.
    pub const DEFAULT_WINDING: WindingPolicy = WindingPolicy::Normalize;

    /// Default scan order.
    pub const DEFAULT_SCAN_ORDER: ScanOrder = ScanOrder::AsGiven;

    /// Check the configuration for values the decomposer cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`DecomposeError::InvalidConfig`] if the tolerance is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), DecomposeError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(DecomposeError::InvalidConfig(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl Default for DecomposeConfig {
    fn default() -> Self {
        Self {
            tolerance: Self::DEFAULT_TOLERANCE,
            winding: Self::DEFAULT_WINDING,
            scan_order: Self::DEFAULT_SCAN_ORDER,
        }
    }
}

/// Errors that can occur during decomposition.
///
/// Every variant is terminal for the call: no partial rectangle list is
/// ever returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum DecomposeError {
    /// The input polygon has a shape the algorithm does not handle
    /// (holes, or the wrong winding under a strict policy).
    #[error("unsupported shape: {reason}")]
    UnsupportedShape {
        /// What was wrong with the input.
        reason: String,
    },

    /// A geometric precondition of the algorithm did not hold: no
    /// rectangle could be extracted, corners were degenerate, or the
    /// remainder stopped shrinking. Signals non-orthogonal input or a
    /// kernel precision problem.
    #[error("primitive invariant violated: {reason}")]
    PrimitiveInvariant {
        /// Which invariant failed.
        reason: String,
    },

    /// The kernel's difference produced something other than a single
    /// simple polygon.
    #[error("decomposition failed: {reason}")]
    Decomposition {
        /// What the remainder turned into.
        reason: String,
    },

    /// Decomposition configuration is invalid.
    #[error("invalid decomposition configuration: {0}")]
    InvalidConfig(String),
}

impl DecomposeError {
    pub(crate) fn unsupported(reason: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        Self::PrimitiveInvariant {
            reason: reason.into(),
        }
    }

    pub(crate) fn decomposition(reason: impl Into<String>) -> Self {
        Self::Decomposition {
            reason: reason.into(),
        }
    }
}
