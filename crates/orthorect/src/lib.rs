//! orthorect: decompose orthogonal polygons into rectangles (sans-IO).
//!
//! Takes a simple, hole-free polygon whose edges are all axis-aligned and
//! peels rectangles off it until nothing is left:
//! clean collinear vertices -> classify vertices -> extract one rectangle
//! -> subtract it -> repeat on the remainder.
//!
//! The rectangles are returned in extraction order. Their union is the
//! input polygon and their interiors are pairwise disjoint. The result is
//! a valid partition, not a minimum one.
//!
//! Boolean operations and orientation predicates come from a
//! [`GeometryKernel`]; the default [`GeoKernel`] uses the `geo` crate.
//! This crate has **no I/O dependencies**. File handling and SVG output
//! live in `orthorect-bench` and `orthorect-export`.

pub mod decompose;
pub mod diagnostics;
pub mod extract;
pub mod kernel;
pub mod orientation;
pub mod rectangle;
pub mod ring_edit;
pub mod types;

pub use decompose::Decomposer;
pub use diagnostics::{Clock, DecomposeDiagnostics, WebTimeClock};
pub use extract::{ExtractStrategy, find_rectangle, search2, search3};
pub use kernel::{GeoKernel, GeometryKernel, Shape, Turn};
pub use orientation::{OrientationClassifier, VertexKind};
pub use rectangle::{Rectangle, make_rectangle};
pub use ring_edit::{RingEditor, remove_collinear_vertices};
pub use types::{
    DecomposeConfig, DecomposeError, Point, Polygon, Ring, ScanOrder, ShapeFile, WindingPolicy,
};

/// Decompose an orthogonal polygon into disjoint axis-aligned rectangles.
///
/// # Steps per pass
///
/// 1. Remove collinear vertices from the working ring
/// 2. If four vertices remain, emit them as the last rectangle
/// 3. Classify every vertex as convex, concave, or collinear
/// 4. Extract one rectangle (`search3`, falling back to `search2`)
/// 5. Subtract it; the remainder becomes the next working polygon
///
/// # Errors
///
/// Returns [`DecomposeError::InvalidConfig`] if `config` is invalid.
/// Returns [`DecomposeError::UnsupportedShape`] if the polygon has holes.
/// Returns [`DecomposeError::PrimitiveInvariant`] if the polygon is not
/// orthogonal enough to peel.
/// Returns [`DecomposeError::Decomposition`] if a subtraction splits the
/// remainder or leaves a hole.
pub fn decompose(
    polygon: &Polygon,
    config: &DecomposeConfig,
) -> Result<Vec<Rectangle>, DecomposeError> {
    Decomposer::new(*config)?.decompose(polygon)
}

/// [`decompose`] with per-pass timing and counts.
///
/// # Errors
///
/// Same as [`decompose`].
pub fn decompose_with_diagnostics<C: Clock>(
    polygon: &Polygon,
    config: &DecomposeConfig,
    clock: &C,
) -> Result<(Vec<Rectangle>, DecomposeDiagnostics), DecomposeError> {
    Decomposer::new(*config)?.decompose_with_diagnostics(polygon, clock)
}
