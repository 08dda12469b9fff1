//! Rectangle extraction: find one rectangle to peel off a polygon.
//!
//! Both strategies walk the vertex list once, left to right, tracking the
//! current run of convex vertices on a call-local stack. A concave vertex
//! closes the run; if the run is long enough a rectangle is carved from
//! it, otherwise the run is discarded and the scan continues.
//!
//! - [`search3`] needs three convex vertices before a concave one and
//!   spans the first and last of those three.
//! - [`search2`] needs two and spans the first of them and the concave
//!   vertex itself.
//!
//! The first match wins; there is no backtracking.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::orientation::VertexKind;
use crate::rectangle::{Rectangle, make_rectangle};
use crate::types::{DecomposeError, Point};

/// Which scan produced an extracted rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractStrategy {
    /// Three convex vertices followed by a concave one ([`search3`]).
    Triple,
    /// Two convex vertices followed by a concave one ([`search2`]).
    Pair,
}

impl std::fmt::Display for ExtractStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Triple => write!(f, "search3"),
            Self::Pair => write!(f, "search2"),
        }
    }
}

/// Scan for three consecutive convex vertices followed by a concave one.
///
/// On the first concave vertex preceded by a run of at least three convex
/// vertices, returns the rectangle spanned by the first and third of the
/// last three. Collinear vertices neither extend nor break a run.
///
/// `vertices` and `kinds` must be parallel.
///
/// # Errors
///
/// Returns [`DecomposeError::PrimitiveInvariant`] if the matched corners
/// do not span a rectangle (the input is not orthogonal).
pub fn search3(
    vertices: &[Point],
    kinds: &[VertexKind],
) -> Result<Option<Rectangle>, DecomposeError> {
    let mut run: Vec<usize> = Vec::with_capacity(vertices.len());
    for (i, kind) in kinds.iter().enumerate() {
        match kind {
            VertexKind::Convex => run.push(i),
            VertexKind::Concave => {
                if let &[.., f, _, h] = run.as_slice() {
                    trace!(f, h, concave = i, "search3 matched");
                    return make_rectangle(vertices[f], vertices[h]).map(Some);
                }
                run.clear();
            }
            VertexKind::Collinear => {}
        }
    }
    Ok(None)
}

/// Scan for two consecutive convex vertices followed by a concave one.
///
/// On the first concave vertex `i` preceded by a run of at least two
/// convex vertices, returns the rectangle spanned by the first of the last
/// two and `vertices[i]`.
///
/// `vertices` and `kinds` must be parallel.
///
/// # Errors
///
/// Returns [`DecomposeError::PrimitiveInvariant`] if the matched corners
/// do not span a rectangle.
pub fn search2(
    vertices: &[Point],
    kinds: &[VertexKind],
) -> Result<Option<Rectangle>, DecomposeError> {
    let mut run: Vec<usize> = Vec::with_capacity(vertices.len());
    for (i, kind) in kinds.iter().enumerate() {
        match kind {
            VertexKind::Convex => run.push(i),
            VertexKind::Concave => {
                if let &[.., g, _] = run.as_slice() {
                    trace!(g, concave = i, "search2 matched");
                    return make_rectangle(vertices[g], vertices[i]).map(Some);
                }
                run.clear();
            }
            VertexKind::Collinear => {}
        }
    }
    Ok(None)
}

/// Run [`search3`], falling back to [`search2`].
///
/// # Errors
///
/// Returns [`DecomposeError::PrimitiveInvariant`] if neither scan finds a
/// rectangle, or if a matched corner pair is degenerate.
pub fn find_rectangle(
    vertices: &[Point],
    kinds: &[VertexKind],
) -> Result<(Rectangle, ExtractStrategy), DecomposeError> {
    debug_assert_eq!(vertices.len(), kinds.len());

    if let Some(rect) = search3(vertices, kinds)? {
        return Ok((rect, ExtractStrategy::Triple));
    }
    if let Some(rect) = search2(vertices, kinds)? {
        return Ok((rect, ExtractStrategy::Pair));
    }
    Err(DecomposeError::invariant(format!(
        "no rectangle found among {} vertices",
        vertices.len()
    )))
}
