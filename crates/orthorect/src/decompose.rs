//! The peel loop: repeatedly extract a rectangle and subtract it.
//!
//! Each iteration cleans the working ring of collinear vertices, and
//! either finishes on a four-vertex remainder or extracts one rectangle
//! and asks the kernel for `working - rectangle`. The remainder must stay
//! a single hole-free polygon; anything else aborts the whole call.

use tracing::{debug, trace, warn};

use crate::extract::{ExtractStrategy, find_rectangle};
use crate::kernel::{GeoKernel, GeometryKernel, Shape};
use crate::orientation::{OrientationClassifier, VertexKind};
use crate::rectangle::{Rectangle, make_rectangle};
use crate::ring_edit::RingEditor;
use crate::types::{DecomposeConfig, DecomposeError, Polygon, ScanOrder, WindingPolicy};

/// One completed pass of the peel loop.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Step {
    /// Zero-based pass index.
    pub iteration: usize,
    /// Distinct vertices in the working ring after cleaning.
    pub vertex_count: usize,
    /// Collinear vertices removed at the start of the pass.
    pub collinear_removed: usize,
    /// Scan that produced the rectangle; `None` for the final remainder.
    pub strategy: Option<ExtractStrategy>,
    /// Rectangle emitted by this pass.
    pub rectangle: Rectangle,
    /// Area still to be decomposed after this pass.
    pub remaining_area: f64,
}

/// Decomposes hole-free orthogonal polygons into disjoint rectangles.
///
/// Holds only immutable configuration and a kernel; all scratch state is
/// local to each [`decompose`](Self::decompose) call, so one decomposer
/// can be shared across threads whenever its kernel can.
#[derive(Debug, Clone)]
pub struct Decomposer<K = GeoKernel> {
    config: DecomposeConfig,
    kernel: K,
}

impl Decomposer<GeoKernel> {
    /// Create a decomposer backed by [`GeoKernel`].
    ///
    /// # Errors
    ///
    /// Returns [`DecomposeError::InvalidConfig`] if `config` fails
    /// [`DecomposeConfig::validate`].
    pub fn new(config: DecomposeConfig) -> Result<Self, DecomposeError> {
        Self::with_kernel(config, GeoKernel)
    }
}

impl<K: GeometryKernel> Decomposer<K> {
    /// Create a decomposer backed by a custom kernel.
    ///
    /// # Errors
    ///
    /// Returns [`DecomposeError::InvalidConfig`] if `config` fails
    /// [`DecomposeConfig::validate`].
    pub fn with_kernel(config: DecomposeConfig, kernel: K) -> Result<Self, DecomposeError> {
        config.validate()?;
        Ok(Self { config, kernel })
    }

    /// The configuration this decomposer was built with.
    #[must_use]
    pub const fn config(&self) -> &DecomposeConfig {
        &self.config
    }

    /// The geometry kernel in use.
    #[must_use]
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Decompose `polygon` into rectangles.
    ///
    /// The rectangles are returned in extraction order. Their union is
    /// the polygon and their interiors are pairwise disjoint.
    ///
    /// # Errors
    ///
    /// - [`DecomposeError::UnsupportedShape`] if the polygon has holes, or
    ///   is clockwise under [`WindingPolicy::RequireCounterClockwise`].
    /// - [`DecomposeError::PrimitiveInvariant`] if no rectangle can be
    ///   extracted, the ring degenerates, or the remainder stops shrinking.
    /// - [`DecomposeError::Decomposition`] if a difference step leaves
    ///   anything but a single hole-free polygon.
    pub fn decompose(&self, polygon: &Polygon) -> Result<Vec<Rectangle>, DecomposeError> {
        self.decompose_observed(polygon, |_| {})
    }

    /// [`decompose`](Self::decompose), reporting every completed pass to
    /// `observe`.
    pub(crate) fn decompose_observed(
        &self,
        polygon: &Polygon,
        observe: impl FnMut(&Step),
    ) -> Result<Vec<Rectangle>, DecomposeError> {
        self.peel(polygon, observe).inspect_err(|e| {
            warn!(error = %e, "decomposition failed");
        })
    }

    fn peel(
        &self,
        polygon: &Polygon,
        mut observe: impl FnMut(&Step),
    ) -> Result<Vec<Rectangle>, DecomposeError> {
        if polygon.has_holes() {
            return Err(DecomposeError::unsupported(format!(
                "polygon has {} hole(s)",
                polygon.holes.len()
            )));
        }

        let mut editor = RingEditor::new(&polygon.exterior);
        let mut area = self.kernel.signed_area(&polygon.exterior);
        if area < 0.0 {
            match self.config.winding {
                WindingPolicy::Normalize => {
                    debug!("reversing clockwise input ring");
                    editor.reverse();
                    area = -area;
                }
                WindingPolicy::RequireCounterClockwise => {
                    return Err(DecomposeError::unsupported(
                        "exterior ring is clockwise",
                    ));
                }
            }
        }

        let classifier = OrientationClassifier::new(&self.kernel, self.config.tolerance);
        let mut rectangles = Vec::new();
        let mut iteration = 0;

        loop {
            let collinear_removed = editor.remove_collinear_vertices(&classifier);
            let vertex_count = editor.vertices().len();

            if vertex_count < 4 {
                return Err(DecomposeError::invariant(format!(
                    "working ring has only {vertex_count} distinct vertices"
                )));
            }

            if vertex_count == 4 {
                let v = editor.vertices();
                let rectangle = make_rectangle(v[0], v[2])?;
                debug!(iteration, area = rectangle.area(), "final rectangle");
                observe(&Step {
                    iteration,
                    vertex_count,
                    collinear_removed,
                    strategy: None,
                    rectangle,
                    remaining_area: 0.0,
                });
                rectangles.push(rectangle);
                return Ok(rectangles);
            }

            let mut kinds = classifier.classify(editor.vertices());

            // Start the scan just after the last concave vertex so no
            // convex run wraps around the end of the sequence.
            if self.config.scan_order == ScanOrder::AfterLastConcave
                && let Some(last) = kinds.iter().rposition(|k| *k == VertexKind::Concave)
            {
                let start = last + 1;
                if start < vertex_count {
                    trace!(start, "rotating scan start");
                    editor.rotate_to(start);
                    kinds.rotate_left(start);
                }
            }

            let (rectangle, strategy) = find_rectangle(editor.vertices(), &kinds)?;

            let remainder = match self.kernel.difference(&editor.to_polygon(), &rectangle) {
                Shape::Polygon(p) if !p.has_holes() => p,
                other => {
                    return Err(DecomposeError::decomposition(format!(
                        "removing rectangle {iteration} left {}",
                        other.describe()
                    )));
                }
            };

            let mut remaining_area = self.kernel.signed_area(&remainder.exterior);
            editor = RingEditor::new(&remainder.exterior);
            if remaining_area < 0.0 {
                editor.reverse();
                remaining_area = -remaining_area;
            }

            if area - remaining_area <= self.config.tolerance * area {
                return Err(DecomposeError::invariant(format!(
                    "rectangle {iteration} did not reduce the remaining area ({area} -> {remaining_area})"
                )));
            }

            debug!(
                iteration,
                vertex_count,
                collinear_removed,
                %strategy,
                area = rectangle.area(),
                remaining_area,
                "extracted rectangle"
            );
            observe(&Step {
                iteration,
                vertex_count,
                collinear_removed,
                strategy: Some(strategy),
                rectangle,
                remaining_area,
            });

            rectangles.push(rectangle);
            area = remaining_area;
            iteration += 1;
        }
    }
}
