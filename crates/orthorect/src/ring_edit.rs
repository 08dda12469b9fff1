//! Ring editing: strip collinear vertices from a polygon boundary.
//!
//! [`RingEditor`] owns a mutable buffer of distinct vertices and hands out
//! immutable [`Ring`]/[`Polygon`] values on demand, so the decomposer can
//! clean, reorient and rotate a working boundary without touching the
//! kernel's types.

use crate::kernel::GeometryKernel;
use crate::orientation::{OrientationClassifier, VertexKind};
use crate::types::{Point, Polygon, Ring};

/// Mutable working copy of a ring's distinct vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct RingEditor {
    vertices: Vec<Point>,
}

impl RingEditor {
    /// Copy the distinct vertices of `ring` into a new editor.
    ///
    /// Repeated consecutive points collapse to one, including a repeat
    /// across the closing point, so a doubled corner stays a corner.
    #[must_use]
    pub fn new(ring: &Ring) -> Self {
        let mut vertices = ring.vertices().to_vec();
        vertices.dedup();
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Self { vertices }
    }

    /// Current distinct vertices (no closing duplicate).
    #[must_use]
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Remove every collinear vertex in a single pass.
    ///
    /// All vertices are classified against the buffer as it was before
    /// the call; removals do not trigger re-classification of their
    /// neighbours within the same pass. Returns the number removed.
    pub fn remove_collinear_vertices<K: GeometryKernel>(
        &mut self,
        classifier: &OrientationClassifier<'_, K>,
    ) -> usize {
        let kinds = classifier.classify(&self.vertices);
        let before = self.vertices.len();
        self.vertices = self
            .vertices
            .iter()
            .zip(&kinds)
            .filter(|&(_, kind)| *kind != VertexKind::Collinear)
            .map(|(&p, _)| p)
            .collect();
        before - self.vertices.len()
    }

    /// Reverse the traversal direction, keeping the start vertex.
    pub fn reverse(&mut self) {
        self.vertices.reverse();
        let len = self.vertices.len();
        self.vertices.rotate_right(1.min(len));
    }

    /// Rotate the cycle so that `vertices[start]` becomes the first vertex.
    pub fn rotate_to(&mut self, start: usize) {
        if !self.vertices.is_empty() {
            let start = start % self.vertices.len();
            self.vertices.rotate_left(start);
        }
    }

    /// Closed ring of the current vertices.
    #[must_use]
    pub fn to_ring(&self) -> Ring {
        Ring::new(self.vertices.clone())
    }

    /// Hole-free polygon bounded by the current vertices.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.to_ring(), Vec::new())
    }
}

/// Strip collinear vertices from `ring`.
///
/// Returns the cleaned, re-closed ring and the number of collinear
/// vertices removed. When nothing is collinear or repeated the input ring
/// is returned unchanged with a count of `0`.
#[must_use]
pub fn remove_collinear_vertices<K: GeometryKernel>(
    ring: &Ring,
    classifier: &OrientationClassifier<'_, K>,
) -> (Ring, usize) {
    let mut editor = RingEditor::new(ring);
    let removed = editor.remove_collinear_vertices(classifier);
    if removed == 0 && editor.vertices() == ring.vertices() {
        (ring.clone(), 0)
    } else {
        (editor.to_ring(), removed)
    }
}
