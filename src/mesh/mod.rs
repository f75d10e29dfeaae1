pub mod boundary;
pub mod chain;
pub mod dedup;
pub mod filter;
pub mod prune;

pub use boundary::{
    extract_boundary, filter_boundary, opposing_overlaps, BoundaryExtraction, Edge, EdgeKey,
};
pub use chain::{merge_collinear_chains, EdgeGraph};
pub use dedup::{deduplicate_vertices, DedupMode};
pub use filter::filter_obstructed_vertices;
pub use prune::prune_unreachable;

use crate::error::{MeshError, Result};
use crate::math::Point3;

/// Walkable-surface triangle soup: a vertex array plus flat index triples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavTriangulation {
    pub vertices: Vec<Point3>,
    pub indices: Vec<usize>,
}

impl NavTriangulation {
    /// Creates a triangulation, checking that `indices` forms whole
    /// triangles over `vertices`.
    ///
    /// # Errors
    ///
    /// Returns `MeshError::IndexCountNotMultipleOfThree` or
    /// `MeshError::IndexOutOfRange` for malformed input.
    pub fn new(vertices: Vec<Point3>, indices: Vec<usize>) -> Result<Self> {
        let mesh = Self { vertices, indices };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Checks index count and range.
    ///
    /// # Errors
    ///
    /// See [`NavTriangulation::new`].
    pub fn validate(&self) -> Result<()> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree(self.indices.len()).into());
        }
        let vertex_count = self.vertices.len();
        if let Some(&index) = self.indices.iter().find(|&&i| i >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            }
            .into());
        }
        Ok(())
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates triangles as vertex-index triples in winding order.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Number of distinct vertex ids referenced by some triangle.
    #[must_use]
    pub fn referenced_vertex_count(&self) -> usize {
        let mut seen = vec![false; self.vertices.len()];
        for &i in &self.indices {
            if let Some(s) = seen.get_mut(i) {
                *s = true;
            }
        }
        seen.into_iter().filter(|&s| s).count()
    }
}
