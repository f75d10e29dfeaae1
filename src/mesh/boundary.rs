use std::collections::HashMap;

use tracing::{debug, trace};

use crate::collections::QuickRemovableSet;
use crate::math::{Point3, Segment};

use super::NavTriangulation;

/// A directed edge between two canonical vertex ids.
///
/// Equality is directed; use [`Edge::key`] for undirected identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
}

/// Undirected edge identity: `(a, b)` and `(b, a)` share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey(usize, usize);

impl Edge {
    #[must_use]
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    #[must_use]
    pub fn key(&self) -> EdgeKey {
        EdgeKey(self.from.min(self.to), self.from.max(self.to))
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.to, self.from)
    }

    /// The edge as a segment over `vertices`.
    ///
    /// # Panics
    ///
    /// Panics if either id is out of range.
    #[must_use]
    pub fn segment(&self, vertices: &[Point3]) -> Segment {
        Segment::new(vertices[self.from], vertices[self.to])
    }
}

/// Boundary edges plus data-quality counters from the producer's mesh.
#[derive(Debug, Clone, Default)]
pub struct BoundaryExtraction {
    /// Edges used exactly once, in first-seen order and direction.
    pub edges: Vec<Edge>,
    /// Undirected edges used three or more times.
    pub non_manifold: usize,
    /// Zero-length edges that were skipped.
    pub degenerate: usize,
}

/// Extracts the edges that belong to exactly one triangle.
///
/// Each triangle contributes its three edges in winding order. An edge
/// seen once goes into the seen set; any later sighting marks it
/// duplicate, so a third occurrence cannot revive it.
#[must_use]
pub fn extract_boundary(mesh: &NavTriangulation) -> BoundaryExtraction {
    let edges = mesh
        .triangles()
        .flat_map(|[a, b, c]| [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)]);
    let extraction = single_use_edges(edges);
    debug!(
        triangles = mesh.triangle_count(),
        boundary = extraction.edges.len(),
        non_manifold = extraction.non_manifold,
        "extracted boundary edges"
    );
    extraction
}

/// Re-runs the single-use filter over an edge list.
///
/// Drops edges present in both directions, which chain splicing can
/// produce on thin features.
#[must_use]
pub fn filter_boundary(edges: &[Edge]) -> BoundaryExtraction {
    single_use_edges(edges.iter().copied())
}

fn single_use_edges(edges: impl Iterator<Item = Edge>) -> BoundaryExtraction {
    let mut seen: QuickRemovableSet<EdgeKey> = QuickRemovableSet::new();
    let mut first: Vec<Edge> = Vec::new();
    let mut repeats: HashMap<EdgeKey, usize> = HashMap::new();
    let mut degenerate = 0;

    for edge in edges {
        if edge.from == edge.to {
            trace!(vertex = edge.from, "skipping zero-length edge");
            degenerate += 1;
            continue;
        }
        let key = edge.key();
        if seen.add(key) {
            first.push(edge);
        } else {
            *repeats.entry(key).or_insert(0) += 1;
        }
    }

    let non_manifold = repeats.values().filter(|&&n| n >= 2).count();
    let edges = first
        .into_iter()
        .filter(|e| !repeats.contains_key(&e.key()))
        .collect();

    BoundaryExtraction {
        edges,
        non_manifold,
        degenerate,
    }
}

/// Pairs of boundary edges that run in opposite directions along the same
/// line and overlap with positive length.
///
/// Such pairs are seams between regions whose vertices were not welded.
/// `epsilon_sq` bounds the squared distance of an endpoint from the other
/// edge's line.
#[must_use]
pub fn opposing_overlaps(vertices: &[Point3], edges: &[Edge], epsilon_sq: f64) -> Vec<(usize, usize)> {
    let segments: Vec<Segment> = edges.iter().map(|e| e.segment(vertices)).collect();
    let mut pairs = Vec::new();

    for (i, a) in segments.iter().enumerate() {
        for (j, b) in segments.iter().enumerate().skip(i + 1) {
            if a.vector().dot(&b.vector()) >= 0.0 {
                continue;
            }
            let projected = b.project_onto(a);
            let collinear = (projected.start - b.start).norm_squared() < epsilon_sq
                && (projected.end - b.end).norm_squared() < epsilon_sq;
            if collinear && a.intersects(&projected) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn keys(edges: &[Edge]) -> Vec<EdgeKey> {
        let mut keys: Vec<_> = edges.iter().map(Edge::key).collect();
        keys.sort_by_key(|k| (k.0, k.1));
        keys
    }

    #[test]
    fn square_keeps_outer_edges_only() {
        // 3---2
        // | / |
        // 0---1   diagonal 1-3 is shared
        let mesh = NavTriangulation::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 0.0, 1.0), p(0.0, 0.0, 1.0)],
            vec![1, 0, 3, 1, 3, 2],
        )
        .unwrap();
        let extraction = extract_boundary(&mesh);
        assert_eq!(
            keys(&extraction.edges),
            vec![EdgeKey(0, 1), EdgeKey(0, 3), EdgeKey(1, 2), EdgeKey(2, 3)]
        );
        assert_eq!(extraction.non_manifold, 0);
    }

    #[test]
    fn boundary_keeps_winding_direction() {
        let mesh = NavTriangulation::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 0.0, 1.0), p(0.0, 0.0, 1.0)],
            vec![1, 0, 3, 1, 3, 2],
        )
        .unwrap();
        let edges = extract_boundary(&mesh).edges;
        assert_eq!(
            edges,
            vec![Edge::new(1, 0), Edge::new(0, 3), Edge::new(3, 2), Edge::new(2, 1)]
        );
    }

    #[test]
    fn third_use_does_not_revive_edge() {
        // Three triangles fanning around edge 0-1.
        let mesh = NavTriangulation::new(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(0.5, 0.0, 1.0),
                p(0.5, 0.0, -1.0),
                p(0.5, 1.0, 0.0),
            ],
            vec![0, 1, 2, 1, 0, 3, 0, 1, 4],
        )
        .unwrap();
        let extraction = extract_boundary(&mesh);
        assert!(!extraction.edges.iter().any(|e| e.key() == EdgeKey(0, 1)));
        assert_eq!(extraction.edges.len(), 6);
        assert_eq!(extraction.non_manifold, 1);
    }

    #[test]
    fn filter_drops_edges_present_both_ways() {
        let edges = vec![Edge::new(0, 1), Edge::new(1, 2), Edge::new(1, 0)];
        let extraction = filter_boundary(&edges);
        assert_eq!(extraction.edges, vec![Edge::new(1, 2)]);
    }

    #[test]
    fn collapsed_triangle_edges_are_skipped() {
        let mesh = NavTriangulation::new(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0)],
            vec![0, 0, 1],
        )
        .unwrap();
        let extraction = extract_boundary(&mesh);
        assert_eq!(extraction.degenerate, 1);
        // 0-1 and 1-0 cancel each other out.
        assert!(extraction.edges.is_empty());
    }

    #[test]
    fn opposing_overlap_detects_unwelded_seam() {
        let vertices = vec![
            p(0.0, 0.0, 0.0),
            p(4.0, 0.0, 0.0),
            p(3.0, 0.0, 0.0),
            p(1.0, 0.0, 0.0),
            p(0.0, 0.0, 2.0),
            p(4.0, 0.0, 2.0),
        ];
        let edges = vec![Edge::new(0, 1), Edge::new(2, 3), Edge::new(4, 5)];
        assert_eq!(opposing_overlaps(&vertices, &edges, 1e-8), vec![(0, 1)]);
    }
}
